//! Tree model for unpick definitions
//!
//! A [`Tree`] is built once per DSL source by the parser and never mutated afterwards.
//! Consumers (writer, remapper, index, rewriter) pattern match over the closed sum types
//! defined here; no node holds a back reference, so subtrees can be cloned freely.
//!
//! ## Types
//!
//! - [`Tree`] / [`Item`] - ordered top-level declarations
//! - [`GroupDefinition`] - a table of constants with scope, kind, strictness and format
//! - [`TargetField`] / [`TargetMethod`] - explicit bindings of program elements to group ids
//! - [`Expression`] / [`Literal`] - the symbolic replacement language
//! - [`Position`] / [`SourceLocation`] - 1-based line:column tracking for diagnostics

pub mod data_type;
pub mod expression;
pub mod group;
pub mod literal;
pub mod range;
pub mod target;
pub mod tree;

pub use data_type::DataType;
pub use expression::{BinaryOp, Expression, FieldRef, UnaryOp};
pub use group::{
    ConstantKey, DisplayFormat, GroupConstant, GroupDefinition, GroupIdentity, GroupKind,
    GroupScope,
};
pub use literal::{Literal, Radix};
pub use range::{Position, SourceLocation};
pub use target::{TargetField, TargetMethod};
pub use tree::{Item, Tree};

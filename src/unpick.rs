//! Core of the unpick toolchain.
//!
//! Data flows as: DSL text → [lexing] → [parsing] → [ast::Tree] → (optional) [remapping]
//! → [index::ConstantIndex] → [rewriting::LiteralRewriter].

pub mod ast;
pub mod error;
pub mod formats;
pub mod index;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod remapping;
pub mod rewriting;
pub mod testing;

pub use ast::Tree;
pub use error::{ParseError, ParseErrorKind, Result, UnpickError};
pub use formats::writer::{write_tree, WriterOptions};
pub use index::{ClassInfo, ClassModel, ClassPath, ConstantIndex, MethodKey};
pub use loader::{DslLoader, LoaderError};
pub use parsing::parse;
pub use remapping::{Mappings, Remapper};
pub use rewriting::{LiteralContext, LiteralRewriter, Occurrence, Replacement, RewriterOptions};

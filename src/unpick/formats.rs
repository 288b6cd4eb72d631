//! Output formats
//!
//! - [`writer`]: canonical DSL text, the inverse of [`parse`](crate::unpick::parse)
//! - [`java`]: Java source text for replacement expressions, used by the rewriter

pub mod java;
pub mod writer;

pub use java::{render_expression, render_literal};
pub use writer::{write_tree, WriterOptions};

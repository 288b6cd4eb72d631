//! # unpick
//!
//! Reader, writer, remapper and literal rewriter for unpick v3 constant definitions.
//!
//! File Layout
//!
//! The crate follows the flow of an unpick definition file through the tool:
//!
//! src/unpick
//!   ├── lexing       Tokenization of the line-oriented DSL (logos + descriptor mode)
//!   ├── parsing      Recursive descent for items, precedence climbing for expressions
//!   ├── ast          The immutable tree: groups, targets, expressions, literals
//!   ├── formats      Canonical DSL writer and Java source rendering
//!   ├── remapping    Tree-to-tree identifier substitution
//!   ├── index        Lookup structures built against the real class model
//!   └── rewriting    The literal decision engine
//!
//! For shared fixtures used by unit and integration tests, see the [testing module](unpick::testing).

pub mod unpick;

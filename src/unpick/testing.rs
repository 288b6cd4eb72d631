//! Testing utilities
//!
//! Shared by the unit tests and the integration tests under `tests/`.
//!
//! ## Sample files
//!
//! Definition sources used by tests live in `samples/` at the crate root and are loaded
//! through [`Samples`]. Prefer a sample over an inline string whenever a test exercises more
//! than a single declaration, so every test reads the same vetted definitions:
//!
//! - `colors.unpick` - class-scoped packed RGB constants
//! - `flags.unpick` - a class-scoped flag group
//! - `formats.unpick` - format-only groups (hex, binary, octal, char)
//! - `targets.unpick` - named groups bound through target declarations
//! - `kitchen.unpick` - every construct the reader understands
//!
//! ## Rewriting
//!
//! [`example_model`] is the class model the samples are written against, and [`Fixture`]
//! bundles a sample with an index so a test can go from a literal to its replacement text in
//! one call.
//!
//! These helpers panic on malformed input: a broken sample is a broken test.

use crate::unpick::ast::{Literal, Tree};
use crate::unpick::index::{ClassInfo, ClassPath, ConstantIndex};
use crate::unpick::loader::DslLoader;
use crate::unpick::rewriting::{LiteralContext, LiteralRewriter, Occurrence, RewriterOptions};
use std::path::{Path, PathBuf};

pub struct Samples;

impl Samples {
    pub fn path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("samples")
            .join(name)
    }

    pub fn loader(name: &str) -> DslLoader {
        DslLoader::from_path(Self::path(name))
            .unwrap_or_else(|error| panic!("sample {} is unreadable: {}", name, error))
    }

    pub fn source(name: &str) -> String {
        Self::loader(name).source().to_string()
    }

    pub fn tree(name: &str) -> Tree {
        Self::loader(name)
            .parse()
            .unwrap_or_else(|error| panic!("sample {} does not parse: {}", name, error))
    }
}

/// Classes referenced by the sample files.
pub fn example_model() -> ClassPath {
    ClassPath::new()
        .with_class(ClassInfo::new("Example").with_method("run", "()V"))
        .with_class(ClassInfo::new("Outsider").with_method("run", "()V"))
        .with_class(ClassInfo::new("Binary"))
        .with_class(ClassInfo::new("Octal"))
        .with_class(ClassInfo::new("Chars"))
        .with_class(
            ClassInfo::new("com.example.Painter")
                .with_method("setColor", "(I)V")
                .with_method("getColor", "()I")
                .with_method("setRatio", "(D)V"),
        )
        .with_class(ClassInfo::new("com.example.Brush"))
        .with_class(
            ClassInfo::new("com.example.FancyPainter")
                .extends("com.example.Painter")
                .implements("com.example.Brush")
                .with_method("setColor", "(I)V"),
        )
        .with_class(
            ClassInfo::new("com.example.Widget")
                .with_method("<init>", "(ILjava/lang/String;)V"),
        )
}

/// A literal at a dummy span.
pub fn occurrence(literal: Literal) -> Occurrence {
    Occurrence::new(literal, 1..2)
}

/// A literal preceded by a unary minus.
pub fn negated(literal: Literal) -> Occurrence {
    Occurrence::new(literal, 1..2).negated_by(0..1)
}

/// A sample tree indexed against [`example_model`].
pub struct Fixture {
    pub index: ConstantIndex<ClassPath>,
    pub options: RewriterOptions,
}

impl Fixture {
    pub fn sample(name: &str) -> Self {
        Self::from_tree(&Samples::tree(name))
    }

    pub fn from_source(source: &str) -> Self {
        let tree = DslLoader::from_string(source)
            .parse()
            .unwrap_or_else(|error| panic!("fixture does not parse: {}", error));
        Self::from_tree(&tree)
    }

    pub fn from_tree(tree: &Tree) -> Self {
        Self {
            index: ConstantIndex::new(tree, example_model()),
            options: RewriterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RewriterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rewriter(&self) -> LiteralRewriter<'_, ClassPath> {
        LiteralRewriter::new(&self.index).with_options(self.options.clone())
    }

    /// Replacement text for `occurrence`, or `None` when it is left alone.
    pub fn rewrite(&self, occurrence: &Occurrence, context: &LiteralContext) -> Option<String> {
        self.rewriter()
            .rewrite(occurrence, context)
            .map(|replacement| replacement.text)
    }

    /// Shorthand for a plain literal inside `Example.run()`.
    pub fn rewrite_in_example(&self, literal: Literal) -> Option<String> {
        self.rewrite(
            &occurrence(literal),
            &LiteralContext::in_class("Example").in_method("run", "()V"),
        )
    }
}

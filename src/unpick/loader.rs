//! Loading unpick definition files
//!
//! `DslLoader` holds the text of one definition file and runs the reader over it. Several
//! files are combined with [`load_all`], which merges their trees by group identity.
//!
//! ```rust,ignore
//! use unpick::unpick::loader::DslLoader;
//!
//! let tree = DslLoader::from_path("colors.unpick")?.parse()?;
//! let merged = unpick::unpick::loader::load_all(["a.unpick", "b.unpick"])?;
//! ```

use crate::unpick::ast::Tree;
use crate::unpick::error::{format_source_context, ParseError};
use crate::unpick::lexing::{self, Spanned};
use crate::unpick::parsing;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin}:{error}")]
    Parse {
        origin: String,
        #[source]
        error: ParseError,
    },
}

pub struct DslLoader {
    source: String,
    origin: String,
}

impl DslLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            origin: origin.clone(),
            source,
        })?;
        Ok(Self { source, origin })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        Self {
            source: source.into(),
            origin: "<string>".to_string(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Path the source was read from, or `<string>`
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn parse(&self) -> Result<Tree, LoaderError> {
        let tree = parsing::parse(&self.source).map_err(|error| self.parse_error(error))?;
        debug!(origin = %self.origin, items = tree.items.len(), "loaded unpick definitions");
        Ok(tree)
    }

    pub fn tokenize(&self) -> Result<Vec<Spanned>, LoaderError> {
        lexing::tokenize(&self.source).map_err(|error| self.parse_error(error))
    }

    /// The lines around a reader error, for diagnostics.
    pub fn context(&self, error: &ParseError) -> String {
        format_source_context(&self.source, error.position)
    }

    fn parse_error(&self, error: ParseError) -> LoaderError {
        LoaderError::Parse {
            origin: self.origin.clone(),
            error,
        }
    }
}

/// Load and merge several definition files, in order.
pub fn load_all<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Tree, LoaderError> {
    let mut merged = Tree::default();
    for path in paths {
        merged.merge(DslLoader::from_path(path)?.parse()?);
    }
    Ok(merged)
}

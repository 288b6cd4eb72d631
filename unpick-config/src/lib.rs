//! Shared configuration loader for the unpick tools.
//!
//! `defaults/unpick.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`UnpickConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use unpick::unpick::{RewriterOptions, WriterOptions};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/unpick.default.toml");

/// Top-level configuration consumed by unpick applications.
#[derive(Debug, Clone, Deserialize)]
pub struct UnpickConfig {
    pub writer: WriterOptions,
    pub rewrite: RewriterOptions,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<UnpickConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<UnpickConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use unpick::unpick::rewriting::FlagOrder;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.writer, WriterOptions::default());
        assert_eq!(config.rewrite, RewriterOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("rewrite.flag_order", "descending")
            .expect("override to apply")
            .set_override("rewrite.widening", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.rewrite.flag_order, FlagOrder::Descending);
        assert!(!config.rewrite.widening);
        assert!(config.rewrite.hex_uppercase);
    }

    #[test]
    fn layers_user_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("unpick.toml");
        fs::write(&path, "[writer]\nindent = \"  \"\n").expect("write config");

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.writer.indent, "  ");
        assert_eq!(config.rewrite, RewriterOptions::default());
    }

    #[test]
    fn optional_files_may_be_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");

        assert!(Loader::new().with_optional_file(&missing).build().is_ok());
        assert!(Loader::new().with_file(&missing).build().is_err());
    }

    #[test]
    fn rejects_unknown_flag_order() {
        let result = Loader::new()
            .set_override("rewrite.flag_order", "random")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}

//! Mapping tables consumed by the remapper

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemapError {
    #[error("failed to read mappings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mapping document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identifies a field or method by its owner, name and descriptor, all in the source naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    pub class: String,
    pub name: String,
    pub descriptor: String,
}

impl MemberKey {
    pub fn new(
        class: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// Renaming tables plus the package index used to expand package-scoped groups.
///
/// Class names are dotted binary names (`com.example.Outer$Inner`) on both sides.
#[derive(Debug, Clone, Default)]
pub struct Mappings {
    pub classes: HashMap<String, String>,
    pub fields: HashMap<MemberKey, String>,
    pub methods: HashMap<MemberKey, String>,
    /// Package → unqualified names of the classes it contains before remapping
    pub packages: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct MappingDocument {
    #[serde(default)]
    classes: HashMap<String, String>,
    #[serde(default)]
    fields: Vec<MemberMapping>,
    #[serde(default)]
    methods: Vec<MemberMapping>,
    #[serde(default)]
    packages: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct MemberMapping {
    class: String,
    name: String,
    descriptor: String,
    target: String,
}

impl Mappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.classes.insert(from.into(), to.into());
        self
    }

    pub fn with_field(mut self, key: MemberKey, to: impl Into<String>) -> Self {
        self.fields.insert(key, to.into());
        self
    }

    pub fn with_method(mut self, key: MemberKey, to: impl Into<String>) -> Self {
        self.methods.insert(key, to.into());
        self
    }

    pub fn with_package(
        mut self,
        package: impl Into<String>,
        classes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.packages
            .insert(package.into(), classes.into_iter().map(Into::into).collect());
        self
    }

    /// Parse a JSON mapping document:
    ///
    /// ```json
    /// {
    ///   "classes": { "a.Old": "b.New" },
    ///   "fields": [{ "class": "a.Old", "name": "X", "descriptor": "I", "target": "Y" }],
    ///   "methods": [{ "class": "a.Old", "name": "m", "descriptor": "(I)V", "target": "n" }],
    ///   "packages": { "a": ["Old"] }
    /// }
    /// ```
    ///
    /// Every section is optional.
    pub fn from_json(json: &str) -> Result<Self, RemapError> {
        let document: MappingDocument = serde_json::from_str(json)?;
        let members = |entries: Vec<MemberMapping>| -> HashMap<MemberKey, String> {
            entries
                .into_iter()
                .map(|entry| {
                    (
                        MemberKey::new(entry.class, entry.name, entry.descriptor),
                        entry.target,
                    )
                })
                .collect()
        };
        Ok(Self {
            classes: document.classes,
            fields: members(document.fields),
            methods: members(document.methods),
            packages: document.packages,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RemapError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RemapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

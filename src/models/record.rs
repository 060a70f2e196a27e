//! The generator output record: tonal palettes, light/dark schemes, source colors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use super::palette::TonalPalette;

/// Error loading or serializing a theme record
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// File I/O error
    #[error("Failed to read theme record: {0}")]
    Io(#[from] std::io::Error),
    /// JSON syntax or shape error
    #[error("Invalid theme record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A flat mapping of role name (`primary`, `onSurfaceVariant`, ...) to color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scheme {
    roles: BTreeMap<String, String>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.roles.get(role).map(String::as_str)
    }

    pub fn insert(&mut self, role: impl Into<String>, color: impl Into<String>) {
        self.roles.insert(role.into(), color.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Scheme {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { roles: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// The scheme variants produced from one set of palettes.
///
/// `light` and `dark` are always present (empty when the generator omitted
/// them); any other variant, such as a contrast level, is kept in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schemes {
    #[serde(default)]
    pub light: Scheme,
    #[serde(default)]
    pub dark: Scheme,
    #[serde(flatten)]
    pub other: BTreeMap<String, Scheme>,
}

impl Schemes {
    /// All variants with their names, light and dark first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scheme)> {
        [("light", &self.light), ("dark", &self.dark)]
            .into_iter()
            .chain(self.other.iter().map(|(name, scheme)| (name.as_str(), scheme)))
    }

    pub fn get(&self, variant: &str) -> Option<&Scheme> {
        match variant {
            "light" => Some(&self.light),
            "dark" => Some(&self.dark),
            other => self.other.get(other),
        }
    }

    /// Build a new set of schemes by transforming every variant.
    pub fn map(&self, mut f: impl FnMut(&str, &Scheme) -> Scheme) -> Schemes {
        Schemes {
            light: f("light", &self.light),
            dark: f("dark", &self.dark),
            other: self
                .other
                .iter()
                .map(|(name, scheme)| (name.clone(), f(name, scheme)))
                .collect(),
        }
    }
}

/// Output of the external color-role generator, and of the corrector.
///
/// Unknown top-level fields (seed, variant, contrast, ...) are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRecord {
    #[serde(default)]
    pub tonal_palettes: BTreeMap<String, TonalPalette>,
    #[serde(default)]
    pub schemes: Schemes,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source_colors: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ThemeRecord {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RecordError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a record from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, RecordError> {
        let json =
            if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }

    pub fn palette(&self, name: &str) -> Option<&TonalPalette> {
        self.tonal_palettes.get(name)
    }
}

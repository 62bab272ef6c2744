//! Build-time injected data: the entry point → CSS files map and the base URL.

use crate::{CssFileName, EntryPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Ordered list of logical CSS files per entry point, as computed by the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssMap {
    entries: HashMap<EntryPoint, Vec<CssFileName>>,
}

impl CssMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the serialized map token substituted into the generated module.
    pub fn from_injected(token: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(token)?)
    }

    /// Serializes the map into the form the bundler substitutes.
    pub fn to_injected(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sets the file list for an entry point, replacing any previous one.
    pub fn insert(&mut self, entry: EntryPoint, files: Vec<CssFileName>) {
        self.entries.insert(entry, files);
    }

    /// Returns the files of an entry point. Unknown entry points have none.
    #[must_use]
    pub fn files_for(&self, entry: &str) -> &[CssFileName] {
        self.entries.get(entry).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over the known entry points.
    pub fn entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(EntryPoint, Vec<CssFileName>)> for CssMap {
    fn from_iter<T: IntoIterator<Item = (EntryPoint, Vec<CssFileName>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Public base URL of the deployed bundle, always ending in `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self(base)
    }

    /// Resolves a logical CSS file against the base.
    #[must_use]
    pub fn join(&self, file: &CssFileName) -> String {
        format!("{}{}", self.0, file.as_str())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

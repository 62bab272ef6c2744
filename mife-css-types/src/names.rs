//! Name types for logical CSS files and entry points.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Relative path naming one physical stylesheet emitted by the build.
///
/// Many entry points may reference the same file; the engine keys its mount
/// bookkeeping by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CssFileName(String);

impl CssFileName {
    /// Creates a file name, rejecting empty values.
    pub fn new(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(crate::Error::InvalidFileName(name));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CssFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CssFileName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CssFileName {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CssFileName> for String {
    fn from(value: CssFileName) -> Self {
        value.0
    }
}

impl Borrow<str> for CssFileName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CssFileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Name of a build entry point (a micro-frontend or an exported parcel).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryPoint(String);

impl EntryPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryPoint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for EntryPoint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

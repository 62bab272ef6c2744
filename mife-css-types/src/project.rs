//! Project identifier.
//!
//! The identifier is embedded in emitted CSS asset names as `vpss(<id>)` so the
//! runtime can tell which stylesheets in a shared page belong to this project.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters of the package name used when no explicit project id
/// is configured.
pub const PROJECT_ID_MAX_LEN: usize = 20;

/// Unique identifier of a micro-frontend project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates a project id. Parentheses are rejected because they delimit the
    /// id inside the URL marker.
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() || id.contains(['(', ')']) {
            return Err(crate::Error::InvalidProjectId(id));
        }
        Ok(Self(id))
    }

    /// Derives the default project id from a package name (first 20 characters).
    pub fn from_package_name(name: &str) -> crate::Result<Self> {
        Self::new(name.chars().take(PROJECT_ID_MAX_LEN).collect::<String>())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The marker that tagged asset URLs carry, e.g. `vpss(shell)`.
    #[must_use]
    pub fn url_marker(&self) -> String {
        format!("vpss({})", self.0)
    }

    /// Returns true if `href` points to an asset tagged with this project's marker.
    #[must_use]
    pub fn tags(&self, href: &str) -> bool {
        href.contains(&self.url_marker())
    }

    /// Inserts the URL marker in front of the file-name part of an asset file
    /// name pattern, keeping any folders in place.
    ///
    /// `assets/[name]-[hash][extname]` becomes `assets/vpss(<id>)[name]-[hash][extname]`.
    #[must_use]
    pub fn tag_asset_pattern(&self, pattern: &str) -> String {
        let split = pattern.rfind('/').map_or(0, |idx| idx + 1);
        let (folders, file) = pattern.split_at(split);
        format!("{folders}{}{file}", self.url_marker())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.0
    }
}

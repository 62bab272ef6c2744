//! Stylesheet load outcomes.

use crate::CssFileName;
use serde::{Deserialize, Serialize};

/// Error description supplied by the host when a stylesheet fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct LoadErrorDetail {
    pub message: String,
}

impl LoadErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of watching one stylesheet link until it loads, fails or runs out of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The stylesheet loaded before the deadline.
    Ok,
    /// The deadline passed first. The stylesheet may still load later.
    Timeout { file: CssFileName },
    /// The host reported a load error.
    Error {
        file: CssFileName,
        detail: LoadErrorDetail,
    },
}

impl LoadOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The file the outcome is about, if it is not a success.
    #[must_use]
    pub fn file(&self) -> Option<&CssFileName> {
        match self {
            Self::Ok => None,
            Self::Timeout { file } | Self::Error { file, .. } => Some(file),
        }
    }
}

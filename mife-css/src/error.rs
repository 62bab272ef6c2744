//! Error types for the CSS lifecycle engine.

use mife_css_types::{CssFileName, LoadErrorDetail};
use thiserror::Error;

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Errors surfaced by `mount()` and the load aggregator.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A stylesheet reported a load error and the policy says to fail.
    #[error("CSS load failed for file \"{file}\".")]
    LoadFailed {
        file: CssFileName,
        #[source]
        cause: LoadErrorDetail,
    },

    /// A stylesheet missed its deadline and the policy says to fail.
    #[error("CSS load for file \"{file}\" timed out and might not have loaded.")]
    LoadTimedOut { file: CssFileName },

    /// Load tracking ended without producing an outcome.
    #[error("load tracking for file \"{file}\" ended without an outcome")]
    LoadTracking { file: CssFileName },
}

impl LifecycleError {
    /// The file the error is about.
    #[must_use]
    pub fn file(&self) -> &CssFileName {
        match self {
            Self::LoadFailed { file, .. }
            | Self::LoadTimedOut { file }
            | Self::LoadTracking { file } => file,
        }
    }
}

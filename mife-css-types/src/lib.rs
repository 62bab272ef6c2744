//! Shared vocabulary for the micro-frontend CSS lifecycle engine.
//!
//! This crate defines the plain data types exchanged between the build step
//! and the runtime engine:
//! - Logical CSS file names and entry point names
//! - The project identifier used to tag assets and detect foreign stylesheets
//! - The build-time injected CSS map and base URL
//! - Stylesheet load outcomes
//!
//! Nothing in here touches a document; the engine lives in `mife-css`.

mod css_map;
mod names;
mod outcome;
mod project;

pub use css_map::{BaseUrl, CssMap};
pub use names::{CssFileName, EntryPoint};
pub use outcome::{LoadErrorDetail, LoadOutcome};
pub use project::{ProjectId, PROJECT_ID_MAX_LEN};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading build-time data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid project id: {0}")]
    InvalidProjectId(String),

    #[error("invalid css file name: {0}")]
    InvalidFileName(String),
}

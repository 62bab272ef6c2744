//! Reference-counted CSS lifecycle engine for micro-frontends.
//!
//! Micro-frontends that share a page mount and unmount independently. This
//! crate keeps their stylesheets in step with those lifecycles: stylesheets
//! load before a mount completes, stop applying when nothing needs them, and
//! are never loaded twice when several consumers share one file.
//!
//! # Components
//!
//! - **Link controller** ([`link`]): creates engine-owned links and settles
//!   their load/error/deadline race into one outcome
//! - **Aggregator** ([`aggregate`]): turns many outcomes into one verdict
//! - **Mount table** ([`mount_table`]): per-file reference counts
//! - **Strategies** ([`strategy`]): single-instance, multi-instance, no-op
//! - **Observer** ([`observer`]): finds stylesheets the bundler injected
//! - **Runtime** ([`runtime`]): per-project context and lifecycle factory
//!
//! The page is reached only through the [`document::Document`] capability;
//! [`memory::MemoryDocument`] is a headless implementation.
//!
//! # Example
//!
//! ```
//! use mife_css::memory::MemoryDocument;
//! use mife_css::{CssRuntime, CssStrategy, LifecycleOptions, RuntimeConfig};
//! use mife_css_types::{BaseUrl, CssMap, ProjectId};
//!
//! let runtime = CssRuntime::new(RuntimeConfig {
//!     document: MemoryDocument::new(),
//!     project_id: ProjectId::new("shell").unwrap(),
//!     base_url: BaseUrl::new("/mfe"),
//!     css_map: CssMap::from_injected(r#"{"app": ["assets/vpss(shell)app.css"]}"#).unwrap(),
//!     strategy: CssStrategy::MultiMife,
//!     serving: false,
//! });
//!
//! let lifecycle = runtime.lifecycle("app", LifecycleOptions::default());
//! assert_eq!(lifecycle.entry_point().as_str(), "app");
//! ```

pub mod aggregate;
pub mod document;
mod error;
pub mod link;
pub mod logger;
pub mod memory;
pub mod mount_table;
pub mod observer;
mod options;
pub mod runtime;
pub mod strategy;

pub use document::{Document, LinkRef, StylesheetLink};
pub use error::{LifecycleError, LifecycleResult};
pub use logger::{LogSink, Logger, Logging};
pub use options::{FailurePolicy, LifecycleOptions, DEFAULT_LOAD_TIMEOUT};
pub use runtime::{CssRuntime, CssStrategy, RuntimeConfig};
pub use strategy::CssLifecycle;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Lifecycle strategy variants.
//!
//! Every variant exposes the same `bootstrap`/`mount`/`unmount` contract the
//! orchestration framework drives. The build step decides which one a
//! project gets; see [`crate::runtime::CssStrategy`].

mod multi;
mod noop;
mod single;

pub use multi::MultiMifeLifecycle;
pub use noop::NoCssLifecycle;
pub use single::SingleMifeLifecycle;

use crate::error::LifecycleResult;
use async_trait::async_trait;
use mife_css_types::EntryPoint;

/// CSS lifecycle of one entry point.
#[async_trait]
pub trait CssLifecycle: Send + Sync {
    /// The entry point whose CSS files this lifecycle manages.
    fn entry_point(&self) -> &EntryPoint;

    /// Called once per activation, before the first mount.
    async fn bootstrap(&self) -> LifecycleResult<()>;

    /// Makes the entry point's stylesheets active. Fails only when the
    /// failure policy says so, or when load tracking breaks.
    async fn mount(&self) -> LifecycleResult<()>;

    /// Deactivates the entry point's stylesheets. Never fails.
    async fn unmount(&self) -> LifecycleResult<()>;
}

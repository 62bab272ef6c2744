use super::CssLifecycle;
use crate::error::LifecycleResult;
use async_trait::async_trait;
use mife_css_types::EntryPoint;

/// Lifecycle for hosts where nothing was bundled (development serving), or
/// for projects that opted out of CSS management.
#[derive(Debug, Clone)]
pub struct NoCssLifecycle {
    entry_point: EntryPoint,
}

impl NoCssLifecycle {
    pub fn new(entry_point: EntryPoint) -> Self {
        Self { entry_point }
    }
}

#[async_trait]
impl CssLifecycle for NoCssLifecycle {
    fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    async fn bootstrap(&self) -> LifecycleResult<()> {
        Ok(())
    }

    async fn mount(&self) -> LifecycleResult<()> {
        Ok(())
    }

    async fn unmount(&self) -> LifecycleResult<()> {
        Ok(())
    }
}

use super::CssLifecycle;
use crate::aggregate;
use crate::error::LifecycleResult;
use crate::link::{LinkController, PendingLoad};
use crate::lock;
use crate::mount_table::MountTable;
use crate::observer::ForeignStylesheetObserver;
use crate::options::FailurePolicy;
use async_trait::async_trait;
use mife_css_types::{CssFileName, EntryPoint};
use std::sync::{Arc, Mutex};

/// Lifecycle for projects that mount several entry points, or several
/// instances of one, at the same time.
///
/// All lifecycles of a runtime share one [`MountTable`] and one observer, so
/// a stylesheet needed by two mounted consumers stays active until both have
/// unmounted.
pub struct MultiMifeLifecycle {
    entry_point: EntryPoint,
    files: Vec<CssFileName>,
    controller: LinkController,
    policy: FailurePolicy,
    table: Arc<Mutex<MountTable>>,
    observer: Arc<Mutex<ForeignStylesheetObserver>>,
}

impl MultiMifeLifecycle {
    pub fn new(
        entry_point: EntryPoint,
        files: Vec<CssFileName>,
        controller: LinkController,
        policy: FailurePolicy,
        table: Arc<Mutex<MountTable>>,
        observer: Arc<Mutex<ForeignStylesheetObserver>>,
    ) -> Self {
        Self {
            entry_point,
            files,
            controller,
            policy,
            table,
            observer,
        }
    }
}

#[async_trait]
impl CssLifecycle for MultiMifeLifecycle {
    fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    async fn bootstrap(&self) -> LifecycleResult<()> {
        lock(&self.observer).restart();
        Ok(())
    }

    async fn mount(&self) -> LifecycleResult<()> {
        // Counts are bumped before the first await so concurrent calls see them.
        let pending: Vec<PendingLoad> = {
            let mut table = lock(&self.table);
            self.files
                .iter()
                .map(|file| table.request_mount(file, &self.controller))
                .collect()
        };
        aggregate::settle(pending, self.policy, self.controller.logger()).await?;

        // An unmount may have run while the loads were pending.
        let table = lock(&self.table);
        if !table.any_mounted() {
            return Ok(());
        }
        let observer = lock(&self.observer);
        let mut foreign = lock(observer.foreign());
        if !foreign.is_mounted() {
            foreign.enable_all();
        }
        Ok(())
    }

    async fn unmount(&self) -> LifecycleResult<()> {
        let still_mounted = {
            let mut table = lock(&self.table);
            for file in &self.files {
                table.request_unmount(file, self.controller.logger());
            }
            table.any_mounted()
        };
        if still_mounted {
            return Ok(());
        }

        let observer = lock(&self.observer);
        let mut foreign = lock(observer.foreign());
        if foreign.is_mounted() {
            foreign.disable_all();
        }
        Ok(())
    }
}

use super::CssLifecycle;
use crate::aggregate;
use crate::document::LinkRef;
use crate::error::LifecycleResult;
use crate::link::{ready_ok, LinkController, PendingLoad};
use crate::lock;
use crate::observer::ForeignStylesheetObserver;
use crate::options::FailurePolicy;
use async_trait::async_trait;
use mife_css_types::{CssFileName, EntryPoint};
use std::sync::Mutex;

/// Lifecycle for projects that mount at most one instance of an entry point
/// at a time.
///
/// Links are rebuilt on every `bootstrap()` and owned by this object alone,
/// so no counting is needed. Mounting the same entry point twice at once is
/// not supported.
pub struct SingleMifeLifecycle {
    entry_point: EntryPoint,
    files: Vec<CssFileName>,
    controller: LinkController,
    policy: FailurePolicy,
    state: Mutex<SingleState>,
    observer: Mutex<ForeignStylesheetObserver>,
}

#[derive(Default)]
struct SingleState {
    /// Links inserted into the head since the last bootstrap.
    owned: Vec<LinkRef>,
    /// Links created by the last bootstrap and not yet mounted.
    fresh: Option<Vec<(CssFileName, LinkRef)>>,
}

impl SingleMifeLifecycle {
    pub fn new(
        entry_point: EntryPoint,
        files: Vec<CssFileName>,
        controller: LinkController,
        policy: FailurePolicy,
        observer: ForeignStylesheetObserver,
    ) -> Self {
        Self {
            entry_point,
            files,
            controller,
            policy,
            state: Mutex::default(),
            observer: Mutex::new(observer),
        }
    }

    /// Links currently owned and attached by this lifecycle.
    pub fn owned_links(&self) -> Vec<LinkRef> {
        lock(&self.state).owned.clone()
    }

    /// Number of foreign links currently tracked.
    pub fn foreign_count(&self) -> usize {
        lock(lock(&self.observer).foreign()).len()
    }
}

#[async_trait]
impl CssLifecycle for SingleMifeLifecycle {
    fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    async fn bootstrap(&self) -> LifecycleResult<()> {
        {
            let mut observer = lock(&self.observer);
            observer.stop();
            observer.detach_all();
            observer.restart();
        }

        let mut state = lock(&self.state);
        for link in state.owned.drain(..) {
            self.controller.remove(&link);
        }
        let fresh = self
            .files
            .iter()
            .map(|file| (file.clone(), self.controller.create(file)))
            .collect();
        state.fresh = Some(fresh);
        Ok(())
    }

    async fn mount(&self) -> LifecycleResult<()> {
        let pending: Vec<PendingLoad> = {
            let mut state = lock(&self.state);
            let mut pending = Vec::new();
            match state.fresh.take() {
                Some(fresh) => {
                    for (file, link) in fresh {
                        self.controller.insert(&link);
                        pending.push(self.controller.wire(&link, &file));
                        state.owned.push(link);
                    }
                }
                None => pending.push(ready_ok()),
            }
            for link in &state.owned {
                self.controller.enable(link);
            }
            pending
        };
        {
            let observer = lock(&self.observer);
            lock(observer.foreign()).enable_all();
        }
        aggregate::settle(pending, self.policy, self.controller.logger()).await
    }

    async fn unmount(&self) -> LifecycleResult<()> {
        {
            let state = lock(&self.state);
            for link in &state.owned {
                self.controller.disable(link);
            }
        }
        let observer = lock(&self.observer);
        lock(observer.foreign()).disable_all();
        Ok(())
    }
}

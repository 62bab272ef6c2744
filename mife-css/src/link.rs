//! Link element controller.
//!
//! Creates engine-owned stylesheet links and turns their `load`/`error`
//! events plus a deadline into a single [`LoadOutcome`]. The first trigger to
//! fire settles the outcome; the others are deregistered.

use crate::document::{Document, LinkEvent, LinkEventKind, LinkRef, ListenerId, StylesheetLink};
use crate::error::{LifecycleError, LifecycleResult};
use crate::lock;
use crate::logger::Logger;
use futures::future::{self, BoxFuture, FutureExt};
use mife_css_types::{BaseUrl, CssFileName, LoadErrorDetail, LoadOutcome, ProjectId};
use std::mem;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Attribute that marks links created by this engine.
pub const OWNERSHIP_ATTRIBUTE: &str = "data-vpss";

/// Awaitable outcome of one stylesheet load.
pub type PendingLoad = BoxFuture<'static, LifecycleResult<LoadOutcome>>;

/// An already-settled `Ok` outcome, used when a live link is merely re-enabled.
#[must_use]
pub fn ready_ok() -> PendingLoad {
    future::ready(Ok(LoadOutcome::Ok)).boxed()
}

/// Funnels every document mutation the lifecycle strategies perform.
#[derive(Clone)]
pub struct LinkController {
    document: Arc<dyn Document>,
    base_url: BaseUrl,
    project_id: ProjectId,
    load_timeout: Duration,
    logger: Logger,
}

impl LinkController {
    pub fn new(
        document: Arc<dyn Document>,
        base_url: BaseUrl,
        project_id: ProjectId,
        load_timeout: Duration,
        logger: Logger,
    ) -> Self {
        Self {
            document,
            base_url,
            project_id,
            load_timeout,
            logger,
        }
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Creates a detached, engine-owned link for `file`.
    pub fn create(&self, file: &CssFileName) -> LinkRef {
        let link = self.document.create_link(&self.base_url.join(file));
        link.set_attribute(OWNERSHIP_ATTRIBUTE, "true");
        link
    }

    pub fn insert(&self, link: &LinkRef) {
        self.document.append_to_head(link);
    }

    pub fn remove(&self, link: &LinkRef) {
        self.document.remove_from_head(link);
    }

    pub fn enable(&self, link: &LinkRef) {
        link.set_disabled(false);
    }

    pub fn disable(&self, link: &LinkRef) {
        link.set_disabled(true);
    }

    /// Starts watching `link` for its load outcome.
    ///
    /// The deadline is fixed now, not when the returned future is first
    /// polled. Missing the deadline does not cancel the request; a later
    /// `load` finds no listener left.
    pub fn wire(&self, link: &LinkRef, file: &CssFileName) -> PendingLoad {
        let (sender, receiver) = oneshot::channel();
        let settlement = Arc::new(Settlement::new(link, sender));
        let deadline = Instant::now() + self.load_timeout;

        for kind in [LinkEventKind::Error, LinkEventKind::Load] {
            let listener_settlement = Arc::clone(&settlement);
            let file = file.clone();
            let logger = self.logger.clone();
            let id = link.add_listener(
                kind,
                Arc::new(move |event: &LinkEvent| match event {
                    LinkEvent::Load => {
                        if listener_settlement.settle(LoadOutcome::Ok) {
                            logger.debug(format_args!("CSS file \"{file}\" loaded."));
                        }
                    }
                    LinkEvent::Error { message } => {
                        let outcome = LoadOutcome::Error {
                            file: file.clone(),
                            detail: LoadErrorDetail::new(message.clone()),
                        };
                        if listener_settlement.settle(outcome) {
                            logger.debug(format_args!(
                                "CSS file \"{file}\" failed to load with error detail: {message}"
                            ));
                        }
                    }
                }),
            );
            settlement.track(id);
        }

        let file = file.clone();
        let project_id = self.project_id.clone();
        let load_timeout = self.load_timeout;
        let logger = self.logger.clone();
        let guard = AbandonOnDrop(settlement);
        async move {
            let guard = guard;
            let mut receiver = receiver;
            let received = match tokio::time::timeout_at(deadline, &mut receiver).await {
                Ok(received) => received,
                Err(_) => {
                    if guard.0.settle(LoadOutcome::Timeout { file: file.clone() }) {
                        logger.debug(format_args!(
                            "CSS file \"{file}\" for project with ID \"{project_id}\" timed out and might have failed to load.  {} ms",
                            load_timeout.as_millis()
                        ));
                    }
                    receiver.await
                }
            };
            received.map_err(|_| LifecycleError::LoadTracking { file })
        }
        .boxed()
    }
}

/// One-shot settlement slot shared by the load listener, the error listener
/// and the deadline.
struct Settlement {
    link: Weak<dyn StylesheetLink>,
    state: Mutex<SettleState>,
}

enum SettleState {
    Pending {
        sender: oneshot::Sender<LoadOutcome>,
        listeners: Vec<ListenerId>,
    },
    Settled,
}

impl Settlement {
    fn new(link: &LinkRef, sender: oneshot::Sender<LoadOutcome>) -> Self {
        Self {
            link: Arc::downgrade(link),
            state: Mutex::new(SettleState::Pending {
                sender,
                listeners: Vec::new(),
            }),
        }
    }

    /// Records a registered listener. If the slot already settled, the
    /// listener is removed right away.
    fn track(&self, id: ListenerId) {
        let mut state = lock(&self.state);
        if let SettleState::Pending { listeners, .. } = &mut *state {
            listeners.push(id);
            return;
        }
        drop(state);
        self.deregister(&[id]);
    }

    /// Writes the outcome if nothing else has. Returns true for the winner.
    fn settle(&self, outcome: LoadOutcome) -> bool {
        let previous = mem::replace(&mut *lock(&self.state), SettleState::Settled);
        match previous {
            SettleState::Pending { sender, listeners } => {
                self.deregister(&listeners);
                // The receiver is gone only if the pending load was dropped.
                let _ = sender.send(outcome);
                true
            }
            SettleState::Settled => false,
        }
    }

    /// Closes the slot without an outcome.
    fn abandon(&self) {
        let previous = mem::replace(&mut *lock(&self.state), SettleState::Settled);
        if let SettleState::Pending { listeners, .. } = previous {
            self.deregister(&listeners);
        }
    }

    fn deregister(&self, ids: &[ListenerId]) {
        if let Some(link) = self.link.upgrade() {
            for id in ids {
                link.remove_listener(*id);
            }
        }
    }
}

/// Removes the listeners if the pending load is dropped before settling.
struct AbandonOnDrop(Arc<Settlement>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.abandon();
    }
}

//! Runtime context and lifecycle factory.
//!
//! A [`CssRuntime`] holds everything a project's lifecycle objects share: the
//! document, the injected build data, the mount table and the foreign
//! stylesheet observer. Independent runtimes never see each other's state.

use crate::document::Document;
use crate::link::LinkController;
use crate::lock;
use crate::logger::Logger;
use crate::mount_table::MountTable;
use crate::observer::ForeignStylesheetObserver;
use crate::options::LifecycleOptions;
use crate::strategy::{CssLifecycle, MultiMifeLifecycle, NoCssLifecycle, SingleMifeLifecycle};
use mife_css_types::{BaseUrl, CssMap, EntryPoint, ProjectId};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info_span};

/// Which lifecycle variant the build selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CssStrategy {
    /// One mounted instance per entry point at a time.
    #[default]
    SingleMife,
    /// Concurrent mounts sharing reference-counted stylesheets.
    MultiMife,
    /// CSS is not managed.
    None,
}

/// Everything the build injects into the runtime.
pub struct RuntimeConfig {
    pub document: Arc<dyn Document>,
    pub project_id: ProjectId,
    pub base_url: BaseUrl,
    pub css_map: CssMap,
    pub strategy: CssStrategy,
    /// True when the host serves unbundled sources; nothing to coordinate then.
    pub serving: bool,
}

/// Per-project runtime context.
#[derive(Clone)]
pub struct CssRuntime {
    shared: Arc<RuntimeShared>,
}

struct RuntimeShared {
    document: Arc<dyn Document>,
    project_id: ProjectId,
    base_url: BaseUrl,
    css_map: CssMap,
    strategy: CssStrategy,
    table: Arc<Mutex<MountTable>>,
    observer: Arc<Mutex<ForeignStylesheetObserver>>,
}

impl CssRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let strategy = if config.serving {
            CssStrategy::None
        } else {
            config.strategy
        };
        let observer =
            ForeignStylesheetObserver::new(Arc::clone(&config.document), config.project_id.clone());
        Self {
            shared: Arc::new(RuntimeShared {
                document: config.document,
                project_id: config.project_id,
                base_url: config.base_url,
                css_map: config.css_map,
                strategy,
                table: Arc::new(Mutex::new(MountTable::new())),
                observer: Arc::new(Mutex::new(observer)),
            }),
        }
    }

    /// The strategy lifecycles are built with, after accounting for serving mode.
    #[must_use]
    pub fn strategy(&self) -> CssStrategy {
        self.shared.strategy
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.shared.project_id
    }

    pub fn css_map(&self) -> &CssMap {
        &self.shared.css_map
    }

    /// Creates the lifecycle object for `entry_point`.
    ///
    /// One object may serve many mounts of the same entry point; there is no
    /// need to call this again for the same entry.
    pub fn lifecycle(
        &self,
        entry_point: impl Into<EntryPoint>,
        options: LifecycleOptions,
    ) -> Box<dyn CssLifecycle> {
        let entry_point = entry_point.into();
        let shared = &self.shared;
        if shared.strategy == CssStrategy::None {
            return Box::new(NoCssLifecycle::new(entry_point));
        }

        let files = shared.css_map.files_for(entry_point.as_str()).to_vec();
        let span = info_span!(
            "css_lifecycle",
            entry_point = %entry_point,
            project_id = %shared.project_id
        );
        let logger = Logger::new(options.logging.clone(), span);
        debug!(
            entry_point = %entry_point,
            strategy = ?shared.strategy,
            files = files.len(),
            "CSS lifecycle created"
        );
        let controller = LinkController::new(
            Arc::clone(&shared.document),
            shared.base_url.clone(),
            shared.project_id.clone(),
            options.load_timeout,
            logger,
        );
        let policy = options.policy();

        match shared.strategy {
            CssStrategy::MultiMife => Box::new(MultiMifeLifecycle::new(
                entry_point,
                files,
                controller,
                policy,
                Arc::clone(&shared.table),
                Arc::clone(&shared.observer),
            )),
            _ => {
                let observer = ForeignStylesheetObserver::new(
                    Arc::clone(&shared.document),
                    shared.project_id.clone(),
                );
                Box::new(SingleMifeLifecycle::new(
                    entry_point,
                    files,
                    controller,
                    policy,
                    observer,
                ))
            }
        }
    }

    /// Mount count of `file` in the shared table (multi-instance strategy).
    #[must_use]
    pub fn mount_count(&self, file: &str) -> u32 {
        lock(&self.shared.table).count(file)
    }

    /// Whether any file in the shared table is mounted.
    #[must_use]
    pub fn any_mounted(&self) -> bool {
        lock(&self.shared.table).any_mounted()
    }

    /// Number of foreign links the shared observer has detected.
    #[must_use]
    pub fn foreign_link_count(&self) -> usize {
        let observer = lock(&self.shared.observer);
        let count = lock(observer.foreign()).len();
        count
    }
}

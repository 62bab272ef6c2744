#![allow(dead_code)]

use mife_css::link::LinkController;
use mife_css::memory::MemoryDocument;
use mife_css::{
    CssLifecycle, CssRuntime, CssStrategy, LifecycleOptions, LogSink, Logger, Logging,
    RuntimeConfig,
};
use mife_css_types::{BaseUrl, CssFileName, CssMap, EntryPoint, ProjectId};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PROJECT: &str = "shell";

/// A file name tagged with the test project's marker.
pub fn css(name: &str) -> String {
    format!("assets/vpss({PROJECT}){name}")
}

pub fn file(name: &str) -> CssFileName {
    CssFileName::new(css(name)).unwrap()
}

pub fn project_id() -> ProjectId {
    ProjectId::new(PROJECT).unwrap()
}

/// Log sink that keeps every message, tagged with its level.
#[derive(Default)]
pub struct CapturingSink {
    messages: Mutex<Vec<(&'static str, String)>>,
}

impl CapturingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn at(&self, level: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at("warn")
    }
}

impl LogSink for CapturingSink {
    fn debug(&self, message: &str) {
        self.messages.lock().unwrap().push(("debug", message.to_string()));
    }

    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(("info", message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(("warn", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(("error", message.to_string()));
    }
}

pub fn logger(sink: &Arc<CapturingSink>) -> Logger {
    Logger::new(Logging::Custom(sink.clone()), tracing::Span::none())
}

pub fn controller(doc: &Arc<MemoryDocument>, timeout_ms: u64, sink: &Arc<CapturingSink>) -> LinkController {
    LinkController::new(
        doc.clone(),
        BaseUrl::new("/mfe"),
        project_id(),
        Duration::from_millis(timeout_ms),
        logger(sink),
    )
}

pub fn options(timeout_ms: u64, sink: &Arc<CapturingSink>) -> LifecycleOptions {
    LifecycleOptions {
        logging: Logging::Custom(sink.clone()),
        load_timeout: Duration::from_millis(timeout_ms),
        ..Default::default()
    }
}

/// Builds a map where each entry lists tagged file names.
pub fn css_map(entries: &[(&str, &[&str])]) -> CssMap {
    entries
        .iter()
        .map(|(entry, files)| {
            (
                EntryPoint::new(*entry),
                files.iter().map(|name| file(name)).collect(),
            )
        })
        .collect()
}

pub fn runtime(doc: &Arc<MemoryDocument>, strategy: CssStrategy, entries: &[(&str, &[&str])]) -> CssRuntime {
    CssRuntime::new(RuntimeConfig {
        document: doc.clone(),
        project_id: project_id(),
        base_url: BaseUrl::new("/mfe"),
        css_map: css_map(entries),
        strategy,
        serving: false,
    })
}

pub fn shared(lifecycle: Box<dyn CssLifecycle>) -> Arc<dyn CssLifecycle> {
    lifecycle.into()
}

/// Lets spawned tasks run up to their next suspension point.
///
/// Only valid on the current-thread runtime `#[tokio::test]` uses by default:
/// there, every yield hands the thread to the queued tasks. None of the
/// spawned lifecycle calls needs more than a couple of polls to reach its
/// first wait.
pub async fn run_pending() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Whether the most recent link for `name` is disabled.
pub fn is_disabled(doc: &MemoryDocument, name: &str) -> bool {
    use mife_css::StylesheetLink;
    doc.find(&css(name)).pop().expect("link exists").is_disabled()
}

/// Runs `mount()` and fires `load` on every link once the mount has wired
/// its listeners.
pub async fn mount_loading_all(doc: &MemoryDocument, lifecycle: &dyn CssLifecycle) {
    let mount = lifecycle.mount();
    let fire = async {
        run_pending().await;
        for link in doc.created() {
            link.fire(&mife_css::document::LinkEvent::Load);
        }
    };
    let (mounted, ()) = tokio::join!(mount, fire);
    mounted.unwrap();
}

mod common;

use common::*;
use mife_css::memory::MemoryDocument;
use mife_css::{
    CssRuntime, CssStrategy, LifecycleOptions, Logger, Logging, RuntimeConfig, DEFAULT_LOAD_TIMEOUT,
};
use mife_css_types::BaseUrl;
use pretty_assertions::assert_eq;
use std::time::Duration;

// ── strategy selection ───────────────────────────────────────────

#[test]
fn strategy_defaults_to_single_instance() {
    assert_eq!(CssStrategy::default(), CssStrategy::SingleMife);
}

#[test]
fn strategy_uses_camel_case_names() {
    let parsed: CssStrategy = serde_json::from_str("\"multiMife\"").unwrap();
    assert_eq!(parsed, CssStrategy::MultiMife);
    assert_eq!(serde_json::to_string(&CssStrategy::None).unwrap(), "\"none\"");
}

#[tokio::test]
async fn serving_mode_manages_nothing() {
    let doc = MemoryDocument::new();
    let rt = CssRuntime::new(RuntimeConfig {
        document: doc.clone(),
        project_id: project_id(),
        base_url: BaseUrl::new("/mfe"),
        css_map: css_map(&[("app", &["a.css"])]),
        strategy: CssStrategy::MultiMife,
        serving: true,
    });
    assert_eq!(rt.strategy(), CssStrategy::None);

    let app = rt.lifecycle("app", LifecycleOptions::default());
    app.bootstrap().await.unwrap();
    app.mount().await.unwrap();
    app.unmount().await.unwrap();

    assert!(doc.created().is_empty());
    assert_eq!(doc.observer_count(), 0);
}

#[tokio::test]
async fn none_strategy_manages_nothing() {
    let doc = MemoryDocument::new();
    let rt = runtime(&doc, CssStrategy::None, &[("app", &["a.css"])]);
    let app = rt.lifecycle("app", LifecycleOptions::default());

    app.mount().await.unwrap();

    assert_eq!(app.entry_point().as_str(), "app");
    assert!(doc.created().is_empty());
}

#[tokio::test]
async fn unknown_entry_point_mounts_without_files() {
    let doc = MemoryDocument::new();
    let sink = CapturingSink::new();
    let rt = runtime(&doc, CssStrategy::MultiMife, &[("app", &["a.css"])]);
    let ghost = rt.lifecycle("ghost", options(1_000, &sink));

    ghost.bootstrap().await.unwrap();
    ghost.mount().await.unwrap();
    ghost.unmount().await.unwrap();

    assert!(doc.created().is_empty());
    assert!(sink.warnings().is_empty());
}

// ── isolation ────────────────────────────────────────────────────

#[tokio::test]
async fn runtimes_do_not_share_tables() {
    let doc = MemoryDocument::new();
    let sink = CapturingSink::new();
    let first = runtime(&doc, CssStrategy::MultiMife, &[("app", &["a.css"])]);
    let second = runtime(&doc, CssStrategy::MultiMife, &[("app", &["a.css"])]);

    mount_loading_all(&doc, &*first.lifecycle("app", options(1_000, &sink))).await;

    assert_eq!(first.mount_count(&css("a.css")), 1);
    assert_eq!(second.mount_count(&css("a.css")), 0);
    assert!(!second.any_mounted());
}

#[tokio::test]
async fn lifecycles_of_one_runtime_share_a_table() {
    let doc = MemoryDocument::new();
    let sink = CapturingSink::new();
    let rt = runtime(&doc, CssStrategy::MultiMife, &[("app", &["a.css"])]);
    let first = rt.lifecycle("app", options(1_000, &sink));
    let second = rt.lifecycle("app", options(1_000, &sink));

    mount_loading_all(&doc, &*first).await;
    second.mount().await.unwrap();

    assert_eq!(rt.mount_count(&css("a.css")), 2);
    assert_eq!(doc.created().len(), 1);
}

// ── options and logging ──────────────────────────────────────────

#[test]
fn default_options() {
    let options = LifecycleOptions::default();
    assert_eq!(options.load_timeout, DEFAULT_LOAD_TIMEOUT);
    assert_eq!(DEFAULT_LOAD_TIMEOUT, Duration::from_millis(1500));
    assert!(!options.fail_on_timeout);
    assert!(!options.fail_on_error);
    assert!(matches!(options.logging, Logging::Tracing));
}

#[test]
fn logging_from_bool() {
    assert!(matches!(Logging::from(false), Logging::Off));
    assert!(matches!(Logging::from(true), Logging::Tracing));
}

#[test]
fn custom_sink_receives_every_level() {
    let sink = CapturingSink::new();
    let logger = logger(&sink);

    logger.debug(format_args!("d"));
    logger.info(format_args!("i"));
    logger.warn(format_args!("w {}", 1));
    logger.error(format_args!("e"));

    assert_eq!(sink.at("debug"), vec!["d"]);
    assert_eq!(sink.at("info"), vec!["i"]);
    assert_eq!(sink.warnings(), vec!["w 1"]);
    assert_eq!(sink.at("error"), vec!["e"]);
}

#[test]
fn silent_logger_drops_messages() {
    // Nothing to observe beyond not panicking without a subscriber.
    Logger::silent().warn(format_args!("dropped"));
    Logger::new(Logging::Tracing, tracing::Span::none()).warn(format_args!("traced"));
}

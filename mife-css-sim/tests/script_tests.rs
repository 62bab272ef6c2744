use mife_css::{CssStrategy, LifecycleOptions, Logging};
use mife_css_sim::{SimConfig, Simulation, Step, StepError, StepResult};
use mife_css_types::{BaseUrl, CssMap, EntryPoint, ProjectId};
use pretty_assertions::assert_eq;
use std::time::Duration;

const MAP: &str = r#"{
    "app": ["assets/vpss(shell)app.css", "assets/vpss(shell)shared.css"],
    "parcel": ["assets/vpss(shell)parcel.css", "assets/vpss(shell)shared.css"]
}"#;

fn config(strategy: CssStrategy) -> SimConfig {
    SimConfig {
        project_id: ProjectId::new("shell").unwrap(),
        base_url: BaseUrl::new("/mfe"),
        css_map: CssMap::from_injected(MAP).unwrap(),
        strategy,
        serving: false,
        options: LifecycleOptions {
            logging: Logging::Off,
            load_timeout: Duration::from_millis(100),
            ..Default::default()
        },
    }
}

fn script(steps: &[&str]) -> Vec<Step> {
    steps.iter().map(|step| step.parse().unwrap()).collect()
}

// ── parsing ───────────────────────────────────────────────────────

#[test]
fn parses_every_step_kind() {
    assert_eq!(
        script(&[
            "bootstrap:app",
            "mount:app",
            "unmount:app",
            "load:app.css",
            "error:app.css",
            "inject:/x/vpss(shell)y.css",
            "wait:25",
        ]),
        vec![
            Step::Bootstrap(EntryPoint::new("app")),
            Step::Mount(EntryPoint::new("app")),
            Step::Unmount(EntryPoint::new("app")),
            Step::Load("app.css".into()),
            Step::Error("app.css".into()),
            Step::Inject("/x/vpss(shell)y.css".into()),
            Step::Wait(Duration::from_millis(25)),
        ]
    );
}

#[test]
fn inject_keeps_colons_in_urls() {
    let step: Step = "inject:https://cdn.example.com/vpss(shell)a.css".parse().unwrap();
    assert_eq!(
        step,
        Step::Inject("https://cdn.example.com/vpss(shell)a.css".into())
    );
    assert_eq!(step.to_string(), "inject:https://cdn.example.com/vpss(shell)a.css");
}

#[test]
fn rejects_malformed_steps() {
    assert_eq!(
        "mount".parse::<Step>(),
        Err(StepError::MissingSeparator("mount".into()))
    );
    assert_eq!(
        "remount:app".parse::<Step>(),
        Err(StepError::UnknownKind("remount".into()))
    );
    assert_eq!(
        "mount:".parse::<Step>(),
        Err(StepError::EmptyArgument("mount:".into()))
    );
    assert_eq!(
        "wait:soon".parse::<Step>(),
        Err(StepError::InvalidWait("soon".into()))
    );
}

// ── runs ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn multi_script_shares_stylesheets() {
    let mut sim = Simulation::new(config(CssStrategy::MultiMife));
    let report = sim
        .run(&script(&[
            "bootstrap:app",
            "mount:app",
            "load:app.css",
            "load:shared.css",
            "mount:parcel",
            "load:parcel.css",
            "unmount:app",
        ]))
        .await;

    assert!(report.steps.iter().all(|step| step.result == StepResult::Ok));
    assert_eq!(report.head.len(), 3);
    let disabled: Vec<&str> = report
        .head
        .iter()
        .filter(|entry| entry.disabled)
        .map(|entry| entry.href.as_str())
        .collect();
    assert_eq!(disabled, vec!["/mfe/assets/vpss(shell)app.css"]);
    assert_eq!(sim.runtime().mount_count("assets/vpss(shell)shared.css"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mount_is_wired_before_the_next_step_on_any_runtime() {
    for _ in 0..20 {
        let mut sim = Simulation::new(config(CssStrategy::MultiMife));
        let report = sim
            .run(&script(&[
                "mount:app",
                "load:app.css",
                "load:shared.css",
                "mount:parcel",
                "unmount:parcel",
                "load:parcel.css",
            ]))
            .await;

        assert!(report.steps.iter().all(|step| step.result == StepResult::Ok));
        assert_eq!(sim.runtime().mount_count("assets/vpss(shell)app.css"), 1);
        assert_eq!(sim.runtime().mount_count("assets/vpss(shell)parcel.css"), 0);
        assert!(report.head.iter().all(|entry| entry.owned));
    }
}

#[tokio::test(start_paused = true)]
async fn wait_lets_pending_mounts_time_out() {
    let mut sim = Simulation::new(SimConfig {
        options: LifecycleOptions {
            logging: Logging::Off,
            load_timeout: Duration::from_millis(50),
            fail_on_timeout: true,
            ..Default::default()
        },
        ..config(CssStrategy::MultiMife)
    });
    let report = sim.run(&script(&["mount:app", "wait:100", "load:app.css"])).await;

    assert!(matches!(report.steps[0].result, StepResult::Failed { .. }));
    assert_eq!(report.steps[1].result, StepResult::Ok);
}

#[tokio::test(start_paused = true)]
async fn fatal_error_is_reported_on_the_mount_step() {
    let mut sim = Simulation::new(SimConfig {
        options: LifecycleOptions {
            logging: Logging::Off,
            fail_on_error: true,
            ..Default::default()
        },
        ..config(CssStrategy::SingleMife)
    });
    let report = sim
        .run(&script(&[
            "bootstrap:app",
            "mount:app",
            "error:app.css",
            "load:shared.css",
        ]))
        .await;

    assert_eq!(report.steps[0].result, StepResult::Ok);
    assert_eq!(
        report.steps[1].result,
        StepResult::Failed {
            message: "CSS load failed for file \"assets/vpss(shell)app.css\".: simulated load error"
                .into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn timeouts_resolve_without_events() {
    let mut sim = Simulation::new(config(CssStrategy::MultiMife));
    let report = sim.run(&script(&["mount:app", "wait:200"])).await;

    assert!(report.steps.iter().all(|step| step.result == StepResult::Ok));
    assert!(report.head.iter().all(|entry| !entry.disabled && entry.owned));
}

#[tokio::test]
async fn events_without_links_report_no_match() {
    let mut sim = Simulation::new(config(CssStrategy::MultiMife));
    let report = sim.run(&script(&["load:app.css"])).await;

    assert_eq!(report.steps[0].result, StepResult::NoMatch);
}

#[tokio::test]
async fn injected_links_are_disabled_with_the_last_unmount() {
    let mut sim = Simulation::new(config(CssStrategy::MultiMife));
    let report = sim
        .run(&script(&[
            "bootstrap:app",
            "inject:/mfe/assets/vpss(shell)chunk.css",
            "mount:app",
            "load:app.css",
            "load:shared.css",
            "unmount:app",
        ]))
        .await;

    let chunk = report
        .head
        .iter()
        .find(|entry| entry.href.ends_with("chunk.css"))
        .unwrap();
    assert!(!chunk.owned);
    assert!(chunk.disabled);
}

#[tokio::test]
async fn report_serializes_flat_step_results() {
    let mut sim = Simulation::new(config(CssStrategy::None));
    let report = sim.run(&script(&["mount:app"])).await;

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "head": [],
            "steps": [{ "step": "mount:app", "status": "ok" }]
        })
    );
}

//! Micro-frontend CSS lifecycle simulator
//!
//! Runs a script of lifecycle calls and stylesheet events against an
//! in-memory document and prints the resulting head plus per-step results.
//!
//! Usage:
//!   mife-css-sim --css-map map.json --project-id shell --strategy multi \
//!       bootstrap:app mount:app load:app.css unmount:app

use std::{fs, path::PathBuf, time::Duration};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mife_css::{CssStrategy, LifecycleOptions, Logging};
use mife_css_sim::{SimConfig, Simulation, Step};
use mife_css_types::{BaseUrl, CssMap, ProjectId};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Single,
    Multi,
    None,
}

impl From<StrategyArg> for CssStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Single => Self::SingleMife,
            StrategyArg::Multi => Self::MultiMife,
            StrategyArg::None => Self::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "mife-css-sim")]
#[command(about = "Scripted simulator for micro-frontend CSS lifecycles")]
struct Args {
    /// JSON file mapping entry points to their CSS files
    #[arg(long)]
    css_map: PathBuf,

    /// Project id used in the `vpss(<id>)` URL marker
    #[arg(long)]
    project_id: String,

    /// Public base URL of the bundle
    #[arg(long, default_value = "/")]
    base_url: String,

    /// Lifecycle strategy
    #[arg(long, value_enum, default_value = "single")]
    strategy: StrategyArg,

    /// Simulate development serving (CSS is not managed)
    #[arg(long)]
    serving: bool,

    /// Per-stylesheet load timeout in milliseconds
    #[arg(long, default_value = "1500")]
    load_timeout_ms: u64,

    /// Fail mount when a stylesheet times out
    #[arg(long)]
    fail_on_timeout: bool,

    /// Fail mount when a stylesheet reports an error
    #[arg(long)]
    fail_on_error: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Steps: bootstrap:<entry>, mount:<entry>, unmount:<entry>, load:<file>,
    /// error:<file>, inject:<href>, wait:<ms>
    #[arg(required = true)]
    steps: Vec<Step>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    // RUST_LOG overrides --verbose when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_ascii_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let token = fs::read_to_string(&args.css_map)
        .with_context(|| format!("reading CSS map {}", args.css_map.display()))?;
    let css_map = CssMap::from_injected(&token).context("parsing CSS map")?;
    let project_id = ProjectId::new(args.project_id).context("invalid project id")?;
    info!(
        project_id = %project_id,
        entries = css_map.len(),
        strategy = ?args.strategy,
        "simulator starting"
    );

    let mut simulation = Simulation::new(SimConfig {
        project_id,
        base_url: BaseUrl::new(args.base_url),
        css_map,
        strategy: args.strategy.into(),
        serving: args.serving,
        options: LifecycleOptions {
            logging: Logging::Tracing,
            load_timeout: Duration::from_millis(args.load_timeout_ms),
            fail_on_timeout: args.fail_on_timeout,
            fail_on_error: args.fail_on_error,
        },
    });

    let report = simulation.run(&args.steps).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

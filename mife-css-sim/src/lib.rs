//! Scripted simulation of micro-frontend CSS lifecycles.
//!
//! A script is a list of [`Step`]s run against a [`CssRuntime`] backed by a
//! [`MemoryDocument`]. Lifecycle steps stay in flight so that a later `load:`
//! or `error:` step can settle a mount that is still waiting.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use mife_css::memory::{HeadEntry, MemoryDocument};
use mife_css::{
    CssLifecycle, CssRuntime, CssStrategy, LifecycleOptions, LifecycleResult, RuntimeConfig,
};
use mife_css_types::{BaseUrl, CssMap, EntryPoint, ProjectId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Errors from parsing a script step.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StepError {
    #[error("step `{0}` is missing a `:` separator")]
    MissingSeparator(String),

    #[error("unknown step kind `{0}`")]
    UnknownKind(String),

    #[error("step `{0}` has an empty argument")]
    EmptyArgument(String),

    #[error("invalid wait duration `{0}`")]
    InvalidWait(String),
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Bootstrap(EntryPoint),
    Mount(EntryPoint),
    Unmount(EntryPoint),
    /// Fire `load` on the newest link whose href contains the fragment.
    Load(String),
    /// Fire `error` on the newest link whose href contains the fragment.
    Error(String),
    /// Append a stylesheet the engine did not create.
    Inject(String),
    Wait(Duration),
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = s
            .split_once(':')
            .ok_or_else(|| StepError::MissingSeparator(s.to_string()))?;
        if arg.is_empty() {
            return Err(StepError::EmptyArgument(s.to_string()));
        }
        let step = match kind {
            "bootstrap" => Self::Bootstrap(EntryPoint::new(arg)),
            "mount" => Self::Mount(EntryPoint::new(arg)),
            "unmount" => Self::Unmount(EntryPoint::new(arg)),
            "load" => Self::Load(arg.to_string()),
            "error" => Self::Error(arg.to_string()),
            "inject" => Self::Inject(arg.to_string()),
            "wait" => {
                let ms = arg
                    .parse()
                    .map_err(|_| StepError::InvalidWait(arg.to_string()))?;
                Self::Wait(Duration::from_millis(ms))
            }
            other => return Err(StepError::UnknownKind(other.to_string())),
        };
        Ok(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap(entry) => write!(f, "bootstrap:{entry}"),
            Self::Mount(entry) => write!(f, "mount:{entry}"),
            Self::Unmount(entry) => write!(f, "unmount:{entry}"),
            Self::Load(fragment) => write!(f, "load:{fragment}"),
            Self::Error(fragment) => write!(f, "error:{fragment}"),
            Self::Inject(href) => write!(f, "inject:{href}"),
            Self::Wait(duration) => write!(f, "wait:{}", duration.as_millis()),
        }
    }
}

/// What a step ended with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    Ok,
    Failed { message: String },
    /// A `load:`/`error:` step found no link to fire on.
    NoMatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    #[serde(flatten)]
    pub result: StepResult,
}

/// Final state of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub head: Vec<HeadEntry>,
    pub steps: Vec<StepReport>,
}

/// Everything a simulation needs besides the script.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub project_id: ProjectId,
    pub base_url: BaseUrl,
    pub css_map: CssMap,
    pub strategy: CssStrategy,
    pub serving: bool,
    pub options: LifecycleOptions,
}

/// A runtime over an in-memory document plus one lifecycle per entry point.
pub struct Simulation {
    document: Arc<MemoryDocument>,
    runtime: CssRuntime,
    options: LifecycleOptions,
    lifecycles: HashMap<EntryPoint, Arc<dyn CssLifecycle>>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let document = MemoryDocument::new();
        let runtime = CssRuntime::new(RuntimeConfig {
            document: document.clone(),
            project_id: config.project_id,
            base_url: config.base_url,
            css_map: config.css_map,
            strategy: config.strategy,
            serving: config.serving,
        });
        Self {
            document,
            runtime,
            options: config.options,
            lifecycles: HashMap::new(),
        }
    }

    pub fn document(&self) -> &Arc<MemoryDocument> {
        &self.document
    }

    pub fn runtime(&self) -> &CssRuntime {
        &self.runtime
    }

    fn lifecycle(&mut self, entry: &EntryPoint) -> Arc<dyn CssLifecycle> {
        if let Some(lifecycle) = self.lifecycles.get(entry) {
            return Arc::clone(lifecycle);
        }
        let lifecycle: Arc<dyn CssLifecycle> = self
            .runtime
            .lifecycle(entry.clone(), self.options.clone())
            .into();
        self.lifecycles.insert(entry.clone(), Arc::clone(&lifecycle));
        lifecycle
    }

    /// Runs every step in order, then waits for every lifecycle call still in
    /// flight.
    ///
    /// Lifecycle calls are driven on the caller's task: each one is polled
    /// when its step runs, so its counter updates and link wiring happen
    /// before the next step. In-flight calls are polled again after every
    /// step and throughout `wait:` steps.
    pub async fn run(&mut self, steps: &[Step]) -> Report {
        let mut results: Vec<Option<StepResult>> = vec![None; steps.len()];
        let mut in_flight: FuturesUnordered<BoxFuture<'static, (usize, LifecycleResult<()>)>> =
            FuturesUnordered::new();

        for (index, step) in steps.iter().enumerate() {
            debug!(%step, "running step");
            match step {
                Step::Bootstrap(entry) | Step::Mount(entry) | Step::Unmount(entry) => {
                    let lifecycle = self.lifecycle(entry);
                    let step = step.clone();
                    in_flight.push(
                        async move {
                            let result = match step {
                                Step::Bootstrap(_) => lifecycle.bootstrap().await,
                                Step::Mount(_) => lifecycle.mount().await,
                                _ => lifecycle.unmount().await,
                            };
                            (index, result)
                        }
                        .boxed(),
                    );
                }
                Step::Load(fragment) => {
                    results[index] = Some(fired(self.document.fire_load(fragment)));
                }
                Step::Error(fragment) => {
                    let found = self.document.fire_error(fragment, "simulated load error");
                    results[index] = Some(fired(found));
                }
                Step::Inject(href) => {
                    self.document.inject_stylesheet(href);
                    results[index] = Some(StepResult::Ok);
                }
                Step::Wait(duration) => {
                    let sleep = tokio::time::sleep(*duration);
                    tokio::pin!(sleep);
                    loop {
                        tokio::select! {
                            () = &mut sleep => break,
                            Some((done, result)) = in_flight.next() => {
                                results[done] = Some(step_result(result));
                            }
                        }
                    }
                    results[index] = Some(StepResult::Ok);
                }
            }

            while let Some(Some((done, result))) = in_flight.next().now_or_never() {
                results[done] = Some(step_result(result));
            }
        }

        while let Some((done, result)) = in_flight.next().await {
            results[done] = Some(step_result(result));
        }

        let reports: Vec<StepReport> = steps
            .iter()
            .zip(results)
            .map(|(step, result)| StepReport {
                step: step.to_string(),
                result: result.unwrap_or(StepResult::Ok),
            })
            .collect();

        let head = self.document.snapshot();
        info!(steps = reports.len(), links = head.len(), "simulation finished");
        Report {
            head,
            steps: reports,
        }
    }
}

fn step_result(result: LifecycleResult<()>) -> StepResult {
    match result {
        Ok(()) => StepResult::Ok,
        Err(err) => StepResult::Failed {
            message: error_chain(&err),
        },
    }
}

fn fired(found: bool) -> StepResult {
    if found {
        StepResult::Ok
    } else {
        StepResult::NoMatch
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

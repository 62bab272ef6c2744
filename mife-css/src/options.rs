//! Options accepted by the lifecycle factory.

use crate::logger::Logging;
use std::time::Duration;

/// Default time to wait for a stylesheet before reporting a timeout. Kept
/// well below the 3000 ms mount watchdog of the orchestration framework.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(1500);

/// Options for one lifecycle object. Immutable once the object is created.
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Where diagnostics go.
    pub logging: Logging,
    /// How long to wait for each stylesheet to load.
    pub load_timeout: Duration,
    /// Fail `mount()` when a stylesheet times out.
    pub fail_on_timeout: bool,
    /// Fail `mount()` when a stylesheet reports a load error.
    pub fail_on_error: bool,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            logging: Logging::default(),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            fail_on_timeout: false,
            fail_on_error: false,
        }
    }
}

impl LifecycleOptions {
    /// The part of the options the load aggregator cares about.
    #[must_use]
    pub fn policy(&self) -> FailurePolicy {
        FailurePolicy {
            fail_on_timeout: self.fail_on_timeout,
            fail_on_error: self.fail_on_error,
        }
    }
}

/// Which per-file load failures abort a mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailurePolicy {
    pub fail_on_timeout: bool,
    pub fail_on_error: bool,
}

//! Load outcome aggregation.
//!
//! Combines the pending loads of one `mount()` call into a single verdict
//! under the configured [`FailurePolicy`].

use crate::error::{LifecycleError, LifecycleResult};
use crate::link::PendingLoad;
use crate::logger::Logger;
use crate::options::FailurePolicy;
use futures::future::try_join_all;
use mife_css_types::LoadOutcome;

/// Waits for every pending load, then evaluates the outcomes in input order.
///
/// A tracking failure aborts immediately. Otherwise the first outcome the
/// policy treats as fatal determines the error; the rest only warn.
pub async fn settle(
    pending: Vec<PendingLoad>,
    policy: FailurePolicy,
    logger: &Logger,
) -> LifecycleResult<()> {
    let outcomes = try_join_all(pending).await?;
    for outcome in outcomes {
        match outcome {
            LoadOutcome::Ok => {}
            LoadOutcome::Error { file, detail } => {
                if policy.fail_on_error {
                    return Err(LifecycleError::LoadFailed {
                        file,
                        cause: detail,
                    });
                }
                logger.warn(format_args!("CSS load failed for file \"{file}\": {detail}"));
            }
            LoadOutcome::Timeout { file } => {
                let err = LifecycleError::LoadTimedOut { file };
                if policy.fail_on_timeout {
                    return Err(err);
                }
                logger.warn(format_args!("{err}"));
            }
        }
    }
    Ok(())
}

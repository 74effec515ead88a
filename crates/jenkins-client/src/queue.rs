//! Queue-item to build-number resolution
//!
//! A triggered build is only a queue item at first; it becomes a
//! numbered build when the server allocates an executor, or vanishes if
//! it is cancelled beforehand. The waits here drive the single-shot
//! reads ([`queue_item`](JenkinsClient::queue_item),
//! [`build_info`](JenkinsClient::build_info)) on a caller-supplied
//! cadence. Both wait futures are drop-cancellable and hold no state
//! besides the poll in flight, so any number of independent waits can
//! run concurrently against one client.

use std::time::Duration;

use tokio::time::{
    self,
    Instant,
    MissedTickBehavior,
};
use tracing::debug;

use crate::client::JenkinsClient;
use crate::error::{
    Error,
    Result,
};
use crate::types::Build;

/// Polling cadence and bounds. Nothing here is hardcoded in the waits:
/// CI builds run arbitrarily long, so the limits are the caller's call.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Gap between consecutive polls.
    pub interval: Duration,
    /// Upper bound on polls before giving up with [`Error::PollTimeout`].
    pub max_attempts: u32,
    /// Optional absolute cutoff, checked against the poll timer.
    pub deadline: Option<Instant>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: 120,
            deadline: None,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            deadline: None,
        }
    }

    /// Absolute deadline after which the wait fails with
    /// [`Error::PollTimeout`] even if attempts remain.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Terminal outcome of waiting on a queue item.
///
/// A tagged result rather than an `Option`: cancellation is a real
/// outcome the caller has to handle, not an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    /// The server scheduled the build under this number.
    Started { number: i64 },
    /// The item was cancelled (or expired) before ever acquiring an
    /// executable.
    Cancelled,
}

impl JenkinsClient {
    /// Waits for a queue item to resolve into a build number.
    ///
    /// Polls [`queue_item`](Self::queue_item) until `executable` appears
    /// (`Started`), the item reports itself cancelled or disappears
    /// (`Cancelled`), or the policy is exhausted
    /// ([`Error::PollTimeout`]). A 404 is terminal here: once an item
    /// has left the queue the server will never answer for it again.
    pub async fn wait_for_start(&self, queue_id: i64, policy: &PollPolicy) -> Result<QueueOutcome> {
        let mut ticker = time::interval(policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for attempt in 0..policy.max_attempts {
            tick(&mut ticker, policy.deadline).await?;

            match self.queue_item(queue_id).await {
                Ok(item) => {
                    if let Some(executable) = item.executable {
                        debug!(queue_id, number = executable.number, "queue item resolved");
                        return Ok(QueueOutcome::Started {
                            number: executable.number,
                        });
                    }
                    if item.cancelled {
                        debug!(queue_id, "queue item cancelled");
                        return Ok(QueueOutcome::Cancelled);
                    }
                    debug!(queue_id, attempt, why = item.why.as_deref(), "still queued");
                }
                Err(Error::NotFound(_)) => {
                    debug!(queue_id, "queue item gone before scheduling");
                    return Ok(QueueOutcome::Cancelled);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::PollTimeout(format!(
            "Queue item {queue_id} did not resolve within {} polls",
            policy.max_attempts
        )))
    }

    /// Waits for a running build to finish, returning its final
    /// projection (`building == false`, `result` set).
    pub async fn wait_for_completion(
        &self, name: &str, number: i64, policy: &PollPolicy,
    ) -> Result<Build> {
        let mut ticker = time::interval(policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for attempt in 0..policy.max_attempts {
            tick(&mut ticker, policy.deadline).await?;

            let build = self.build_info(name, number).await?;
            if !build.building && build.result.is_some() {
                debug!(name, number, result = ?build.result, "build completed");
                return Ok(build);
            }
            debug!(name, number, attempt, "build still running");
        }

        Err(Error::PollTimeout(format!(
            "Build {name} #{number} did not complete within {} polls",
            policy.max_attempts
        )))
    }
}

/// One timer beat, bounded by the policy deadline when one is set.
async fn tick(ticker: &mut time::Interval, deadline: Option<Instant>) -> Result<()> {
    match deadline {
        Some(deadline) => time::timeout_at(deadline, ticker.tick())
            .await
            .map(drop)
            .map_err(|_| Error::PollTimeout("Deadline reached while polling".to_string())),
        None => {
            ticker.tick().await;
            Ok(())
        }
    }
}

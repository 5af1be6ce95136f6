//! State-convergence engine
//!
//! A generic poll loop parameterized by pending and target status sets.
//! The engine samples remote state through a probe closure until it
//! settles in a target state, fails definitively, or runs out of its
//! timeout budget. Sampling is strictly sequential: one probe in flight,
//! a fixed delay between samples, and the first sample taken immediately.
//!
//! A stability requirement (N consecutive target observations) absorbs
//! control-plane flapping where a status is briefly observed in a target
//! state before truly settling.

use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use lustra_client::error::ApiError;

/// One probe observation.
#[derive(Debug)]
pub enum Probed<T, S> {
    /// The entity could not be observed (yet). Treated as pending, except
    /// when the target set is empty, where absence *is* the target.
    Absent,
    /// The entity was observed with a status label.
    Observed { state: T, status: S },
}

/// Why a wait did not reach its target.
#[derive(Debug)]
pub enum PollFailure<T> {
    /// The timeout budget ran out. Carries the last observed state so the
    /// caller can extract partial failure detail.
    Timeout { waited: Duration, last: Option<T> },
    /// A status outside both the pending and target sets was observed.
    /// The wait stops immediately; the caller classifies the state.
    Unexpected { status: String, last: T },
    /// A probe failed with a control-plane error.
    Api(ApiError),
}

/// A wait for a remote entity to converge on a target status.
#[derive(Debug, Clone)]
pub struct StateChange<S> {
    pending: Vec<S>,
    target: Vec<S>,
    timeout: Duration,
    delay: Duration,
    stability_count: u32,
}

impl<S> StateChange<S>
where
    S: PartialEq + fmt::Display,
{
    /// Create a wait with a stability requirement of one observation.
    #[must_use]
    pub fn new(pending: Vec<S>, target: Vec<S>, timeout: Duration, delay: Duration) -> Self {
        Self {
            pending,
            target,
            timeout,
            delay,
            stability_count: 1,
        }
    }

    /// Require `count` consecutive target observations before success.
    /// Any non-target observation in between resets the run.
    #[must_use]
    pub fn with_stability(mut self, count: u32) -> Self {
        self.stability_count = count.max(1);
        self
    }

    /// Drive the probe until convergence, definitive failure, or timeout.
    ///
    /// Returns `Ok(None)` only for waits with an empty target set, where
    /// success is defined as the entity disappearing.
    pub async fn wait<T, F, Fut>(&self, mut probe: F) -> Result<Option<T>, PollFailure<T>>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Probed<T, S>, ApiError>>,
    {
        let start = Instant::now();
        let mut last: Option<T> = None;
        let mut consecutive_target = 0u32;

        loop {
            match probe().await {
                Err(err) => return Err(PollFailure::Api(err)),
                Ok(Probed::Absent) => {
                    if self.target.is_empty() {
                        debug!("entity gone, wait complete");
                        return Ok(None);
                    }
                    debug!("entity not observed yet, still waiting");
                    consecutive_target = 0;
                }
                Ok(Probed::Observed { state, status }) => {
                    if self.target.contains(&status) {
                        consecutive_target += 1;
                        debug!(
                            status = %status,
                            occurrence = consecutive_target,
                            required = self.stability_count,
                            "observed target status"
                        );
                        if consecutive_target >= self.stability_count {
                            return Ok(Some(state));
                        }
                        last = Some(state);
                    } else if self.pending.contains(&status) {
                        debug!(status = %status, "observed pending status, still waiting");
                        consecutive_target = 0;
                        last = Some(state);
                    } else {
                        warn!(status = %status, "observed unexpected status, aborting wait");
                        return Err(PollFailure::Unexpected {
                            status: status.to_string(),
                            last: state,
                        });
                    }
                }
            }

            let waited = start.elapsed();
            if waited >= self.timeout {
                return Err(PollFailure::Timeout { waited, last });
            }
            sleep(self.delay).await;
        }
    }
}

use log::*;
use std::time::Duration;

use crate::{
    PushReleaseError, Result,
    checks::{
        delay::Delay,
        retry::{RetryConfig, RetryResult, retry_with_backoff},
        state::PollState,
    },
    config::Config,
    forge::{manager::ForgeManager, request::CommitStatus},
};

/// Polling cadence and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Wait before each status fetch.
    pub interval: Duration,
    /// Stop after this many fetches; unbounded when `None`.
    pub max_polls: Option<u32>,
    /// End polling as soon as a check reports failure or error.
    pub abort_on_failure: bool,
    pub retry: RetryConfig,
}

impl PollConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval,
            max_polls: config.max_polls,
            abort_on_failure: config.abort_on_failure,
            retry: RetryConfig::default(),
        }
    }
}

/// Terminal result of a polling session.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Every check seen has passed.
    Settled(PollState),
    /// `max_polls` fetches were made without the checks settling.
    TimedOut { polls: u32, state: PollState },
    /// A check failed while `abort_on_failure` was set.
    Failed(PollState),
}

/// Re-reads a commit's statuses until they settle.
pub struct CheckPoller<'a> {
    forge: &'a ForgeManager,
    delay: &'a dyn Delay,
    config: PollConfig,
}

impl<'a> CheckPoller<'a> {
    pub fn new(
        forge: &'a ForgeManager,
        delay: &'a dyn Delay,
        config: PollConfig,
    ) -> Self {
        Self {
            forge,
            delay,
            config,
        }
    }

    /// Poll the statuses of `sha`, starting from `state`, until a terminal
    /// outcome is reached.
    pub async fn poll(&self, sha: &str, mut state: PollState) -> Result<PollOutcome> {
        let mut polls: u32 = 0;

        loop {
            if state.is_settled() {
                info!(
                    "checks settled after {polls} polls: passed: {:?}",
                    state.passed()
                );
                return Ok(PollOutcome::Settled(state));
            }

            if let Some(max_polls) = self.config.max_polls
                && polls >= max_polls
            {
                warn!(
                    "checks did not settle after {polls} polls: pending: {:?}",
                    state.pending()
                );
                return Ok(PollOutcome::TimedOut { polls, state });
            }

            self.delay.wait(self.config.interval).await;
            polls += 1;

            let statuses = self.fetch_statuses(sha).await?;
            state.apply(&statuses);

            debug!(
                "poll {polls} for {sha}: passed: {:?}, pending: {:?}, failed: {:?}",
                state.passed(),
                state.pending(),
                state.failed()
            );

            if self.config.abort_on_failure && !state.failed().is_empty() {
                warn!("aborting: failed checks: {:?}", state.failed());
                return Ok(PollOutcome::Failed(state));
            }
        }
    }

    async fn fetch_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        let forge = self.forge;

        let result =
            retry_with_backoff(self.config.retry, self.delay, move || {
                forge.list_statuses(sha)
            })
            .await;

        match result {
            RetryResult::Success(statuses) => Ok(statuses),
            RetryResult::Permanent(err) => Err(err),
            RetryResult::Exhausted {
                last_error,
                attempts,
            } => Err(PushReleaseError::ChecksUndetermined {
                attempts,
                message: last_error.to_string(),
            }),
        }
    }
}

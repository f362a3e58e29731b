use log::*;
use std::collections::{BTreeSet, HashSet};

use crate::forge::request::{CommitStatus, StatusState};

/// Check names accumulated while polling one commit.
///
/// A name in `passed` is never removed again and never re-enters `pending`,
/// so stale or out-of-order snapshots cannot resurrect a finished check.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollState {
    passed: BTreeSet<String>,
    pending: BTreeSet<String>,
    failed: BTreeSet<String>,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passed(&self) -> &BTreeSet<String> {
        &self.passed
    }

    pub fn pending(&self) -> &BTreeSet<String> {
        &self.pending
    }

    /// Checks whose latest status in the most recent snapshot is a failure or
    /// error. Recomputed on every snapshot.
    pub fn failed(&self) -> &BTreeSet<String> {
        &self.failed
    }

    /// Every check seen so far has passed, and at least one was seen.
    pub fn is_settled(&self) -> bool {
        !self.passed.is_empty() && self.pending.is_empty()
    }

    /// Fold one status snapshot into the state, in the order returned.
    pub fn apply(&mut self, statuses: &[CommitStatus]) {
        // the host lists the newest status of a context first
        let mut seen: HashSet<&str> = HashSet::new();
        self.failed.clear();

        for status in statuses {
            let latest = seen.insert(status.context.as_str());

            if self.passed.contains(&status.context) {
                continue;
            }

            match status.state {
                StatusState::Pending => {
                    self.pending.insert(status.context.clone());
                }
                StatusState::Success => {
                    self.pending.remove(&status.context);
                    self.passed.insert(status.context.clone());
                }
                StatusState::Failure | StatusState::Error => {
                    if latest {
                        warn!("check {} reported {:?}", status.context, status.state);
                        self.failed.insert(status.context.clone());
                    }
                }
                StatusState::Unknown => {}
            }
        }
    }
}

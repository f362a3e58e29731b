use log::*;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Claimed,
    Published,
}

/// At-most-once guard for pushed commits, shared by every handler in the
/// process.
#[derive(Debug, Default)]
pub struct ReleaseGate {
    commits: Mutex<HashMap<String, GateState>>,
}

impl ReleaseGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `commit_id` for release. Returns `None` when another handler
    /// holds the claim or the commit was already published.
    pub fn claim(&self, commit_id: &str) -> Option<GateClaim<'_>> {
        let mut commits = self.lock();

        if let Some(state) = commits.get(commit_id) {
            debug!("commit {commit_id} already {state:?}");
            return None;
        }

        commits.insert(commit_id.to_string(), GateState::Claimed);

        Some(GateClaim {
            gate: self,
            commit_id: commit_id.to_string(),
            committed: false,
        })
    }

    pub fn is_published(&self, commit_id: &str) -> bool {
        self.lock().get(commit_id) == Some(&GateState::Published)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, GateState>> {
        // entries stay consistent even if a holder panicked
        self.commits.lock().unwrap_or_else(|err| err.into_inner())
    }
}

/// Exclusive claim on one commit. Dropping it without [`GateClaim::commit`]
/// frees the commit for another attempt.
#[derive(Debug)]
pub struct GateClaim<'a> {
    gate: &'a ReleaseGate,
    commit_id: String,
    committed: bool,
}

impl GateClaim<'_> {
    /// Mark the commit as published for the rest of the process lifetime.
    pub fn commit(mut self) {
        self.gate
            .lock()
            .insert(self.commit_id.clone(), GateState::Published);
        self.committed = true;
    }
}

impl Drop for GateClaim<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        let mut commits = self.gate.lock();
        if commits.get(&self.commit_id) == Some(&GateState::Claimed) {
            commits.remove(&self.commit_id);
        }
    }
}

//! Waiting for a commit's status checks to settle.
//!
//! The poller re-reads the full status list of the pushed commit at a fixed
//! interval and accumulates check names into passed and pending sets until
//! every check seen so far has passed. It does not depend on a CI provider's
//! "all checks complete" notification, so checks may appear incrementally and
//! in any order.

/// Injectable wait used between polls and retries.
pub mod delay;

/// Polling loop and its outcomes.
pub mod poller;

/// Exponential backoff for status fetches.
pub mod retry;

/// Passed/pending accumulation across polls.
pub mod state;

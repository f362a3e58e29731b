//! Commit classification, change detection, and release note rendering.
//!
//! Turns the head commit of a push into a [`change::Change`] describing the
//! version bump it implies, and renders release notes for it with Tera.

/// Builds immutable change records from push events.
pub mod change;

/// Conventional commit classification into version increments.
pub mod commit;

/// Release note rendering.
pub mod notes;

//! Interface to the repository host.
//!
//! Provides token-based authentication, tag and status lookups, and release
//! publication through a common trait.

/// Configuration and authentication for the forge connection.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Wrapper adding dry-run handling and logging around a forge.
pub mod manager;

/// Request and response types exchanged with the forge.
pub mod request;

/// Common trait for forge platform abstraction.
pub mod traits;

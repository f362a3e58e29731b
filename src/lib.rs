//! Releases pushed commits once their status checks settle.
pub mod analyzer;
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod forge;
pub mod orchestrator;
pub mod release;

pub use error::{PushReleaseError, Result};

#[cfg(test)]
pub mod test_helpers;

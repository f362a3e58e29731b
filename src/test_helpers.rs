//! Common test helper functions shared across test modules.
//!
//! This module provides reusable fixtures for push events, forge mocks and
//! injected collaborators.
use async_trait::async_trait;
use secrecy::SecretString;
use std::{sync::Mutex, time::Duration};

use crate::{
    Result,
    analyzer::{
        change::Change,
        commit::{Classification, CommitClassifier, Increment},
    },
    checks::delay::Delay,
    event::{HeadCommit, PushEvent, Repository},
    forge::{
        config::RemoteConfig,
        request::{CommitStatus, StatusState},
        traits::MockForge,
    },
};

/// Creates a push to `refs/heads/main` of `test/repo` on github.com whose
/// head commit carries `message`.
///
/// # Example
/// ```ignore
/// let event = create_test_push_event("feat: add widget");
/// ```
pub fn create_test_push_event(message: &str) -> PushEvent {
    PushEvent {
        git_ref: "refs/heads/main".to_string(),
        repository: Repository {
            full_name: "test/repo".to_string(),
            html_url: Some("https://github.com/test/repo".to_string()),
            default_branch: Some("main".to_string()),
        },
        head_commit: Some(HeadCommit {
            id: "abcdef1234567890".to_string(),
            message: message.to_string(),
            timestamp: "2024-01-15T12:00:00Z".to_string(),
        }),
    }
}

/// Creates a test RemoteConfig for `test/repo` on github.com.
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        path: "test/repo".to_string(),
        token: SecretString::from("test-token".to_string()),
        link_base_url: "https://github.com".to_string(),
        api_base_url: "https://api.github.com".to_string(),
        dry_run: false,
    }
}

/// Creates a MockForge that reports the test remote config. Other
/// expectations are left to the caller.
pub fn create_mock_forge() -> MockForge {
    let mut mock_forge = MockForge::new();
    mock_forge
        .expect_remote_config()
        .returning(create_test_remote_config);
    mock_forge
}

/// The change detected for `create_test_push_event("feat: add widget")`.
pub fn create_test_change() -> Change {
    let link =
        "https://github.com/test/repo/commit/abcdef1234567890".to_string();

    Change {
        increment: Increment::Minor,
        is_breaking: false,
        heading: Some("Features".to_string()),
        anchor: format!("[abcdef1]({link})"),
        link,
        id: "abcdef1234567890".to_string(),
        short_id: "abcdef1".to_string(),
        title: "feat: add widget".to_string(),
        message: "feat: add widget".to_string(),
    }
}

pub fn status(context: &str, state: StatusState) -> CommitStatus {
    CommitStatus {
        state,
        context: context.to_string(),
    }
}

/// Delay that returns immediately and records every requested wait.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Classifier returning the same classification for every message.
pub struct FixedClassifier(Classification);

impl FixedClassifier {
    pub fn new(increment: Increment, is_breaking: bool) -> Self {
        Self(Classification {
            increment,
            is_breaking,
        })
    }
}

impl CommitClassifier for FixedClassifier {
    fn classify(&self, _message: &str) -> Result<Classification> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::{change::ChangeDetector, commit::ConventionalClassifier},
        config::Config,
    };

    #[test]
    fn test_change_matches_detected_change() {
        let event = create_test_push_event("feat: add widget");
        let classifier = ConventionalClassifier;

        let detected = ChangeDetector::new(&classifier)
            .detect(&event, &Config::default())
            .unwrap();

        assert_eq!(detected, create_test_change());
    }

    #[tokio::test]
    async fn recording_delay_records_waits() {
        let delay = RecordingDelay::default();

        delay.wait(Duration::from_secs(1)).await;
        delay.wait(Duration::from_secs(2)).await;

        assert_eq!(
            delay.waits(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }
}

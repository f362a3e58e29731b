use serde::Serialize;

use crate::{
    PushReleaseError, Result,
    analyzer::commit::{Classification, CommitClassifier, Increment},
    config::Config,
    event::PushEvent,
};

/// Length of the abbreviated commit id used in anchors.
pub const SHORT_ID_LEN: usize = 7;

/// What kind of release a pushed commit implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub increment: Increment,
    pub is_breaking: bool,
    pub heading: Option<String>,
    /// Markdown link to the commit labelled with its short id.
    pub anchor: String,
    pub link: String,
    pub id: String,
    pub short_id: String,
    /// First line of the commit message.
    pub title: String,
    pub message: String,
}

/// Builds [`Change`] records from push events.
pub struct ChangeDetector<'a> {
    classifier: &'a dyn CommitClassifier,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(classifier: &'a dyn CommitClassifier) -> Self {
        Self { classifier }
    }

    /// Classify the head commit of the push and attach its links and heading.
    pub fn detect(&self, event: &PushEvent, config: &Config) -> Result<Change> {
        let head = event.head_commit.as_ref().ok_or_else(|| {
            PushReleaseError::invalid_event("push has no head commit")
        })?;

        let classification = self.classifier.classify(&head.message)?;

        let link = format!(
            "{}/{}/commit/{}",
            event.link_base()?,
            event.repository.full_name,
            head.id
        );
        let short_id: String = head.id.chars().take(SHORT_ID_LEN).collect();
        let title = head.message.lines().next().unwrap_or_default().to_string();

        Ok(Change {
            increment: classification.increment,
            is_breaking: classification.is_breaking,
            heading: select_heading(&classification, config),
            anchor: format!("[{short_id}]({link})"),
            link,
            id: head.id.clone(),
            short_id,
            title,
            message: head.message.clone(),
        })
    }
}

/// The major heading requires a breaking major change; a non-breaking major
/// increment gets no heading.
fn select_heading(
    classification: &Classification,
    config: &Config,
) -> Option<String> {
    match classification.increment {
        Increment::Major if classification.is_breaking => {
            Some(config.major_heading.clone())
        }
        Increment::Patch => Some(config.patch_heading.clone()),
        Increment::Minor => Some(config.minor_heading.clone()),
        _ => None,
    }
}

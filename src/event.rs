//! Push event payload consumed by the release handler.
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::{PushReleaseError, Result};

/// Web origin used for links when the payload carries no repository URL.
pub const DEFAULT_LINK_BASE: &str = "https://github.com";

/// Repository section of a push payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Repository {
    /// "owner/repo"
    pub full_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// The commit at the tip of the pushed ref.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HeadCommit {
    pub id: String,
    pub message: String,
    /// RFC 3339 commit timestamp.
    pub timestamp: String,
}

/// Subset of a GitHub push payload needed to decide on a release.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub repository: Repository,
    /// Absent when the push deleted the ref.
    #[serde(default)]
    pub head_commit: Option<HeadCommit>,
}

impl PushEvent {
    /// Parse a push payload from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let event: PushEvent = serde_json::from_str(content)?;
        event.owner_repo()?;
        Ok(event)
    }

    /// Read and parse a push payload file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Split the repository full name into owner and repo.
    pub fn owner_repo(&self) -> Result<(String, String)> {
        match self.repository.full_name.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok((owner.to_string(), repo.to_string()))
            }
            _ => Err(PushReleaseError::invalid_event(format!(
                "repository full name must be owner/repo: {}",
                self.repository.full_name
            ))),
        }
    }

    /// Branch name when the ref points at a branch.
    pub fn branch(&self) -> Option<&str> {
        self.git_ref.strip_prefix("refs/heads/")
    }

    /// Scheme and host of the repository web URL, e.g.
    /// `https://github.example.com`.
    pub fn link_base(&self) -> Result<String> {
        let Some(html_url) = &self.repository.html_url else {
            return Ok(DEFAULT_LINK_BASE.to_string());
        };

        let url = Url::parse(html_url)?;
        let host = url.host_str().ok_or_else(|| {
            PushReleaseError::invalid_event(format!(
                "repository url has no host: {html_url}"
            ))
        })?;

        match url.port() {
            Some(port) => Ok(format!("{}://{}:{}", url.scheme(), host, port)),
            None => Ok(format!("{}://{}", url.scheme(), host)),
        }
    }

    /// Commit date: the timestamp portion preceding the time separator.
    pub fn commit_date(&self) -> Option<String> {
        let head = self.head_commit.as_ref()?;
        if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(&head.timestamp)
        {
            return Some(parsed.date_naive().format("%Y-%m-%d").to_string());
        }
        head.timestamp
            .split('T')
            .next()
            .map(|date| date.to_string())
    }
}

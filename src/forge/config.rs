//! Configuration for the GitHub connection.
use secrecy::SecretString;

use crate::{Result, event::PushEvent};

/// Host of the public GitHub instance.
pub const GITHUB_HOST: &str = "github.com";

/// Remote repository connection configuration for authenticating and
/// interacting with the forge.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Full repository path ("owner/repo").
    pub path: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Web origin used for commit and compare links.
    pub link_base_url: String,
    /// Base URI of the REST API.
    pub api_base_url: String,
    /// Log write operations instead of performing them.
    pub dry_run: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: "".to_string(),
            repo: "".to_string(),
            path: "".to_string(),
            token: SecretString::from("".to_string()),
            link_base_url: "".to_string(),
            api_base_url: "".to_string(),
            dry_run: false,
        }
    }
}

impl RemoteConfig {
    /// Derive the connection for the repository a push event came from.
    pub fn from_event(
        event: &PushEvent,
        token: SecretString,
        dry_run: bool,
    ) -> Result<Self> {
        let (owner, repo) = event.owner_repo()?;
        let link_base_url = event.link_base()?;

        Ok(Self {
            owner,
            repo,
            path: event.repository.full_name.clone(),
            token,
            api_base_url: api_base_url(&link_base_url),
            link_base_url,
            dry_run,
        })
    }

    /// Link comparing two tags.
    pub fn compare_link(&self, from_tag: &str, to_tag: &str) -> String {
        format!(
            "{}/{}/compare/{}...{}",
            self.link_base_url, self.path, from_tag, to_tag
        )
    }
}

/// github.com serves its API from a dedicated host, enterprise instances
/// under `/api/v3`.
fn api_base_url(link_base_url: &str) -> String {
    match link_base_url.split_once("://") {
        Some((scheme, host)) if host == GITHUB_HOST => {
            format!("{scheme}://api.{host}")
        }
        _ => format!("{link_base_url}/api/v3"),
    }
}

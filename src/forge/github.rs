//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use reqwest::StatusCode;

use crate::{
    PushReleaseError, Result,
    forge::{
        config::RemoteConfig,
        request::{CommitStatus, ReleaseByTagResponse, ReleaseRecord, Tag},
        traits::Forge,
    },
};

/// Maximum page size accepted by the GitHub REST API.
const PAGE_SIZE: u8 = 100;

/// GitHub forge implementation using Octocrab for API interactions with
/// tags, commit statuses, and releases.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_base_url.clone();
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(
        err,
        octocrab::Error::GitHub { source, .. }
            if source.status_code == StatusCode::NOT_FOUND
    )
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_file_content(&self, path: &str) -> Result<Option<String>> {
        let result = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get_content()
            .path(path)
            .send()
            .await;

        match result {
            Err(err) if is_not_found(&err) => {
                info!("no file found for path: {path}");
                Ok(None)
            }
            Err(err) => {
                error!(
                    "encountered error getting file contents for path: {path}: {err}"
                );
                Err(err.into())
            }
            Ok(mut data) => {
                let items = data.take_items();

                if items.is_empty() {
                    info!("no file found for path: {path}");
                    return Ok(None);
                }

                if let Some(content) = items[0].decoded_content() {
                    Ok(Some(content))
                } else {
                    Err(PushReleaseError::forge(format!(
                        "failed to decode file content for path: {path}"
                    )))
                }
            }
        }
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let page = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .list_tags()
            .per_page(PAGE_SIZE)
            .send()
            .await?;

        Ok(page
            .items
            .into_iter()
            .map(|tag| Tag {
                name: tag.name,
                commit_url: tag.commit.url.to_string(),
            })
            .collect())
    }

    async fn list_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        let endpoint = format!(
            "{}/repos/{}/{}/commits/{}/statuses",
            self.base_uri, self.config.owner, self.config.repo, sha
        );

        let params = [("per_page", PAGE_SIZE)];
        let statuses: Vec<CommitStatus> =
            self.instance.get(endpoint, Some(&params)).await?;

        Ok(statuses)
    }

    async fn get_release_by_tag(
        &self,
        tag: &str,
    ) -> Result<Option<ReleaseByTagResponse>> {
        let result = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .get_by_tag(tag)
            .await;

        match result {
            Ok(release) => Ok(Some(ReleaseByTagResponse {
                tag: release.tag_name,
                url: release.html_url.to_string(),
            })),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn create_release(&self, req: ReleaseRecord) -> Result<()> {
        let release = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(&req.tag_name)
            .name(&req.name)
            .body(&req.body)
            .draft(req.draft)
            .prerelease(req.prerelease)
            .send()
            .await?;

        info!("created release {}: {}", req.tag_name, release.html_url);

        Ok(())
    }
}

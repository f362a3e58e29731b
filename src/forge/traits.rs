//! Traits related to remote git forges
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{CommitStatus, ReleaseByTagResponse, ReleaseRecord, Tag},
    },
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    async fn get_file_content(&self, path: &str) -> Result<Option<String>>;
    /// Tags ordered most recent first.
    async fn list_tags(&self) -> Result<Vec<Tag>>;
    async fn list_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>>;
    async fn get_release_by_tag(
        &self,
        tag: &str,
    ) -> Result<Option<ReleaseByTagResponse>>;
    async fn create_release(&self, req: ReleaseRecord) -> Result<()>;
}

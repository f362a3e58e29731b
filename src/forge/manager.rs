//! Manager that wraps forge implementations
use log::*;

use crate::{
    Result,
    config::{ConfigLayer, DEFAULT_CONFIG_FILE},
    forge::{
        config::RemoteConfig,
        request::{CommitStatus, ReleaseByTagResponse, ReleaseRecord, Tag},
        traits::Forge,
    },
};

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> &RemoteConfig {
        &self.remote_config
    }

    /// Load the repository's config layer, if the repository carries one.
    pub async fn load_config_layer(&self) -> Result<Option<ConfigLayer>> {
        match self.forge.get_file_content(DEFAULT_CONFIG_FILE).await? {
            Some(content) => {
                info!("loaded repository configuration: {DEFAULT_CONFIG_FILE}");
                Ok(Some(ConfigLayer::from_toml(&content)?))
            }
            None => {
                info!("repository configuration not found: using default");
                Ok(None)
            }
        }
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let tags = self.forge.list_tags().await?;
        debug!("found {} tags for {}", tags.len(), self.remote_config.path);
        Ok(tags)
    }

    pub async fn list_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        let statuses = self.forge.list_statuses(sha).await?;
        debug!("statuses for {sha}: {:?}", statuses);
        Ok(statuses)
    }

    pub async fn get_release_by_tag(
        &self,
        tag: &str,
    ) -> Result<Option<ReleaseByTagResponse>> {
        self.forge.get_release_by_tag(tag).await
    }

    pub async fn create_release(&self, req: ReleaseRecord) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create release: req: {:#?}", req);
            return Ok(());
        }

        self.forge.create_release(req).await
    }
}

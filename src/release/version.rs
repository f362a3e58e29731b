use log::*;
use semver::{BuildMetadata, Prerelease, Version};
use serde::Serialize;

use crate::{
    PushReleaseError, Result,
    analyzer::{change::Change, commit::Increment},
    forge::manager::ForgeManager,
};

/// Version of the latest release and the version about to be released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionPair {
    /// Name of the tag `current_version` was read from; `None` when the
    /// repository has no tags yet.
    pub current_tag: Option<String>,
    pub current_version: Version,
    pub next_version: Version,
}

impl VersionPair {
    pub fn next_tag(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_version)
    }
}

/// Apply a semver increment. Major resets minor and patch, minor resets
/// patch; prerelease and build metadata are always cleared.
pub fn increment_version(
    current: &Version,
    increment: Increment,
) -> Result<Version> {
    let mut next = current.clone();

    match increment {
        Increment::Major => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
        }
        Increment::Minor => {
            next.minor += 1;
            next.patch = 0;
        }
        Increment::Patch => {
            next.patch += 1;
        }
        Increment::None => return Err(PushReleaseError::NothingToRelease),
    }

    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;

    Ok(next)
}

/// Reads the latest tag from the forge and computes the next version.
pub struct VersionResolver<'a> {
    forge: &'a ForgeManager,
    tag_prefix: &'a str,
    initial_version: Option<&'a Version>,
}

impl<'a> VersionResolver<'a> {
    pub fn new(
        forge: &'a ForgeManager,
        tag_prefix: &'a str,
        initial_version: Option<&'a Version>,
    ) -> Self {
        Self {
            forge,
            tag_prefix,
            initial_version,
        }
    }

    pub async fn resolve(&self, change: &Change) -> Result<VersionPair> {
        if !change.increment.is_release() {
            return Err(PushReleaseError::NothingToRelease);
        }

        let (current_tag, current_version) = self.current_version().await?;
        let next_version = increment_version(&current_version, change.increment)?;

        info!(
            "next version: {current_version} -> {next_version} ({})",
            change.increment
        );

        Ok(VersionPair {
            current_tag,
            current_version,
            next_version,
        })
    }

    async fn current_version(&self) -> Result<(Option<String>, Version)> {
        let tags = self.forge.list_tags().await?;

        let Some(latest) = tags.first() else {
            return match self.initial_version {
                Some(version) => {
                    info!("no tags found: starting from {version}");
                    Ok((None, version.clone()))
                }
                None => Err(PushReleaseError::NoPriorTag),
            };
        };

        debug!("latest tag {} at {}", latest.name, latest.commit_url);

        let stripped = latest
            .name
            .strip_prefix(self.tag_prefix)
            .unwrap_or(&latest.name);

        Ok((Some(latest.name.clone()), Version::parse(stripped)?))
    }
}

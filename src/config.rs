//! Configuration loading and resolution.
//!
//! Settings come from three layers, resolved once before a push is handled.
//!
//! ## Resolution Precedence (highest to lowest)
//!
//! 1. Inline overrides (CLI flags)
//! 2. Repository config file (`.github/push-release.toml` or `--config`)
//! 3. Built-in defaults
//!
//! `locals` tables merge key by key with the same precedence.
use merge::Merge;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path, path::PathBuf, time::Duration};

use crate::{PushReleaseError, Result};

/// Path of the config file looked up in the repository.
pub const DEFAULT_CONFIG_FILE: &str = ".github/push-release.toml";
/// Default heading for breaking major releases.
pub const DEFAULT_MAJOR_HEADING: &str = "Breaking Changes";
/// Default heading for minor releases.
pub const DEFAULT_MINOR_HEADING: &str = "Features";
/// Default heading for patch releases.
pub const DEFAULT_PATCH_HEADING: &str = "Bug Fixes";
/// Default prefix put in front of versions to form tag names.
pub const DEFAULT_TAG_PREFIX: &str = "v";
/// Default number of seconds to wait before each status poll.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default release notes template using Tera syntax.
pub const DEFAULT_RELEASE_TEMPLATE: &str = r#"## {{ tag_name }} ({{ date }})
{% if change.heading %}
### {{ change.heading }}
{% endif %}
- {{ change.title }} ({{ change.anchor }})
{% if compare_link %}
[Compare changes]({{ compare_link }})
{% endif %}
"#;

/// Values available to the release template as custom variables.
pub type Locals = BTreeMap<String, serde_json::Value>;

/// One layer of partially specified configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Merge)]
#[serde(default)]
pub struct ConfigLayer {
    #[merge(strategy = merge::option::overwrite_none)]
    pub major_heading: Option<String>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub minor_heading: Option<String>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub patch_heading: Option<String>,
    /// Inline Tera template for release notes.
    #[merge(strategy = merge::option::overwrite_none)]
    pub release_template: Option<String>,
    /// Template file; takes priority over `release_template`.
    #[merge(strategy = merge::option::overwrite_none)]
    pub template_path: Option<PathBuf>,
    #[merge(strategy = merge_locals)]
    pub locals: Option<Locals>,
    /// Branch whose pushes are released.
    #[merge(strategy = merge::option::overwrite_none)]
    pub branch: Option<String>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub tag_prefix: Option<String>,
    /// Version assumed when the repository has no tags yet.
    #[merge(strategy = merge::option::overwrite_none)]
    pub initial_version: Option<String>,
    #[merge(strategy = merge::option::overwrite_none)]
    pub poll_interval_secs: Option<u64>,
    /// Upper bound on status polls; unbounded when unset.
    #[merge(strategy = merge::option::overwrite_none)]
    pub max_polls: Option<u32>,
    /// Stop waiting as soon as a check reports failure or error.
    #[merge(strategy = merge::option::overwrite_none)]
    pub abort_on_failure: Option<bool>,
}

/// Keeps keys already present on the left and adds the missing ones.
fn merge_locals(left: &mut Option<Locals>, right: Option<Locals>) {
    match (left.as_mut(), right) {
        (Some(existing), Some(lower)) => {
            for (key, value) in lower {
                existing.entry(key).or_insert(value);
            }
        }
        (None, Some(lower)) => *left = Some(lower),
        (_, None) => {}
    }
}

impl ConfigLayer {
    /// Parse a TOML config layer.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config layer from a local file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|err| {
            PushReleaseError::invalid_config(format!(
                "failed to read config file {}: {err}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub major_heading: String,
    pub minor_heading: String,
    pub patch_heading: String,
    pub release_template: String,
    pub template_path: Option<PathBuf>,
    pub locals: Locals,
    pub branch: Option<String>,
    pub tag_prefix: String,
    pub initial_version: Option<semver::Version>,
    pub poll_interval: Duration,
    pub max_polls: Option<u32>,
    pub abort_on_failure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            major_heading: DEFAULT_MAJOR_HEADING.into(),
            minor_heading: DEFAULT_MINOR_HEADING.into(),
            patch_heading: DEFAULT_PATCH_HEADING.into(),
            release_template: DEFAULT_RELEASE_TEMPLATE.into(),
            template_path: None,
            locals: Locals::new(),
            branch: None,
            tag_prefix: DEFAULT_TAG_PREFIX.into(),
            initial_version: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_polls: None,
            abort_on_failure: false,
        }
    }
}

impl Config {
    /// Resolve inline overrides on top of an optional file layer and the
    /// built-in defaults.
    pub fn resolve(
        overrides: ConfigLayer,
        file: Option<ConfigLayer>,
    ) -> Result<Self> {
        let mut layer = overrides;
        if let Some(file) = file {
            layer.merge(file);
        }

        let defaults = Config::default();

        let initial_version = layer
            .initial_version
            .map(|v| semver::Version::parse(v.trim_start_matches('v')))
            .transpose()?;

        if layer.max_polls == Some(0) {
            return Err(PushReleaseError::invalid_config(
                "max_polls must be greater than zero",
            ));
        }

        Ok(Self {
            major_heading: layer.major_heading.unwrap_or(defaults.major_heading),
            minor_heading: layer.minor_heading.unwrap_or(defaults.minor_heading),
            patch_heading: layer.patch_heading.unwrap_or(defaults.patch_heading),
            release_template: layer
                .release_template
                .unwrap_or(defaults.release_template),
            template_path: layer.template_path,
            locals: layer.locals.unwrap_or_default(),
            branch: layer.branch,
            tag_prefix: layer.tag_prefix.unwrap_or(defaults.tag_prefix),
            initial_version,
            poll_interval: layer
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            max_polls: layer.max_polls,
            abort_on_failure: layer.abort_on_failure.unwrap_or_default(),
        })
    }

    /// Branch releases are cut from, falling back to the repository default
    /// branch and then `main`.
    pub fn release_branch<'a>(
        &'a self,
        repo_default_branch: Option<&'a str>,
    ) -> &'a str {
        self.branch
            .as_deref()
            .or(repo_default_branch)
            .unwrap_or("main")
    }
}

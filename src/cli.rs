//! CLI argument parsing and inline configuration overrides.
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    PushReleaseError, Result,
    config::{ConfigLayer, Locals},
};

/// Environment variable holding the path of the push event payload.
pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";
/// Environment variable holding the GitHub token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Global CLI arguments for the push handler.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, global = true)]
    /// Push event payload. Falls back to GITHUB_EVENT_PATH env var.
    pub event: Option<PathBuf>,

    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, global = true)]
    /// Local config file. Defaults to .github/push-release.toml in the
    /// repository.
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    /// Branch whose pushes are released.
    pub branch: Option<String>,

    #[arg(long, global = true)]
    /// Heading for breaking major releases.
    pub major_heading: Option<String>,

    #[arg(long, global = true)]
    /// Heading for minor releases.
    pub minor_heading: Option<String>,

    #[arg(long, global = true)]
    /// Heading for patch releases.
    pub patch_heading: Option<String>,

    #[arg(long, global = true)]
    /// Inline Tera template for release notes.
    pub template: Option<String>,

    #[arg(long, global = true)]
    /// Release notes template file. Takes priority over --template.
    pub template_path: Option<PathBuf>,

    #[arg(long = "local", value_parser = parse_local, global = true)]
    /// Custom template variable as KEY=VALUE. Repeatable.
    pub locals: Vec<(String, String)>,

    #[arg(long, global = true)]
    /// Prefix put in front of versions to form tag names.
    pub tag_prefix: Option<String>,

    #[arg(long, global = true)]
    /// Version assumed when the repository has no tags yet.
    pub initial_version: Option<String>,

    #[arg(long, global = true)]
    /// Seconds to wait before each status poll.
    pub poll_interval_secs: Option<u64>,

    #[arg(long, global = true)]
    /// Give up after this many status polls.
    pub max_polls: Option<u32>,

    #[arg(long, default_value_t = false, global = true)]
    /// Stop waiting as soon as a check fails.
    pub abort_on_failure: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Log the release instead of creating it.
    pub dry_run: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Push handler subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Wait for checks on the pushed commit and publish a release.
    Handle,

    /// Print the change detected for the pushed commit as JSON.
    Detect,
}

impl Args {
    /// Path of the push event payload.
    pub fn event_path(&self) -> Result<PathBuf> {
        resolve_event_path(self.event.clone(), env::var(EVENT_PATH_ENV).ok())
    }

    /// Token from the flag, then the environment.
    pub fn token(&self) -> Result<SecretString> {
        resolve_token(&self.github_token, env::var(TOKEN_ENV).ok())
    }

    /// Configuration layer built from the flags that were given.
    pub fn config_overrides(&self) -> ConfigLayer {
        let locals = if self.locals.is_empty() {
            None
        } else {
            Some(
                self.locals
                    .iter()
                    .map(|(key, value)| {
                        (key.clone(), serde_json::Value::String(value.clone()))
                    })
                    .collect::<Locals>(),
            )
        };

        ConfigLayer {
            major_heading: self.major_heading.clone(),
            minor_heading: self.minor_heading.clone(),
            patch_heading: self.patch_heading.clone(),
            release_template: self.template.clone(),
            template_path: self.template_path.clone(),
            locals,
            branch: self.branch.clone(),
            tag_prefix: self.tag_prefix.clone(),
            initial_version: self.initial_version.clone(),
            poll_interval_secs: self.poll_interval_secs,
            max_polls: self.max_polls,
            abort_on_failure: self.abort_on_failure.then_some(true),
        }
    }
}

fn resolve_event_path(
    flag: Option<PathBuf>,
    env_value: Option<String>,
) -> Result<PathBuf> {
    flag.or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .ok_or_else(|| {
            PushReleaseError::InvalidArgs(format!(
                "must set --event or {EVENT_PATH_ENV}"
            ))
        })
}

fn resolve_token(flag: &str, env_value: Option<String>) -> Result<SecretString> {
    let mut token = flag.to_string();

    if token.is_empty()
        && let Some(env_token) = env_value
    {
        token = env_token;
    }

    if token.is_empty() {
        return Err(PushReleaseError::InvalidArgs(format!(
            "must set --github-token or {TOKEN_ENV}"
        )));
    }

    Ok(SecretString::from(token))
}

fn parse_local(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), val.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got: {value}")),
    }
}

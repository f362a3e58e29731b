//! Push handler tying change detection, check polling, version resolution
//! and publication together.
use derive_builder::Builder;
use log::*;
use std::sync::Arc;

use crate::{
    PushReleaseError, Result,
    analyzer::{
        change::{Change, ChangeDetector},
        commit::{CommitClassifier, ConventionalClassifier},
        notes::{TemplateRenderer, TeraRenderer},
    },
    checks::{
        delay::{Delay, TokioDelay},
        poller::{CheckPoller, PollConfig, PollOutcome},
        state::PollState,
    },
    config::Config,
    event::PushEvent,
    forge::{manager::ForgeManager, request::ReleaseRecord},
    release::{gate::ReleaseGate, publisher::ReleasePublisher, version::VersionResolver},
};

/// How a push was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Not a push to the release branch, or the ref was deleted.
    Ignored,
    /// The commit is being or has been released by this process.
    AlreadyHandled,
    /// The commit does not imply a version increment.
    NoIncrement,
    ChecksTimedOut { polls: u32 },
    ChecksFailed { failed: Vec<String> },
    /// The change re-derived after polling no longer implies an increment.
    NoLongerReleasable,
    /// The forge already has a release for the target tag.
    ReleaseExists { tag_name: String, url: String },
    Published(ReleaseRecord),
}

#[derive(Builder)]
#[builder(build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    pub config: Arc<Config>,
    pub forge: Arc<ForgeManager>,
    pub gate: Arc<ReleaseGate>,
    #[builder(
        default = "Arc::new(ConventionalClassifier) as Arc<dyn CommitClassifier>"
    )]
    pub classifier: Arc<dyn CommitClassifier>,
    #[builder(default = "Arc::new(TokioDelay) as Arc<dyn Delay>")]
    pub delay: Arc<dyn Delay>,
    #[builder(default = "Arc::new(TeraRenderer) as Arc<dyn TemplateRenderer>")]
    pub renderer: Arc<dyn TemplateRenderer>,
}

impl OrchestratorParamsBuilder {
    pub fn build(&self) -> Result<Orchestrator> {
        let params = self._build().map_err(|e| {
            PushReleaseError::invalid_config(format!(
                "Failed to build push handler: {}",
                e
            ))
        })?;
        Ok(Orchestrator::new(params))
    }
}

pub struct Orchestrator {
    config: Arc<Config>,
    forge: Arc<ForgeManager>,
    gate: Arc<ReleaseGate>,
    classifier: Arc<dyn CommitClassifier>,
    delay: Arc<dyn Delay>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        Self {
            config: params.config,
            forge: params.forge,
            gate: params.gate,
            classifier: params.classifier,
            delay: params.delay,
            renderer: params.renderer,
        }
    }

    /// Classify the pushed head commit without touching the forge.
    pub fn detect(&self, event: &PushEvent) -> Result<Change> {
        ChangeDetector::new(self.classifier.as_ref()).detect(event, &self.config)
    }

    /// Decide whether a push produces a release and publish it if so.
    pub async fn handle_push(&self, event: &PushEvent) -> Result<PushOutcome> {
        let Some(head) = &event.head_commit else {
            info!("ignoring push without head commit: {}", event.git_ref);
            return Ok(PushOutcome::Ignored);
        };

        let branch = self
            .config
            .release_branch(event.repository.default_branch.as_deref());

        if event.branch() != Some(branch) {
            info!(
                "ignoring push to {}: releases are cut from {branch}",
                event.git_ref
            );
            return Ok(PushOutcome::Ignored);
        }

        let Some(claim) = self.gate.claim(&head.id) else {
            info!("commit {} already handled", head.id);
            return Ok(PushOutcome::AlreadyHandled);
        };

        let change = self.detect(event)?;
        info!("commit {} implies {} increment", change.short_id, change.increment);

        if !change.increment.is_release() {
            return Ok(PushOutcome::NoIncrement);
        }

        let poller = CheckPoller::new(
            &self.forge,
            self.delay.as_ref(),
            PollConfig::from_config(&self.config),
        );

        match poller.poll(&head.id, PollState::new()).await? {
            PollOutcome::Settled(_) => {}
            PollOutcome::TimedOut { polls, .. } => {
                return Ok(PushOutcome::ChecksTimedOut { polls });
            }
            PollOutcome::Failed(state) => {
                return Ok(PushOutcome::ChecksFailed {
                    failed: state.failed().iter().cloned().collect(),
                });
            }
        }

        let change = self.detect(event)?;
        if !change.increment.is_release() {
            warn!("commit {} no longer implies a release", change.short_id);
            return Ok(PushOutcome::NoLongerReleasable);
        }

        let versions = VersionResolver::new(
            &self.forge,
            &self.config.tag_prefix,
            self.config.initial_version.as_ref(),
        )
        .resolve(&change)
        .await?;

        let tag_name = versions.next_tag(&self.config.tag_prefix);

        if let Some(existing) = self.forge.get_release_by_tag(&tag_name).await? {
            info!("release {} already exists: {}", existing.tag, existing.url);
            claim.commit();
            return Ok(PushOutcome::ReleaseExists {
                tag_name: existing.tag,
                url: existing.url,
            });
        }

        let release = ReleasePublisher::new(&self.forge, self.renderer.as_ref())
            .publish(event, &change, &versions, &self.config)
            .await?;

        claim.commit();

        Ok(PushOutcome::Published(release))
    }
}

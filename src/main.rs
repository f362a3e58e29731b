use clap::Parser;
use log::*;
use std::sync::Arc;

use push_release::{
    Result,
    analyzer::{change::ChangeDetector, commit::ConventionalClassifier},
    cli::{self, Args},
    config::{Config, ConfigLayer},
    event::PushEvent,
    forge::{config::RemoteConfig, github::Github, manager::ForgeManager},
    orchestrator::{Orchestrator, PushOutcome},
    release::gate::ReleaseGate,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("push_release")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

/// Local `--config` file when given, otherwise the repository's config file.
async fn load_file_layer(
    args: &Args,
    forge: &ForgeManager,
) -> Result<Option<ConfigLayer>> {
    match &args.config {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            Ok(Some(ConfigLayer::from_file(path).await?))
        }
        None => forge.load_config_layer().await,
    }
}

async fn handle(args: &Args, event: PushEvent) -> Result<()> {
    let remote = RemoteConfig::from_event(&event, args.token()?, args.dry_run)?;
    let forge = Arc::new(ForgeManager::new(Box::new(Github::new(remote)?)));

    let file_layer = load_file_layer(args, &forge).await?;
    let config = Config::resolve(args.config_overrides(), file_layer)?;

    let orchestrator = Orchestrator::builder()
        .config(Arc::new(config))
        .forge(forge)
        .gate(Arc::new(ReleaseGate::new()))
        .build()?;

    let outcome = match orchestrator.handle_push(&event).await {
        Ok(outcome) => outcome,
        Err(err) if err.is_no_release() => {
            warn!("no release: {err}");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    match outcome {
        PushOutcome::Published(release) => {
            info!("published release {}", release.tag_name)
        }
        PushOutcome::ReleaseExists { tag_name, url } => {
            info!("release {tag_name} already exists: {url}")
        }
        PushOutcome::ChecksTimedOut { polls } => {
            warn!("no release: checks did not settle after {polls} polls")
        }
        PushOutcome::ChecksFailed { failed } => {
            warn!("no release: failed checks: {}", failed.join(", "))
        }
        outcome => info!("no release: {outcome:?}"),
    }

    Ok(())
}

async fn detect(args: &Args, event: PushEvent) -> Result<()> {
    let file_layer = match &args.config {
        Some(path) => Some(ConfigLayer::from_file(path).await?),
        None => None,
    };
    let config = Config::resolve(args.config_overrides(), file_layer)?;

    let change =
        ChangeDetector::new(&ConventionalClassifier).detect(&event, &config)?;

    println!("{}", serde_json::to_string_pretty(&change)?);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(args.debug)?;

    let event = PushEvent::from_file(&args.event_path()?).await?;

    match args.command {
        cli::Command::Handle => handle(&args, event).await,
        cli::Command::Detect => detect(&args, event).await,
    }
}

use log::*;
use std::path::Path;

use crate::{PushReleaseError, Result, config::Config};

/// Renders release notes from a template and its variables.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, context: &tera::Context) -> Result<String>;
}

/// One-off Tera rendering with autoescape disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraRenderer;

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        Ok(tera::Tera::one_off(template, context, false)?)
    }
}

/// Template source for release notes: the configured template file when set,
/// otherwise the inline template.
pub async fn load_template(config: &Config) -> Result<String> {
    let Some(template_path) = &config.template_path else {
        return Ok(config.release_template.clone());
    };

    let resolved = resolve_path(template_path)?;
    debug!("loading release template from {}", resolved.display());

    tokio::fs::read_to_string(&resolved).await.map_err(|err| {
        PushReleaseError::invalid_config(format!(
            "failed to read release template {}: {err}",
            resolved.display()
        ))
    })
}

fn resolve_path(path: &Path) -> Result<std::path::PathBuf> {
    Ok(std::path::absolute(path)?)
}

use log::*;

use crate::{
    PushReleaseError, Result,
    analyzer::{
        change::Change,
        notes::{TemplateRenderer, load_template},
    },
    config::Config,
    event::PushEvent,
    forge::{manager::ForgeManager, request::ReleaseRecord},
    release::version::VersionPair,
};

/// Renders release notes and creates the release on the forge.
pub struct ReleasePublisher<'a> {
    forge: &'a ForgeManager,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> ReleasePublisher<'a> {
    pub fn new(
        forge: &'a ForgeManager,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self { forge, renderer }
    }

    /// Build the release for `versions.next_version` without publishing it.
    pub async fn build_release(
        &self,
        event: &PushEvent,
        change: &Change,
        versions: &VersionPair,
        config: &Config,
    ) -> Result<ReleaseRecord> {
        let prefix = &config.tag_prefix;
        let tag_name = versions.next_tag(prefix);
        let remote = self.forge.remote_config();

        let date = event.commit_date().ok_or_else(|| {
            PushReleaseError::invalid_event("push has no head commit")
        })?;

        let mut context = tera::Context::new();

        // locals first so the built-in variables win on collisions
        for (key, value) in &config.locals {
            context.insert(key, value);
        }

        context.insert("current_version", &versions.current_version);
        context.insert("next_version", &versions.next_version);
        context.insert("change", change);
        context.insert("owner", &remote.owner);
        context.insert("repo", &remote.repo);
        context.insert("date", &date);
        context.insert("repository", &event.repository.full_name);
        // empty for the first release: there is no tag to compare against
        let compare_link = versions
            .current_tag
            .as_deref()
            .map(|from| remote.compare_link(from, &tag_name))
            .unwrap_or_default();
        context.insert("compare_link", &compare_link);
        context.insert("tag_name", &tag_name);
        context.insert("tag_prefix", prefix);

        let template = load_template(config).await?;
        let body = self.renderer.render(&template, &context)?;

        Ok(ReleaseRecord {
            name: tag_name.clone(),
            tag_name,
            body: body.trim().to_string(),
            draft: false,
            prerelease: false,
        })
    }

    /// Render the notes and make a single create-release call.
    pub async fn publish(
        &self,
        event: &PushEvent,
        change: &Change,
        versions: &VersionPair,
        config: &Config,
    ) -> Result<ReleaseRecord> {
        let release = self
            .build_release(event, change, versions, config)
            .await?;

        info!("publishing release {}", release.tag_name);
        self.forge.create_release(release.clone()).await?;

        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyzer::notes::TeraRenderer, test_helpers};
    use semver::Version;
    use std::io::Write;

    fn versions(current: &str, next: &str) -> VersionPair {
        VersionPair {
            current_tag: Some(format!("v{current}")),
            current_version: Version::parse(current).unwrap(),
            next_version: Version::parse(next).unwrap(),
        }
    }

    fn config_with_template(template: &str) -> Config {
        Config {
            release_template: template.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn exposes_release_variables_to_template() {
        let forge =
            ForgeManager::new(Box::new(test_helpers::create_mock_forge()));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("feat: add widget");
        let change = test_helpers::create_test_change();
        let config = config_with_template(
            "{{ owner }}|{{ repo }}|{{ repository }}|{{ date }}|\
             {{ current_version }}|{{ next_version }}|{{ tag_name }}|\
             {{ change.short_id }}|{{ compare_link }}",
        );

        let release = publisher
            .build_release(&event, &change, &versions("1.4.0", "1.5.0"), &config)
            .await
            .unwrap();

        assert_eq!(
            release.body,
            "test|repo|test/repo|2024-01-15|1.4.0|1.5.0|v1.5.0|abcdef1|\
             https://github.com/test/repo/compare/v1.4.0...v1.5.0"
        );
        assert_eq!(release.tag_name, "v1.5.0");
        assert_eq!(release.name, "v1.5.0");
        assert!(!release.draft);
        assert!(!release.prerelease);
    }

    #[tokio::test]
    async fn locals_are_available_but_cannot_shadow_builtins() {
        let forge =
            ForgeManager::new(Box::new(test_helpers::create_mock_forge()));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("fix: x");
        let change = test_helpers::create_test_change();
        let mut config =
            config_with_template("{{ product }} {{ next_version }}");
        config
            .locals
            .insert("product".into(), serde_json::json!("Widgets"));
        config
            .locals
            .insert("next_version".into(), serde_json::json!("9.9.9"));

        let release = publisher
            .build_release(&event, &change, &versions("1.2.3", "1.2.4"), &config)
            .await
            .unwrap();

        assert_eq!(release.body, "Widgets 1.2.4");
    }

    #[tokio::test]
    async fn body_is_trimmed() {
        let forge =
            ForgeManager::new(Box::new(test_helpers::create_mock_forge()));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("fix: x");
        let change = test_helpers::create_test_change();
        let config = config_with_template("\n\n  notes  \n\n");

        let release = publisher
            .build_release(&event, &change, &versions("1.2.3", "1.2.4"), &config)
            .await
            .unwrap();

        assert_eq!(release.body, "notes");
    }

    #[tokio::test]
    async fn template_file_takes_priority() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from file {{ tag_name }}").unwrap();
        file.flush().unwrap();

        let forge =
            ForgeManager::new(Box::new(test_helpers::create_mock_forge()));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("fix: x");
        let change = test_helpers::create_test_change();
        let config = Config {
            release_template: "inline".into(),
            template_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let release = publisher
            .build_release(&event, &change, &versions("1.2.3", "1.2.4"), &config)
            .await
            .unwrap();

        assert_eq!(release.body, "from file v1.2.4");
    }

    #[tokio::test]
    async fn default_template_renders_heading_and_anchor() {
        let forge =
            ForgeManager::new(Box::new(test_helpers::create_mock_forge()));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("feat: add widget");
        let change = test_helpers::create_test_change();

        let release = publisher
            .build_release(
                &event,
                &change,
                &versions("1.4.0", "1.5.0"),
                &Config::default(),
            )
            .await
            .unwrap();

        assert!(release.body.starts_with("## v1.5.0 (2024-01-15)"));
        assert!(release.body.contains("### Features"));
        assert!(release.body.contains(
            "- feat: add widget ([abcdef1](https://github.com/test/repo/commit/abcdef1234567890))"
        ));
    }

    #[tokio::test]
    async fn first_release_has_no_compare_link() {
        let forge =
            ForgeManager::new(Box::new(test_helpers::create_mock_forge()));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("feat: add widget");
        let change = test_helpers::create_test_change();
        let versions = VersionPair {
            current_tag: None,
            ..versions("0.0.0", "0.1.0")
        };

        let release = publisher
            .build_release(&event, &change, &versions, &Config::default())
            .await
            .unwrap();

        assert!(release.body.starts_with("## v0.1.0 (2024-01-15)"));
        assert!(!release.body.contains("Compare changes"));
        assert!(!release.body.contains("/compare/"));
    }

    #[tokio::test]
    async fn publish_creates_release_once() {
        let mut mock_forge = test_helpers::create_mock_forge();
        mock_forge
            .expect_create_release()
            .withf(|req| req.tag_name == "v1.2.4" && req.body == "notes")
            .times(1)
            .returning(|_| Ok(()));
        let forge = ForgeManager::new(Box::new(mock_forge));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("fix: x");
        let change = test_helpers::create_test_change();

        let release = publisher
            .publish(
                &event,
                &change,
                &versions("1.2.3", "1.2.4"),
                &config_with_template("notes"),
            )
            .await
            .unwrap();

        assert_eq!(release.tag_name, "v1.2.4");
    }

    #[tokio::test]
    async fn publish_propagates_forge_errors() {
        let mut mock_forge = test_helpers::create_mock_forge();
        mock_forge
            .expect_create_release()
            .times(1)
            .returning(|_| Err(PushReleaseError::forge("boom")));
        let forge = ForgeManager::new(Box::new(mock_forge));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("fix: x");
        let change = test_helpers::create_test_change();

        let result = publisher
            .publish(
                &event,
                &change,
                &versions("1.2.3", "1.2.4"),
                &config_with_template("notes"),
            )
            .await;

        assert!(matches!(result, Err(PushReleaseError::ForgeError(_))));
    }

    #[tokio::test]
    async fn template_error_is_not_published() {
        let mut mock_forge = test_helpers::create_mock_forge();
        mock_forge.expect_create_release().never();
        let forge = ForgeManager::new(Box::new(mock_forge));
        let renderer = TeraRenderer;
        let publisher = ReleasePublisher::new(&forge, &renderer);
        let event = test_helpers::create_test_push_event("fix: x");
        let change = test_helpers::create_test_change();

        let result = publisher
            .publish(
                &event,
                &change,
                &versions("1.2.3", "1.2.4"),
                &config_with_template("{{ missing_variable }}"),
            )
            .await;

        assert!(matches!(result, Err(PushReleaseError::TemplateError(_))));
    }
}

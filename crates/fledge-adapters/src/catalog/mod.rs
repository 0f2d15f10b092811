//! Built-in renderer catalog.
//!
//! [`builtin_registry`] registers one [`BundleRenderer`] per
//! (platform, state management) pair plus the universal renderer, so every
//! valid configuration has a renderer to select.

mod assets;
mod bundle;

use std::sync::Arc;

use fledge_core::application::TemplateRegistry;
use fledge_core::domain::{Platform, StateManagement};
use tracing::debug;

pub use bundle::BundleRenderer;

/// Registry holding every built-in renderer.
pub fn builtin_registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new().with(Arc::new(BundleRenderer::universal()));
    for platform in Platform::ALL {
        for state in StateManagement::ALL {
            registry.register(Arc::new(BundleRenderer::single(platform, state)));
        }
    }
    debug!(renderers = registry.len(), "Built-in catalog registered");
    registry
}

#[cfg(test)]
mod tests {
    use fledge_core::application::{UNIVERSAL_RENDERER, ports::RendererKind};
    use fledge_core::domain::{FeatureFlags, ProjectConfig, RenderContext};

    use super::*;

    #[test]
    fn covers_every_pair_and_universal() {
        let registry = builtin_registry();
        assert_eq!(
            registry.len(),
            Platform::ALL.len() * StateManagement::ALL.len() + 1
        );
        assert!(registry.get(UNIVERSAL_RENDERER).is_some());
    }

    #[test]
    fn selection_matches_renderer_kind() {
        let registry = builtin_registry();
        for platform in Platform::ALL {
            for state in StateManagement::ALL {
                let config = ProjectConfig::builder()
                    .app_name("demo")
                    .platform(platform)
                    .state_management(state)
                    .build()
                    .unwrap();
                let renderer = registry.select_for(&config).unwrap();
                assert_eq!(
                    renderer.kind(),
                    RendererKind::Bundle {
                        platform,
                        state_management: state
                    }
                );
            }
        }
    }

    #[test]
    fn rendered_content_never_mentions_the_output_dir() {
        let everything = FeatureFlags {
            theme: true,
            localization: true,
            env: true,
            api_client: true,
            tests: true,
        };
        let mut configs: Vec<ProjectConfig> = Vec::new();
        for platform in Platform::ALL {
            for state in StateManagement::ALL {
                configs.push(
                    ProjectConfig::builder()
                        .app_name("demo")
                        .platform(platform)
                        .state_management(state)
                        .features(everything)
                        .build()
                        .unwrap(),
                );
            }
        }
        configs.push(
            ProjectConfig::builder()
                .app_name("demo")
                .platforms(Platform::ALL)
                .features(everything)
                .build()
                .unwrap(),
        );

        let registry = builtin_registry();
        let marker = "/srv/unique-output-marker";
        for config in configs {
            let renderer = registry.select_for(&config).unwrap();
            let context = RenderContext::new(Arc::new(config), marker);
            for file in renderer.render(&context).unwrap() {
                assert!(
                    !file.content().contains("unique-output-marker"),
                    "{} embeds the output dir in {}",
                    renderer.name(),
                    file.path()
                );
            }
        }
    }
}

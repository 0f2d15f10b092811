//! The built-in renderer.

use fledge_core::{
    application::{
        ports::{RendererKind, TemplateRenderer},
        registry::{UNIVERSAL_RENDERER, selection_key},
    },
    domain::{GeneratedFile, Platform, RenderContext, StateManagement},
    error::FledgeResult,
};
use tracing::{instrument, trace};

use super::assets;

/// Renders a Flutter application from the static bundle in [`assets`].
///
/// A single-platform bundle renders its own platform and state management.
/// The universal bundle renders every platform in the configuration with
/// the configured state management, plus an adaptive layout helper.
#[derive(Debug, Clone)]
pub struct BundleRenderer {
    name: String,
    description: String,
    kind: RendererKind,
}

impl BundleRenderer {
    pub fn single(platform: Platform, state: StateManagement) -> Self {
        Self {
            name: selection_key(platform, state),
            description: format!("{} app using {}", title(platform.as_str()), state),
            kind: RendererKind::Bundle {
                platform,
                state_management: state,
            },
        }
    }

    pub fn universal() -> Self {
        Self {
            name: UNIVERSAL_RENDERER.to_string(),
            description: "Multi-platform app with an adaptive layout".to_string(),
            kind: RendererKind::Universal,
        }
    }
}

impl TemplateRenderer for BundleRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn kind(&self) -> RendererKind {
        self.kind
    }

    #[instrument(skip_all, fields(renderer = %self.name))]
    fn render(&self, context: &RenderContext) -> FledgeResult<Vec<GeneratedFile>> {
        let config = context.config();
        let features = config.features();
        let (platforms, state) = match self.kind {
            RendererKind::Bundle {
                platform,
                state_management,
            } => (vec![platform], state_management),
            RendererKind::Universal => (
                config.platforms().iter().copied().collect(),
                config.state_management(),
            ),
        };

        let mut files = Files::new(context);
        files.add("pubspec.yaml", &assets::pubspec(state, features))?;
        files.add("README.md", &assets::readme(features))?;
        files.add(".gitignore", assets::GITIGNORE)?;
        files.add("analysis_options.yaml", assets::ANALYSIS_OPTIONS)?;
        files.add("lib/main.dart", &assets::main_dart(state, features))?;
        files.add("lib/app.dart", &assets::app_dart(state, features))?;
        files.add("lib/screens/home_screen.dart", assets::home_screen(state))?;
        let (state_path, state_body) = assets::state_file(state);
        files.add(state_path, state_body)?;

        for platform in platforms {
            for (path, body) in assets::platform_files(platform) {
                files.add(path, body)?;
            }
        }
        if self.kind == RendererKind::Universal {
            files.add("lib/platform/adaptive_layout.dart", assets::ADAPTIVE_LAYOUT)?;
        }

        if features.theme {
            files.add("lib/theme/app_theme.dart", assets::APP_THEME)?;
        }
        if features.localization {
            files.add("l10n.yaml", assets::L10N_CONFIG)?;
            files.add("lib/l10n/app_en.arb", assets::L10N_EN)?;
        }
        if features.env {
            // Local secrets survive regeneration.
            files.add_preserved(".env", assets::ENV)?;
            files.add(".env.example", assets::ENV_EXAMPLE)?;
        }
        if features.api_client {
            files.add("lib/data/api_client.dart", assets::API_CLIENT)?;
        }
        if features.tests {
            files.add("test/widget_test.dart", assets::WIDGET_TEST)?;
        }

        trace!(count = files.out.len(), "Bundle rendered");
        Ok(files.out)
    }
}

struct Files<'a> {
    context: &'a RenderContext,
    out: Vec<GeneratedFile>,
}

impl<'a> Files<'a> {
    fn new(context: &'a RenderContext) -> Self {
        Self {
            context,
            out: Vec::new(),
        }
    }

    fn add(&mut self, path: &str, body: &str) -> FledgeResult<()> {
        self.out
            .push(GeneratedFile::new(path, self.context.render(body))?);
        Ok(())
    }

    fn add_preserved(&mut self, path: &str, body: &str) -> FledgeResult<()> {
        self.out
            .push(GeneratedFile::new(path, self.context.render(body))?.preserve_existing());
        Ok(())
    }
}

fn title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

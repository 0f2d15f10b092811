//! Template registry: name-keyed renderer storage and selection.
//!
//! Selection is a total function over (platform-set cardinality, platform,
//! state management):
//!
//! | Platforms | Renderer looked up |
//! |-----------|--------------------|
//! | 2 or more | [`UNIVERSAL_RENDERER`] |
//! | exactly 1 | [`selection_key`]`(platform, state)` |
//!
//! There is no fallback and no partial matching. A missing key is `None`;
//! the orchestrator turns it into a selection error.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::TemplateRenderer;
use crate::domain::{Platform, ProjectConfig, StateManagement};

/// Reserved registry name of the multi-platform renderer.
pub const UNIVERSAL_RENDERER: &str = "universal";

/// Registry name a single-platform renderer must use to be selectable.
pub fn selection_key(platform: Platform, state: StateManagement) -> String {
    format!("{platform}-{state}")
}

/// Renderers keyed by [`TemplateRenderer::name`].
#[derive(Default)]
pub struct TemplateRegistry {
    renderers: HashMap<String, Arc<dyn TemplateRenderer>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `renderer` under its name.
    ///
    /// Last registration wins; the replaced renderer is returned.
    pub fn register(&mut self, renderer: Arc<dyn TemplateRenderer>) -> Option<Arc<dyn TemplateRenderer>> {
        let name = renderer.name().to_string();
        let previous = self.renderers.insert(name.clone(), renderer);
        if previous.is_some() {
            debug!(renderer = %name, "Replaced registered renderer");
        }
        previous
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.register(renderer);
        self
    }

    /// Pick the renderer for `config`, or `None` when nothing is registered
    /// for its exact shape.
    pub fn select_for(&self, config: &ProjectConfig) -> Option<Arc<dyn TemplateRenderer>> {
        let key = match config.single_platform() {
            Some(platform) => selection_key(platform, config.state_management()),
            None if config.is_multi_platform() => UNIVERSAL_RENDERER.to_string(),
            None => return None,
        };

        let selected = self.renderers.get(&key).cloned();
        debug!(key = %key, found = selected.is_some(), "Renderer lookup");
        selected
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TemplateRenderer>> {
        self.renderers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered renderers, sorted by name.
    pub fn renderers(&self) -> Vec<Arc<dyn TemplateRenderer>> {
        let mut all: Vec<_> = self.renderers.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("renderers", &self.names())
            .finish()
    }
}

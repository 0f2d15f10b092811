//! Context handed to every renderer.
//!
//! A **Value Object** holding the configuration of the current generation
//! run and the absolute output directory. Renderers only ever receive
//! `&RenderContext`; nothing in the pipeline mutates it after construction.
//!
//! ## Built-in Variables
//!
//! | Variable | Example | Source |
//! |----------|---------|--------|
//! | `APP_NAME` | "shopClient" | Configuration |
//! | `APP_NAME_SNAKE` | "shop_client" | Computed |
//! | `APP_NAME_KEBAB` | "shop-client" | Computed |
//! | `APP_NAME_PASCAL` | "ShopClient" | Computed |
//! | `STATE_MANAGEMENT` | "riverpod" | Configuration |
//! | `PLATFORMS` | "mobile, web" | Configuration |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::config::ProjectConfig;
use crate::domain::value_objects::Platform;

#[derive(Debug, Clone)]
pub struct RenderContext {
    config: Arc<ProjectConfig>,
    output_dir: PathBuf,

    /// `BTreeMap` keeps substitution order fixed, so equal contexts always
    /// render byte-identical output.
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Create a render context with automatic variable derivation.
    pub fn new(config: Arc<ProjectConfig>, output_dir: impl Into<PathBuf>) -> Self {
        let name = config.app_name().to_string();
        let platforms: Vec<&str> = config.platforms().iter().map(Platform::as_str).collect();

        let mut vars = BTreeMap::new();
        vars.insert("APP_NAME".to_string(), name.clone());
        vars.insert("APP_NAME_SNAKE".to_string(), to_snake_case(&name));
        vars.insert("APP_NAME_KEBAB".to_string(), to_kebab_case(&name));
        vars.insert("APP_NAME_PASCAL".to_string(), to_pascal_case(&name));
        vars.insert(
            "STATE_MANAGEMENT".to_string(),
            config.state_management().to_string(),
        );
        vars.insert("PLATFORMS".to_string(), platforms.join(", "));

        Self {
            config,
            output_dir: output_dir.into(),
            variables: vars,
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<ProjectConfig> {
        Arc::clone(&self.config)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Get a variable value if it exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Render a template string by replacing `{{VARIABLE}}` placeholders.
    ///
    /// Unknown placeholders are left as-is.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();

        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }

        result
    }
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

/// "shopClient" -> "shop_client". Dart file and package names use this.
fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// "shop_client" -> "ShopClient". Used for widget and class names.
fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split an identifier into lowercase words.
///
/// Boundaries: `_`, `-` and whitespace; a lowercase→uppercase transition
/// (`myApp`); the end of an acronym (`HTTPClient` → `http`, `client`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::StateManagement;

    fn context(name: &str) -> RenderContext {
        let config = ProjectConfig::builder()
            .app_name(name)
            .platforms([Platform::Web, Platform::Mobile])
            .state_management(StateManagement::Bloc)
            .build()
            .unwrap();
        RenderContext::new(Arc::new(config), "/tmp/out")
    }

    #[test]
    fn derives_name_variants() {
        let ctx = context("shopClient");

        assert_eq!(ctx.get("APP_NAME"), Some("shopClient"));
        assert_eq!(ctx.get("APP_NAME_SNAKE"), Some("shop_client"));
        assert_eq!(ctx.get("APP_NAME_KEBAB"), Some("shop-client"));
        assert_eq!(ctx.get("APP_NAME_PASCAL"), Some("ShopClient"));
    }

    #[test]
    fn acronyms_split_at_the_last_capital() {
        assert_eq!(to_snake_case("HTTPClient"), "http_client");
        assert_eq!(to_pascal_case("my-app"), "MyApp");
    }

    #[test]
    fn renders_config_variables() {
        let ctx = context("demo");
        assert_eq!(
            ctx.render("{{APP_NAME}} uses {{STATE_MANAGEMENT}} on {{PLATFORMS}}"),
            "demo uses bloc on mobile, web"
        );
    }

    #[test]
    fn unknown_placeholders_are_preserved() {
        let ctx = context("demo");
        assert_eq!(ctx.render("{{NOPE}}"), "{{NOPE}}");
    }
}

//! Memoizing render decorator.
//!
//! [`CachingRenderer`] wraps any [`TemplateRenderer`] and answers repeated
//! requests from a [`RenderCache`]. The cache key is a [`Fingerprint`] of the
//! renderer name and *every* configuration field, including the application
//! name: rendered content embeds it, so leaving it out would hand one app's
//! files to another.
//!
//! The cache lives exactly as long as its `RenderCache` value. Nothing is
//! persisted and nothing is invalidated mid-process.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::application::{
    ApplicationError,
    ports::{RendererKind, TemplateRenderer},
};
use crate::domain::{
    CiProvider, FeatureFlags, GeneratedFile, Platform, ProjectConfig, RenderContext,
    StateManagement,
};
use crate::error::{Context, FledgeResult};

// ── Fingerprint ───────────────────────────────────────────────────────────────

/// Deterministic cache key: lowercase hex SHA-256 of a canonical JSON
/// document of the renderer name and the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

#[derive(Serialize)]
struct FingerprintInput<'a> {
    renderer: &'a str,
    app_name: &'a str,
    platforms: &'a BTreeSet<Platform>,
    state_management: StateManagement,
    ci_provider: Option<CiProvider>,
    features: FeatureFlags,
}

impl Fingerprint {
    pub fn compute(renderer: &str, config: &ProjectConfig) -> FledgeResult<Self> {
        let input = FingerprintInput {
            renderer,
            app_name: config.app_name(),
            platforms: config.platforms(),
            state_management: config.state_management(),
            ci_provider: config.ci_provider(),
            features: config.features(),
        };
        let canonical = serde_json::to_vec(&input).context("serializing cache fingerprint")?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Cache state ───────────────────────────────────────────────────────────────

/// Read-only snapshot of cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Process-lifetime memo store shared by one or more [`CachingRenderer`]s.
///
/// The map sits behind a `Mutex` so concurrent callers (for example cache
/// pre-warming) stay correct; the pipeline itself renders on one thread.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: Mutex<HashMap<Fingerprint, Vec<GeneratedFile>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            // A poisoned map still holds every stored entry.
            entries: self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
        }
    }

    fn lookup(&self, key: &Fingerprint) -> FledgeResult<Option<Vec<GeneratedFile>>> {
        let entries = self.entries.lock().map_err(|_| ApplicationError::CacheLock)?;
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: Fingerprint, files: Vec<GeneratedFile>) -> FledgeResult<()> {
        let mut entries = self.entries.lock().map_err(|_| ApplicationError::CacheLock)?;
        entries.insert(key, files);
        Ok(())
    }
}

// ── Decorator ─────────────────────────────────────────────────────────────────

/// A renderer that memoizes its inner renderer's output.
///
/// Transparent to callers: it implements [`TemplateRenderer`] and reports the
/// inner renderer's name, description and kind, so decorators stack.
pub struct CachingRenderer {
    inner: Arc<dyn TemplateRenderer>,
    cache: Arc<RenderCache>,
}

impl CachingRenderer {
    /// Wrap `inner` with a private cache.
    pub fn new(inner: Arc<dyn TemplateRenderer>) -> Self {
        Self::with_cache(inner, Arc::new(RenderCache::new()))
    }

    /// Wrap `inner`, recording into an existing cache.
    pub fn with_cache(inner: Arc<dyn TemplateRenderer>, cache: Arc<RenderCache>) -> Self {
        Self { inner, cache }
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &Arc<RenderCache> {
        &self.cache
    }
}

impl TemplateRenderer for CachingRenderer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn kind(&self) -> RendererKind {
        self.inner.kind()
    }

    #[instrument(skip_all, fields(renderer = %self.inner.name()))]
    fn render(&self, context: &RenderContext) -> FledgeResult<Vec<GeneratedFile>> {
        let key = Fingerprint::compute(self.inner.name(), context.config())?;

        if let Some(files) = self.cache.lookup(&key)? {
            self.cache.hits.fetch_add(1, Ordering::Relaxed);
            debug!(fingerprint = %key, files = files.len(), "Render cache hit");
            return Ok(files);
        }

        self.cache.misses.fetch_add(1, Ordering::Relaxed);
        debug!(fingerprint = %key, "Render cache miss");

        let files = self.inner.render(context)?;
        self.cache.store(key, files.clone())?;
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FailingRenderer, StubRenderer};

    fn config(name: &str) -> ProjectConfig {
        ProjectConfig::builder()
            .app_name(name)
            .platform(Platform::Mobile)
            .state_management(StateManagement::Provider)
            .build()
            .unwrap()
    }

    fn ctx(config: ProjectConfig) -> RenderContext {
        RenderContext::new(Arc::new(config), "/tmp/out")
    }

    #[test]
    fn second_render_is_a_hit_with_identical_output() {
        let stub = Arc::new(StubRenderer::bundle(Platform::Mobile, StateManagement::Provider));
        let cached = CachingRenderer::new(stub.clone());

        let first = cached.render(&ctx(config("demo"))).unwrap();
        let second = cached.render(&ctx(config("demo"))).unwrap();

        assert_eq!(first, second);
        assert_eq!(stub.calls(), 1);
        assert_eq!(
            cached.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn stats_count_entries_after_the_lock_is_poisoned() {
        let cache = Arc::new(RenderCache::new());
        let cached = CachingRenderer::with_cache(
            Arc::new(StubRenderer::bundle(Platform::Mobile, StateManagement::Provider)),
            Arc::clone(&cache),
        );
        cached.render(&ctx(config("demo"))).unwrap();

        let poisoner = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the render cache");
        })
        .join();

        assert!(cache.entries.is_poisoned());
        assert_eq!(cache.stats().entries, 1);
        assert!(cached.render(&ctx(config("demo"))).is_err());
    }

    #[test]
    fn app_name_is_part_of_the_key() {
        let cached = CachingRenderer::new(Arc::new(StubRenderer::bundle(
            Platform::Mobile,
            StateManagement::Provider,
        )));

        let alpha = cached.render(&ctx(config("alpha"))).unwrap();
        let beta = cached.render(&ctx(config("beta"))).unwrap();

        assert_ne!(alpha, beta);
        assert!(alpha.iter().any(|f| f.content().contains("alpha")));
        assert!(beta.iter().any(|f| f.content().contains("beta")));
        assert!(!beta.iter().any(|f| f.content().contains("alpha")));
        assert_eq!(cached.stats().misses, 2);
        assert_eq!(cached.stats().hits, 0);
    }

    #[test]
    fn fingerprint_covers_every_config_field() {
        let base = config("demo");
        let key = |c: &ProjectConfig| Fingerprint::compute("mobile-provider", c).unwrap();

        let variants = [
            base.renamed("other"),
            ProjectConfig::builder()
                .app_name("demo")
                .platforms([Platform::Mobile, Platform::Web])
                .build()
                .unwrap(),
            ProjectConfig::builder()
                .app_name("demo")
                .platform(Platform::Mobile)
                .state_management(StateManagement::Bloc)
                .build()
                .unwrap(),
            ProjectConfig::builder()
                .app_name("demo")
                .platform(Platform::Mobile)
                .ci_provider(Some(CiProvider::GitLab))
                .build()
                .unwrap(),
            ProjectConfig::builder()
                .app_name("demo")
                .platform(Platform::Mobile)
                .features(FeatureFlags {
                    localization: true,
                    ..FeatureFlags::default()
                })
                .build()
                .unwrap(),
        ];

        for variant in &variants {
            assert_ne!(key(&base), key(variant), "collision for {variant}");
        }
        assert_ne!(
            Fingerprint::compute("mobile-provider", &base).unwrap(),
            Fingerprint::compute("universal", &base).unwrap()
        );
    }

    #[test]
    fn fingerprint_is_deterministic_hex() {
        let a = Fingerprint::compute("x", &config("demo")).unwrap();
        let b = Fingerprint::compute("x", &config("demo")).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn errors_are_not_cached() {
        let failing = Arc::new(FailingRenderer::new("mobile-provider"));
        let cached = CachingRenderer::new(failing.clone());

        assert!(cached.render(&ctx(config("demo"))).is_err());
        assert!(cached.render(&ctx(config("demo"))).is_err());

        assert_eq!(failing.calls(), 2);
        assert_eq!(cached.stats().entries, 0);
    }

    #[test]
    fn decorators_stack_and_forward_kind() {
        let inner = Arc::new(StubRenderer::bundle(Platform::Web, StateManagement::Riverpod));
        let shared = Arc::new(RenderCache::new());
        let once = Arc::new(CachingRenderer::with_cache(inner.clone(), Arc::clone(&shared)));
        let twice = CachingRenderer::new(once);

        assert_eq!(twice.name(), "web-riverpod");
        assert_eq!(
            twice.kind(),
            RendererKind::Bundle {
                platform: Platform::Web,
                state_management: StateManagement::Riverpod
            }
        );

        let cfg = ProjectConfig::builder()
            .app_name("demo")
            .platform(Platform::Web)
            .state_management(StateManagement::Riverpod)
            .build()
            .unwrap();
        twice.render(&ctx(cfg.clone())).unwrap();
        twice.render(&ctx(cfg)).unwrap();

        assert_eq!(inner.calls(), 1);
        assert_eq!(shared.stats().misses, 1);
        assert_eq!(twice.stats().hits, 1);
    }

    #[test]
    fn hit_rate_handles_empty_cache() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 1,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}

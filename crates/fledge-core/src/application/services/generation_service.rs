//! Generation Service - main application orchestrator.
//!
//! One call to [`GenerationService::generate`] runs the whole pipeline:
//! 1. Validate the configuration and output path (no I/O)
//! 2. Prepare the output directory
//! 3. Select a renderer from the registry
//! 4. Render through the shared cache
//! 5. Write every file with bounded concurrency
//! 6. Persist the manifest and CI pipeline (best effort)
//!
//! Stages 1-4 short-circuit on the first error. Stage 5 always completes and
//! reports partial failure in the [`GenerationReport`] instead of raising it.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError, panic_message,
        cache::{CacheStats, CachingRenderer, RenderCache},
        ports::{CiGenerator, Filesystem, ManifestStore, RendererKind, TemplateRenderer},
        registry::TemplateRegistry,
        writer::{ParallelFileWriter, WriteFailure, WriteOperation},
    },
    domain::{DomainValidator as validator, GeneratedFile, Platform, ProjectConfig, RenderContext},
    error::FledgeResult,
};

/// Worker count used when the caller does not set one.
pub fn default_concurrency() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Information about a registered renderer for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RendererInfo {
    pub name: String,
    pub description: String,
    pub platform: Option<String>,
    pub state_management: Option<String>,
}

impl RendererInfo {
    fn from_renderer(renderer: &dyn TemplateRenderer) -> Self {
        let (platform, state_management) = match renderer.kind() {
            RendererKind::Bundle {
                platform,
                state_management,
            } => (Some(platform.to_string()), Some(state_management.to_string())),
            RendererKind::Universal => (None, None),
        };
        Self {
            name: renderer.name().to_string(),
            description: renderer.description().to_string(),
            platform,
            state_management,
        }
    }
}

/// Rendered files for a configuration, without touching the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub renderer: String,
    pub output_dir: PathBuf,
    pub files: Vec<GeneratedFile>,
}

/// Success value of a generation run.
///
/// A run that wrote some files and failed others is still a success at the
/// type level; check [`is_complete`](Self::is_complete).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub renderer: String,
    pub output_dir: PathBuf,
    pub files_generated: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub failures: Vec<WriteFailure>,
    pub manifest_path: Option<PathBuf>,
    pub ci_config_path: Option<PathBuf>,
    pub cache: CacheStats,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.files_failed == 0
    }

    pub fn manifest_written(&self) -> bool {
        self.manifest_path.is_some()
    }

    pub fn ci_config_generated(&self) -> bool {
        self.ci_config_path.is_some()
    }
}

/// Main generation service.
pub struct GenerationService {
    registry: Arc<TemplateRegistry>,
    filesystem: Arc<dyn Filesystem>,
    writer: ParallelFileWriter,
    cache: Arc<RenderCache>,
    manifest_store: Option<Arc<dyn ManifestStore>>,
    ci_generator: Option<Arc<dyn CiGenerator>>,
    concurrency: NonZeroUsize,
}

impl GenerationService {
    /// Create a service over the given registry, filesystem and cache.
    ///
    /// The cache is shared with the caller, so repeated runs in one process
    /// reuse earlier renders.
    pub fn new(
        registry: Arc<TemplateRegistry>,
        filesystem: Arc<dyn Filesystem>,
        cache: Arc<RenderCache>,
    ) -> Self {
        Self {
            registry,
            writer: ParallelFileWriter::new(Arc::clone(&filesystem)),
            filesystem,
            cache,
            manifest_store: None,
            ci_generator: None,
            concurrency: default_concurrency(),
        }
    }

    pub fn with_manifest_store(mut self, store: Arc<dyn ManifestStore>) -> Self {
        self.manifest_store = Some(store);
        self
    }

    pub fn with_ci_generator(mut self, generator: Arc<dyn CiGenerator>) -> Self {
        self.ci_generator = Some(generator);
        self
    }

    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Every registered renderer, sorted by name.
    pub fn list_renderers(&self) -> Vec<RendererInfo> {
        self.registry
            .renderers()
            .iter()
            .map(|r| RendererInfo::from_renderer(r.as_ref()))
            .collect()
    }

    /// Generate a project for `config` under `output_dir`.
    #[instrument(
        skip_all,
        fields(
            app = %config.app_name(),
            output = %output_dir.as_ref().display(),
            run_id = %Uuid::new_v4()
        )
    )]
    pub fn generate(
        &self,
        config: ProjectConfig,
        output_dir: impl AsRef<Path>,
    ) -> FledgeResult<GenerationReport> {
        info!(%config, "Generating project");

        // 1. Validate
        let output_dir = self.validate(&config, output_dir.as_ref())?;

        // 2. Prepare
        self.prepare(&output_dir)?;

        // 3. Select
        let renderer = self.select(&config)?;
        info!(renderer = %renderer.name(), kind = %renderer.kind(), "Renderer selected");

        // 4. Render
        let context = RenderContext::new(Arc::new(config), output_dir.clone());
        let files = self.render(&renderer, &context)?;

        // 5. Write
        let operations: Vec<WriteOperation> = files.into_iter().map(WriteOperation::from).collect();
        let written = self
            .writer
            .write_all(&output_dir, operations, self.concurrency)?;

        let mut report = GenerationReport {
            renderer: renderer.name().to_string(),
            output_dir,
            files_generated: written.successful,
            files_failed: written.failed,
            files_skipped: written.skipped,
            failures: written.failures(),
            manifest_path: None,
            ci_config_path: None,
            cache: self.cache.stats(),
        };

        // 6. Follow-up
        if report.is_complete() {
            report.manifest_path = self.persist_manifest(context.config(), &report.output_dir);
            report.ci_config_path = self.generate_ci(&context);
        } else {
            warn!(
                failed = report.files_failed,
                "Skipping manifest and CI because some files failed"
            );
        }

        info!(
            generated = report.files_generated,
            failed = report.files_failed,
            skipped = report.files_skipped,
            "Generation finished"
        );
        Ok(report)
    }

    /// Run validation, selection and rendering without writing anything.
    #[instrument(skip_all, fields(app = %config.app_name()))]
    pub fn plan(
        &self,
        config: ProjectConfig,
        output_dir: impl AsRef<Path>,
    ) -> FledgeResult<GenerationPlan> {
        let output_dir = self.validate(&config, output_dir.as_ref())?;
        let renderer = self.select(&config)?;
        let context = RenderContext::new(Arc::new(config), output_dir.clone());
        let files = self.render(&renderer, &context)?;

        Ok(GenerationPlan {
            renderer: renderer.name().to_string(),
            output_dir,
            files,
        })
    }

    // -------------------------------------------------------------------------
    // Stages
    // -------------------------------------------------------------------------

    /// Returns the absolute output directory.
    fn validate(&self, config: &ProjectConfig, output_dir: &Path) -> FledgeResult<PathBuf> {
        validator::validate_config(config)?;
        validator::validate_output_path(output_dir)?;

        std::path::absolute(output_dir).map_err(|e| {
            ApplicationError::FilesystemError {
                path: output_dir.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// A panicking filesystem adapter comes back as
    /// [`ApplicationError::FilesystemError`].
    #[instrument(skip_all, fields(output = %output_dir.display()))]
    fn prepare(&self, output_dir: &Path) -> FledgeResult<()> {
        let prepared = panic::catch_unwind(AssertUnwindSafe(|| {
            self.filesystem.create_dir_all(output_dir)?;
            self.filesystem.ensure_writable(output_dir)
        }));
        match prepared {
            Ok(result) => result?,
            Err(payload) => {
                warn!("Filesystem panicked while preparing the output directory");
                return Err(ApplicationError::FilesystemError {
                    path: output_dir.to_path_buf(),
                    reason: format!("filesystem panicked: {}", panic_message(payload.as_ref())),
                }
                .into());
            }
        }
        debug!("Output directory ready");
        Ok(())
    }

    fn select(&self, config: &ProjectConfig) -> FledgeResult<Arc<dyn TemplateRenderer>> {
        self.registry.select_for(config).ok_or_else(|| {
            let platforms: Vec<&str> = config.platforms().iter().map(Platform::as_str).collect();
            ApplicationError::NoRendererForConfig {
                platforms: platforms.join(", "),
                state_management: config.state_management().to_string(),
            }
            .into()
        })
    }

    /// Render through the cache. Errors and panics both come back as
    /// [`ApplicationError::RenderingFailed`].
    #[instrument(skip_all, fields(renderer = %renderer.name()))]
    fn render(
        &self,
        renderer: &Arc<dyn TemplateRenderer>,
        context: &RenderContext,
    ) -> FledgeResult<Vec<GeneratedFile>> {
        let name = renderer.name().to_string();
        let cached = CachingRenderer::with_cache(Arc::clone(renderer), Arc::clone(&self.cache));

        let files = match panic::catch_unwind(AssertUnwindSafe(|| cached.render(context))) {
            Ok(Ok(files)) => files,
            Ok(Err(e)) => {
                return Err(ApplicationError::RenderingFailed {
                    renderer: name,
                    reason: e.to_string(),
                }
                .into());
            }
            Err(payload) => {
                warn!(renderer = %name, "Renderer panicked");
                return Err(ApplicationError::RenderingFailed {
                    renderer: name,
                    reason: format!("renderer panicked: {}", panic_message(payload.as_ref())),
                }
                .into());
            }
        };

        check_rendered(&name, &files)?;
        debug!(files = files.len(), "Rendered");
        Ok(files)
    }

    fn persist_manifest(&self, config: &ProjectConfig, output_dir: &Path) -> Option<PathBuf> {
        let store = self.manifest_store.as_ref()?;
        match store.save(config, output_dir) {
            Ok(path) => {
                info!(path = %path.display(), "Manifest written");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "Manifest could not be written");
                None
            }
        }
    }

    fn generate_ci(&self, context: &RenderContext) -> Option<PathBuf> {
        let provider = context.config().ci_provider()?;
        let Some(generator) = self.ci_generator.as_ref() else {
            debug!(%provider, "No CI generator configured");
            return None;
        };

        match generator.generate(provider, context) {
            Ok(path) => {
                info!(%provider, path = %path.display(), "CI configuration written");
                Some(path)
            }
            Err(e) => {
                warn!(%provider, error = %e, "CI configuration could not be generated");
                None
            }
        }
    }
}

/// A renderer must produce at least one file and never two with one path.
fn check_rendered(renderer: &str, files: &[GeneratedFile]) -> FledgeResult<()> {
    if files.is_empty() {
        return Err(ApplicationError::RenderingFailed {
            renderer: renderer.to_string(),
            reason: "renderer produced no files".into(),
        }
        .into());
    }

    let mut seen = HashSet::with_capacity(files.len());
    for file in files {
        if !seen.insert(file.path()) {
            return Err(ApplicationError::RenderingFailed {
                renderer: renderer.to_string(),
                reason: format!("duplicate output path: {}", file.path()),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockCiGenerator, MockManifestStore};
    use crate::application::testing::{
        FailingRenderer, PanickingFilesystem, PanickingRenderer, StdFilesystem, StubRenderer,
    };
    use crate::domain::{CiProvider, StateManagement};
    use crate::error::{ErrorCategory, FledgeError};
    use std::fs;
    use tempfile::TempDir;

    fn config(name: &str, platforms: &[Platform], state: StateManagement) -> ProjectConfig {
        ProjectConfig::builder()
            .app_name(name)
            .platforms(platforms.iter().copied())
            .state_management(state)
            .build()
            .unwrap()
    }

    fn mobile_provider(name: &str) -> ProjectConfig {
        config(name, &[Platform::Mobile], StateManagement::Provider)
    }

    fn service_with(renderers: Vec<Arc<dyn TemplateRenderer>>) -> GenerationService {
        let mut registry = TemplateRegistry::new();
        for r in renderers {
            registry.register(r);
        }
        GenerationService::new(
            Arc::new(registry),
            Arc::new(StdFilesystem),
            Arc::new(RenderCache::new()),
        )
    }

    fn stub_service() -> GenerationService {
        service_with(vec![
            Arc::new(StubRenderer::bundle(Platform::Mobile, StateManagement::Provider)),
            Arc::new(StubRenderer::universal()),
        ])
    }

    #[test]
    fn generates_files_that_mention_the_app() {
        let dir = TempDir::new().unwrap();
        let service = stub_service();

        let report = service.generate(mobile_provider("demo"), dir.path()).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.renderer, "mobile-provider");
        assert_eq!(report.files_generated, 2);
        let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(readme.contains("demo"));
    }

    #[test]
    fn invalid_name_fails_before_any_io() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("never-created");
        let service = stub_service();

        let err = service.generate(mobile_provider("9lives"), &out).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!out.exists());
    }

    #[test]
    fn unregistered_pair_is_a_selection_error_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let service = stub_service();

        let err = service
            .generate(config("demo", &[Platform::Web], StateManagement::GetX), dir.path())
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Selection);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn multi_platform_routes_to_universal() {
        let dir = TempDir::new().unwrap();
        let universal = Arc::new(StubRenderer::universal());
        let bundle = Arc::new(StubRenderer::bundle(Platform::Mobile, StateManagement::Riverpod));
        let service = service_with(vec![universal.clone(), bundle.clone()]);

        let report = service
            .generate(
                config("demo", &[Platform::Mobile, Platform::Web], StateManagement::Riverpod),
                dir.path(),
            )
            .unwrap();

        assert_eq!(report.renderer, "universal");
        assert_eq!(universal.calls(), 1);
        assert_eq!(bundle.calls(), 0);
    }

    #[test]
    fn renderer_errors_become_render_errors() {
        let dir = TempDir::new().unwrap();
        let service = service_with(vec![Arc::new(FailingRenderer::new("mobile-provider"))]);

        let err = service.generate(mobile_provider("demo"), dir.path()).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Render);
        assert!(err.to_string().contains("template exploded"));
    }

    #[test]
    fn renderer_panics_are_contained() {
        let dir = TempDir::new().unwrap();
        let service = service_with(vec![Arc::new(PanickingRenderer("mobile-provider"))]);

        let err = service.generate(mobile_provider("demo"), dir.path()).unwrap_err();

        assert!(matches!(
            &err,
            FledgeError::Application(ApplicationError::RenderingFailed { reason, .. })
                if reason.contains("index out of bounds")
        ));
    }

    fn stub_service_on(filesystem: Arc<dyn Filesystem>) -> GenerationService {
        let registry = TemplateRegistry::new().with(Arc::new(StubRenderer::bundle(
            Platform::Mobile,
            StateManagement::Provider,
        )));
        GenerationService::new(Arc::new(registry), filesystem, Arc::new(RenderCache::new()))
            .with_concurrency(NonZeroUsize::MIN)
    }

    #[test]
    fn filesystem_panic_during_write_fails_only_that_file() {
        let fs = Arc::new(PanickingFilesystem::on_write("README.md"));
        let service = stub_service_on(fs.clone());

        let report = service.generate(mobile_provider("demo"), "/virtual").unwrap();

        assert_eq!((report.files_generated, report.files_failed), (1, 1));
        assert_eq!(report.failures[0].path, "README.md");
        assert!(report.failures[0].error.to_string().contains("driver fault"));
        assert_eq!(fs.written(), [PathBuf::from("/virtual/lib/main.dart")]);
    }

    #[test]
    fn filesystem_panic_during_prepare_is_an_error() {
        let service = stub_service_on(Arc::new(PanickingFilesystem::on_create_dir()));

        let err = service.generate(mobile_provider("demo"), "/virtual").unwrap_err();

        assert!(matches!(
            &err,
            FledgeError::Application(ApplicationError::FilesystemError { reason, .. })
                if reason.contains("mount vanished")
        ));
    }

    #[test]
    fn second_run_is_served_from_the_shared_cache() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let stub = Arc::new(StubRenderer::bundle(Platform::Mobile, StateManagement::Provider));
        let service = service_with(vec![stub.clone()]);

        service.generate(mobile_provider("demo"), first.path()).unwrap();
        let report = service.generate(mobile_provider("demo"), second.path()).unwrap();

        assert_eq!(stub.calls(), 1);
        assert_eq!(report.cache.hits, 1);
        assert!(second.path().join("lib/main.dart").exists());
    }

    #[test]
    fn manifest_is_saved_once_after_a_complete_write() {
        let dir = TempDir::new().unwrap();
        let mut store = MockManifestStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_, out| Ok(out.join("fledge.yaml")));

        let service = stub_service().with_manifest_store(Arc::new(store));
        let report = service.generate(mobile_provider("demo"), dir.path()).unwrap();

        assert!(report.manifest_written());
    }

    #[test]
    fn manifest_failure_does_not_fail_generation() {
        let dir = TempDir::new().unwrap();
        let mut store = MockManifestStore::new();
        store.expect_save().times(1).returning(|_, out| {
            Err(ApplicationError::ManifestFailed {
                path: out.join("fledge.yaml"),
                reason: "disk full".into(),
            }
            .into())
        });

        let service = stub_service().with_manifest_store(Arc::new(store));
        let report = service.generate(mobile_provider("demo"), dir.path()).unwrap();

        assert!(report.is_complete());
        assert!(!report.manifest_written());
    }

    #[test]
    fn partial_write_skips_follow_up_steps() {
        let dir = TempDir::new().unwrap();
        // "lib" as a regular file blocks lib/main.dart.
        fs::write(dir.path().join("lib"), "").unwrap();

        let mut store = MockManifestStore::new();
        store.expect_save().times(0);
        let mut ci = MockCiGenerator::new();
        ci.expect_generate().times(0);

        let service = stub_service()
            .with_manifest_store(Arc::new(store))
            .with_ci_generator(Arc::new(ci));
        let cfg = ProjectConfig::builder()
            .app_name("demo")
            .platform(Platform::Mobile)
            .ci_provider(Some(CiProvider::GitHub))
            .build()
            .unwrap();

        let report = service.generate(cfg, dir.path()).unwrap();

        assert_eq!((report.files_generated, report.files_failed), (1, 1));
        assert_eq!(report.failures[0].path, "lib/main.dart");
        assert!(!report.manifest_written());
        assert!(!report.ci_config_generated());
    }

    #[test]
    fn ci_generator_runs_only_when_a_provider_is_set() {
        let dir = TempDir::new().unwrap();
        let mut ci = MockCiGenerator::new();
        ci.expect_generate()
            .withf(|provider, _| *provider == CiProvider::GitLab)
            .times(1)
            .returning(|_, ctx| Ok(ctx.output_dir().join(".gitlab-ci.yml")));
        let service = stub_service().with_ci_generator(Arc::new(ci));

        let without = service.generate(mobile_provider("demo"), dir.path()).unwrap();
        assert!(!without.ci_config_generated());

        let with = ProjectConfig::builder()
            .app_name("demo")
            .platform(Platform::Mobile)
            .ci_provider(Some(CiProvider::GitLab))
            .build()
            .unwrap();
        let report = service.generate(with, dir.path()).unwrap();
        assert!(report.ci_config_generated());
    }

    #[test]
    fn plan_renders_without_writing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("planned");
        let service = stub_service();

        let plan = service.plan(mobile_provider("demo"), &out).unwrap();

        assert_eq!(plan.files.len(), 2);
        assert!(plan.output_dir.is_absolute());
        assert!(!out.exists());
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let files = vec![
            GeneratedFile::new("a.txt", "1").unwrap(),
            GeneratedFile::new("a.txt", "2").unwrap(),
        ];
        let err = check_rendered("x", &files).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Render);
        assert!(check_rendered("x", &[]).is_err());
    }

    #[test]
    fn list_renderers_describes_kinds() {
        let infos = stub_service().list_renderers();

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].name, "mobile-provider");
        assert_eq!(infos[0].platform.as_deref(), Some("mobile"));
        assert_eq!(infos[1].name, "universal");
        assert_eq!(infos[1].state_management, None);
    }
}

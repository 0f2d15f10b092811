//! Implementation of the `fledge generate` command.
//!
//! Translates CLI arguments (plus an optional manifest and config defaults)
//! into a `ProjectConfig`, runs the pipeline and reports the outcome. No
//! generation logic lives here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use fledge_adapters::{LocalFilesystem, TemplateCiGenerator, YamlManifestStore};
use fledge_core::{
    application::{GenerationPlan, GenerationReport, default_concurrency},
    domain::{FeatureFlags, Platform, ProjectConfig},
    error::FledgeError,
};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute `fledge generate`.
///
/// 1. Resolve the project configuration
/// 2. Wire the service for this run
/// 3. Dry run: render and list, or generate and report
#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("-")))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let project = resolve_config(&args, &config)?;
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(project.app_name()));
    debug!(%project, output = %output_dir.display(), "Configuration resolved");

    let concurrency = args
        .concurrency
        .or(config.generation.concurrency)
        .unwrap_or_else(default_concurrency);
    let write_manifest = config.generation.write_manifest && !args.no_manifest;

    let filesystem = Arc::new(LocalFilesystem::new());
    let mut service = super::base_service(filesystem.clone())
        .with_concurrency(concurrency)
        .with_ci_generator(Arc::new(TemplateCiGenerator::new(filesystem.clone())));
    if write_manifest {
        service = service.with_manifest_store(Arc::new(YamlManifestStore::new(filesystem)));
    }

    if args.dry_run {
        let plan = service.plan(project, &output_dir)?;
        return print_plan(&plan, &output);
    }

    let expected = FollowUps {
        manifest: write_manifest,
        ci: project.ci_provider().is_some(),
    };
    let spinner = output.spinner(format!("Generating {}...", project.app_name()));
    let result = service.generate(project, &output_dir);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let report = result?;

    info!(
        renderer = %report.renderer,
        generated = report.files_generated,
        failed = report.files_failed,
        "Generate command finished"
    );
    print_report(&report, expected, &output)?;

    if report.files_failed > 0 {
        return Err(CliError::PartialWrite {
            failed: report.files_failed,
            total: report.files_generated + report.files_failed + report.files_skipped,
            output_dir: report.output_dir,
        });
    }
    Ok(())
}

/// Merge, lowest priority first: config defaults, the `--from` manifest,
/// then explicit flags. Feature flags only ever switch features on.
pub fn resolve_config(args: &GenerateArgs, config: &AppConfig) -> CliResult<ProjectConfig> {
    let base = args.from.as_deref().map(load_manifest).transpose()?;

    let app_name = match (&args.name, &base) {
        (Some(name), _) => name.clone(),
        (None, Some(base)) => base.app_name().to_string(),
        (None, None) => {
            return Err(CliError::InvalidInput {
                message: "an application name or --from manifest is required".into(),
                source: None,
            });
        }
    };

    let platforms: Vec<Platform> = if !args.platforms.is_empty() {
        args.platforms.clone()
    } else if let Some(base) = &base {
        base.platforms().iter().copied().collect()
    } else {
        config.defaults.platforms.clone()
    };

    let state = args
        .state
        .or(base.as_ref().map(ProjectConfig::state_management))
        .unwrap_or(config.defaults.state_management);
    let ci = args.ci.or(base.as_ref().and_then(ProjectConfig::ci_provider));

    let inherited = base.as_ref().map(ProjectConfig::features).unwrap_or_default();
    let features = FeatureFlags {
        theme: inherited.theme || args.theme,
        localization: inherited.localization || args.l10n,
        env: inherited.env || args.env,
        api_client: inherited.api_client || args.api_client,
        tests: inherited.tests || args.tests,
    };

    ProjectConfig::builder()
        .app_name(app_name)
        .platforms(platforms)
        .state_management(state)
        .ci_provider(ci)
        .features(features)
        .build()
        .map_err(|e| CliError::Core(FledgeError::from(e)))
}

fn load_manifest(path: &Path) -> CliResult<ProjectConfig> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml" | "toml") => {}
        _ => {
            return Err(CliError::InvalidInput {
                message: format!(
                    "{} is not a manifest; expected .yaml, .yml or .toml",
                    path.display()
                ),
                source: None,
            });
        }
    }
    Ok(YamlManifestStore::load(path)?.project)
}

#[derive(Serialize)]
struct Summary<'a> {
    renderer: &'a str,
    output_dir: &'a Path,
    files_generated: usize,
    files_failed: usize,
    files_skipped: usize,
    failures: Vec<FailureLine<'a>>,
    manifest: Option<&'a Path>,
    ci_config: Option<&'a Path>,
    cache_hit_rate: f64,
}

#[derive(Serialize)]
struct FailureLine<'a> {
    path: &'a str,
    error: String,
}

impl<'a> From<&'a GenerationReport> for Summary<'a> {
    fn from(report: &'a GenerationReport) -> Self {
        Self {
            renderer: &report.renderer,
            output_dir: &report.output_dir,
            files_generated: report.files_generated,
            files_failed: report.files_failed,
            files_skipped: report.files_skipped,
            failures: report
                .failures
                .iter()
                .map(|f| FailureLine {
                    path: &f.path,
                    error: f.error.to_string(),
                })
                .collect(),
            manifest: report.manifest_path.as_deref(),
            ci_config: report.ci_config_path.as_deref(),
            cache_hit_rate: report.cache.hit_rate(),
        }
    }
}

/// Best-effort steps the run was configured to perform.
#[derive(Debug, Clone, Copy)]
struct FollowUps {
    manifest: bool,
    ci: bool,
}

/// Follow-up steps that were due but produced nothing. Only meaningful for
/// a complete write; a partial write skips them on purpose.
fn missed_follow_ups(report: &GenerationReport, expected: FollowUps) -> Vec<&'static str> {
    if !report.is_complete() {
        return Vec::new();
    }
    let mut missed = Vec::new();
    if expected.manifest && !report.manifest_written() {
        missed.push("Manifest could not be written; rerun with -v for details");
    }
    if expected.ci && !report.ci_config_generated() {
        missed.push("CI configuration could not be generated; rerun with -v for details");
    }
    missed
}

fn print_report(
    report: &GenerationReport,
    expected: FollowUps,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        return output.json(&Summary::from(report));
    }

    for failure in &report.failures {
        output.error(&format!("{}: {}", failure.path, failure.error))?;
    }

    output.header(&format!(
        "{} ({} renderer)",
        report.output_dir.display(),
        report.renderer
    ))?;
    output.print(&format!("  generated: {}", report.files_generated))?;
    output.print(&format!("  failed:    {}", report.files_failed))?;
    if report.files_skipped > 0 {
        output.print(&format!(
            "  skipped:   {} (already exists)",
            report.files_skipped
        ))?;
    }
    output.print(&format!(
        "  ci config: {}",
        if report.ci_config_generated() { "yes" } else { "no" }
    ))?;
    output.print(&format!(
        "  cache hit rate: {:.0}%",
        report.cache.hit_rate() * 100.0
    ))?;

    for missed in missed_follow_ups(report, expected) {
        output.warning(missed)?;
    }

    if report.is_complete() {
        output.success(&format!("Project ready in {}", report.output_dir.display()))?;
        if let Some(manifest) = &report.manifest_path {
            output.info(&format!(
                "Regenerate with: fledge generate --from {}",
                manifest.display()
            ))?;
        }
    }
    Ok(())
}

fn print_plan(plan: &GenerationPlan, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        #[derive(Serialize)]
        struct PlanLine<'a> {
            path: &'a str,
            bytes: usize,
            overwrite: bool,
        }
        let files: Vec<PlanLine<'_>> = plan
            .files
            .iter()
            .map(|f| PlanLine {
                path: f.path(),
                bytes: f.size(),
                overwrite: f.overwrite(),
            })
            .collect();
        return output.json(&files);
    }

    output.info(&format!(
        "Dry run: {} would write {} files to {}",
        plan.renderer,
        plan.files.len(),
        plan.output_dir.display()
    ))?;
    for file in &plan.files {
        let note = if file.overwrite() { "" } else { "  (kept if present)" };
        output.print(&format!("  {}{}", file.path(), note))?;
    }
    Ok(())
}

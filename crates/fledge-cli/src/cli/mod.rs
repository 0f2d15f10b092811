//! CLI argument definitions using the clap derive API.
//!
//! This module is the only place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fledge_core::domain::{CiProvider, Platform, StateManagement};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "fledge",
    bin_name = "fledge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate Flutter applications from built-in templates",
    long_about = "Fledge renders a Flutter project for the platforms, state \
                  management and features you pick, then writes it to disk \
                  in parallel.",
    after_help = "EXAMPLES:\n\
        \x20 fledge generate demo --platform mobile --state provider\n\
        \x20 fledge generate shop --platform web --platform desktop --ci github --theme\n\
        \x20 fledge generate --from shop/fledge.yaml --output shop\n\
        \x20 fledge list --format json\n\
        \x20 fledge completions bash > ~/.local/share/bash-completion/completions/fledge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new Flutter project.
    #[command(
        visible_alias = "gen",
        about = "Generate a new project",
        after_help = "EXAMPLES:\n\
            \x20 fledge generate demo\n\
            \x20 fledge generate demo --platform mobile --platform web --state riverpod\n\
            \x20 fledge generate demo --env --tests --ci gitlab --dry-run"
    )]
    Generate(GenerateArgs),

    /// List the registered renderers.
    #[command(
        visible_alias = "ls",
        about = "List available renderers",
        after_help = "EXAMPLES:\n\
            \x20 fledge list\n\
            \x20 fledge list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 fledge completions bash > ~/.local/share/bash-completion/completions/fledge\n\
            \x20 fledge completions zsh  > ~/.zfunc/_fledge\n\
            \x20 fledge completions fish > ~/.config/fish/completions/fledge.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `fledge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Application name. Optional when `--from` supplies one.
    #[arg(
        value_name = "NAME",
        required_unless_present = "from",
        help = "Application name (letters, digits, '_' or '-')"
    )]
    pub name: Option<String>,

    /// Output directory, `./NAME` by default.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: ./NAME)"
    )]
    pub output: Option<PathBuf>,

    /// Target platforms. Repeat the flag or separate with commas.
    #[arg(
        short = 'p',
        long = "platform",
        value_name = "PLATFORM",
        value_delimiter = ',',
        help = "Target platform: mobile, web, desktop (repeatable)"
    )]
    pub platforms: Vec<Platform>,

    #[arg(
        short = 's',
        long = "state",
        value_name = "STATE",
        help = "State management: provider, riverpod, bloc, getx"
    )]
    pub state: Option<StateManagement>,

    #[arg(
        long = "ci",
        value_name = "PROVIDER",
        help = "Emit a CI pipeline: github, gitlab, bitbucket"
    )]
    pub ci: Option<CiProvider>,

    #[arg(long = "theme", help = "Add a Material 3 theme")]
    pub theme: bool,

    #[arg(
        long = "l10n",
        visible_alias = "localization",
        help = "Add ARB-based localization"
    )]
    pub l10n: bool,

    #[arg(long = "env", help = "Add .env files (an existing .env is kept)")]
    pub env: bool,

    #[arg(long = "api-client", help = "Add an HTTP API client")]
    pub api_client: bool,

    #[arg(long = "tests", help = "Add a widget test")]
    pub tests: bool,

    /// Regenerate from a saved manifest. Flags given alongside override it.
    #[arg(
        long = "from",
        value_name = "FILE",
        help = "Read the configuration from a fledge.yaml / .toml manifest"
    )]
    pub from: Option<PathBuf>,

    #[arg(
        short = 'j',
        long = "concurrency",
        value_name = "N",
        help = "Maximum parallel file writes (default: from config, else CPU count)"
    )]
    pub concurrency: Option<NonZeroUsize>,

    #[arg(long = "no-manifest", help = "Do not write fledge.yaml")]
    pub no_manifest: bool,

    /// Render and print the file list without writing anything.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `fledge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Aligned name and description columns.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `fledge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

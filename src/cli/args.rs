//! CLI argument definitions
//!
//! All Clap derive structs for `chgk` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Timed trivia sessions driven by plain-text question packages.
#[derive(Parser, Debug)]
#[command(name = "chgk", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "CHGK_COLOR")]
    pub color: ColorChoice,

    /// Log line format.
    #[arg(long, default_value = "human", global = true, env = "CHGK_LOG_FORMAT")]
    pub log_format: OutputFormat,

    /// Append log lines to this file instead of stderr.
    #[arg(long, global = true, env = "CHGK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play an interactive session in the terminal.
    Play(PlayArgs),

    /// Inspect the question packages.
    Catalog(CatalogCommand),

    /// Work with configuration files.
    Config(ConfigCommand),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Shared Source Selection
// ============================================================================

/// Where the question packages come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "CHGK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Package path or URL; replaces the configured sources (repeatable).
    #[arg(short, long = "source", value_name = "LOCATION")]
    pub sources: Vec<String>,
}

// ============================================================================
// Play Command
// ============================================================================

/// Arguments for `play`.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Package selection.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Disable the end-of-answer audio cue.
    #[arg(long)]
    pub no_audio: bool,
}

// ============================================================================
// Catalog Command
// ============================================================================

/// Catalog inspection commands.
#[derive(Args, Debug)]
pub struct CatalogCommand {
    /// Catalog subcommand.
    #[command(subcommand)]
    pub subcommand: CatalogSubcommand,
}

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
pub enum CatalogSubcommand {
    /// List loaded games and their tournaments.
    List(CatalogListArgs),

    /// Show the questions of one game.
    Show(CatalogShowArgs),
}

/// Arguments for `catalog list`.
#[derive(Args, Debug)]
pub struct CatalogListArgs {
    /// Package selection.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Include games that cannot be played.
    #[arg(long)]
    pub all: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `catalog show`.
#[derive(Args, Debug)]
pub struct CatalogShowArgs {
    /// Game identifier.
    pub id: String,

    /// Only show this tournament (1-based).
    #[arg(short, long)]
    pub tournament: Option<usize>,

    /// Package selection.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Config Command
// ============================================================================

/// Configuration commands.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Config subcommand.
    #[command(subcommand)]
    pub subcommand: ConfigSubcommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Validate configuration files.
    Validate(ConfigValidateArgs),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
pub struct ConfigValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Version
// ============================================================================

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================

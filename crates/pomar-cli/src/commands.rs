//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pomador: run Pomar scenario suites against public demo sites
#[derive(Parser, Debug)]
#[command(name = "pomador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the suites in the catalog
    List(ListArgs),

    /// Run suites and write reports
    Run(RunArgs),

    /// Show the configuration a suite would run with
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Also list each suite's scenarios and tags
    #[arg(long)]
    pub scenarios: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suites to run (default: every suite in the catalog)
    #[arg(short, long = "suite", value_name = "NAME")]
    pub suites: Vec<String>,

    /// Only scenarios whose name contains this text, or `tag:<tag>`
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Concurrent scenarios (0 = one per CPU)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Retries per failing scenario
    #[arg(long)]
    pub retries: Option<u32>,

    /// Per-attempt scenario timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Stop scheduling scenarios after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Report formats to write
    #[arg(long = "format", value_delimiter = ',', default_value = "html")]
    pub formats: Vec<ReportFormatArg>,

    /// Output directory for reports and artifacts
    #[arg(short, long, default_value = "test-results")]
    pub output: PathBuf,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Seed for generated test data
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Suite whose configuration to resolve
    pub suite: String,
}

/// Report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormatArg {
    /// Self-contained HTML page
    #[default]
    Html,
    /// JSON document
    Json,
    /// JUnit XML
    Junit,
}

impl From<ReportFormatArg> for pomar::ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Html => Self::Html,
            ReportFormatArg::Json => Self::Json,
            ReportFormatArg::Junit => Self::Junit,
        }
    }
}

/// Color choice argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for pomar::logging::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

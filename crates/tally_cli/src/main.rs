//! Tally CLI: resource usage reports for allocated match-action pipelines.
//!
//! `tally report` collects a pipeline dump and writes `resources.json` plus a
//! manifest entry. `tally check` collects only and prints a per-stage summary.

#![warn(missing_docs)]

mod check;
mod pipeline;
mod report;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Tally: per-stage resource usage reporting.
#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Match-action pipeline resource reports")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tally.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect a pipeline and write its resource report.
    Report(ReportArgs),
    /// Collect a pipeline and check it without writing anything.
    Check(CheckArgs),
}

/// Arguments for `tally report`.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Allocated pipeline dump (JSON).
    pub pipe: PathBuf,

    /// Override `output.dir` from `tally.toml`.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format for diagnostics and the run summary.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `tally check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Allocated pipeline dump (JSON).
    pub pipe: PathBuf,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to the config file or its directory.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Report(ref args) => report::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn log_level(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` directives take precedence
/// over the flag-derived default.
fn init_logging(quiet: bool, verbose: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(log_level(quiet, verbose).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

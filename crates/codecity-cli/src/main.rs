#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use codecity_core::ErrorCode;
use codecity_core::config::{EffectiveConfig, resolve_config};
use output::{CliError, OutputMode, render_error};
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "codecity: replay repository history and score its structure",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Output format; falls back to FORMAT, then the user config, then TTY detection.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "History",
        about = "Reconstruct the file tree at a commit",
        long_about = "Replay a commit log up to a commit index and report the resulting file tree.\n\nJSON output carries the full tree; pretty and text output summarize it.",
        after_help = "EXAMPLES:\n    # Snapshot after the whole log\n    codecity replay --commits history.json\n\n    # Snapshot after the 11th commit, moving renamed files\n    codecity replay --commits history.json --at 10 --rename move\n\n    # Emit the tree as JSON\n    codecity replay --commits history.json --json"
    )]
    Replay(cmd::replay::ReplayArgs),

    #[command(
        next_help_heading = "History",
        about = "List files touched by a commit",
        long_about = "List the file paths added, modified or renamed by the commit at an index. Deleted paths are not listed.",
        after_help = "EXAMPLES:\n    # Files changed by the first commit\n    codecity changed --commits history.json --at 0\n\n    # Emit machine-readable output\n    codecity changed --commits history.json --at 5 --json"
    )]
    Changed(cmd::changed::ChangedArgs),

    #[command(
        next_help_heading = "History",
        about = "Summarize snapshots along the history",
        long_about = "Reconstruct every K-th snapshot (plus the last) in parallel and report file count, directory count and total size for each.",
        after_help = "EXAMPLES:\n    # Every commit\n    codecity timeline --commits history.json\n\n    # Every 50th commit as JSON\n    codecity timeline --commits history.json --step 50 --json"
    )]
    Timeline(cmd::timeline::TimelineArgs),

    #[command(
        next_help_heading = "Analytics",
        about = "Score the structure of a layout snapshot",
        long_about = "Compute modularity, coupling, hub, abandonment and skyline metrics for a layout snapshot and its dependency map.",
        after_help = "EXAMPLES:\n    # Analyze with imports\n    codecity analyze --layout city.json --deps deps.json\n\n    # Structure-only analysis, top 5 lists\n    codecity analyze --layout city.json --top 5\n\n    # Emit machine-readable output\n    codecity analyze --layout city.json --deps deps.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CODECITY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "codecity=debug,info"
        } else {
            "codecity=info,warn"
        })
    });

    let format = env::var("CODECITY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Output mode to use before the config layer has resolved one.
fn fallback_output(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else {
        cli.format.unwrap_or(OutputMode::Text)
    }
}

/// Read failures keep their I/O code; anything else is a parse error.
fn config_error_code(err: &anyhow::Error) -> ErrorCode {
    if err.root_cause().is::<std::io::Error>() {
        ErrorCode::InputReadFailed
    } else {
        ErrorCode::ConfigParseError
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config: EffectiveConfig =
        match resolve_config(&project_root, cli.json, cli.format.map(OutputMode::as_str)) {
            Ok(config) => config,
            Err(err) => {
                render_error(
                    fallback_output(&cli),
                    &CliError::from_code(config_error_code(&err), format!("{err:#}")),
                )?;
                return Err(err);
            }
        };
    let output = OutputMode::from_resolved(&config.resolved_output);
    debug!(output = output.as_str(), root = %project_root.display(), "resolved config");

    match cli.command {
        Commands::Replay(ref args) => cmd::replay::run_replay(args, output, &config.project),
        Commands::Changed(ref args) => cmd::changed::run_changed(args, output),
        Commands::Timeline(ref args) => {
            cmd::timeline::run_timeline(args, output, &config.project)
        }
        Commands::Analyze(ref args) => {
            cmd::analyze::run_analyze(args, output, &config.project.analytics)
        }
    }
}

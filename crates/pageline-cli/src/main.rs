//! pageline - paginated API extraction into flat tables
//!
//! Pages through a signed REST collection into a JSONL raw sink, then
//! flattens the records into CSV or Parquet.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "pageline")]
#[command(about = "Extract a paginated API into CSV or Parquet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./pageline.toml or ~/.config/pageline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Maximum retries per page after the first attempt
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract then transform
    Run(cmd::OutputArgs),
    /// Page through the API into the raw sink
    Extract(cmd::OutputArgs),
    /// Flatten an existing raw sink into CSV or Parquet
    Transform(cmd::OutputArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let progress = pageline_core::ProgressContext::new();

    // TTY: spinners carry activity, so only warnings unless --debug.
    // Non-TTY: logs are the only progress indicator.
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = is_tty && !cli.debug;
    pageline_core::init_logging(quiet, cli.debug, multi);

    let mut config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    // Config file defaults, CLI overrides
    if let Some(max_retries) = cli.max_retries {
        config.api.max_retries = max_retries;
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout = timeout;
    }

    match cli.command {
        Command::Run(args) => cmd::run::run(args.apply(config), &progress),
        Command::Extract(args) => cmd::extract::run(args.apply(config), &progress),
        Command::Transform(args) => cmd::transform::run(args.apply(config)),
        Command::Config => {
            cmd::show_config(&config, &progress);
            Ok(ExitCode::SUCCESS)
        }
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use musebridge_lib::consts;
use musebridge_lib::manifest::BridgeManifest;
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

/// musebridge - build, sync, and load orchestration for the Muse sensor
/// native bridge
#[derive(Parser)]
#[command(name = "musebridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the bridge manifest
  #[arg(short, long, global = true, default_value = consts::DEFAULT_MANIFEST)]
  config: PathBuf,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Cross-compile the bridge crate for every declared ABI
  Build {
    /// Build in release mode
    #[arg(long)]
    release: bool,
  },

  /// Build if stale, then place artifacts into the packaging tree
  Sync {
    /// Build in release mode
    #[arg(long)]
    release: bool,
  },

  /// Drive host pipeline task names through the task graph
  Run {
    /// Host task names, e.g. mergeDebugJniLibFolders
    #[arg(required = true)]
    tasks: Vec<String>,
  },

  /// Load the native libraries in order and perform the handshake
  Preload,

  /// Show per-target freshness and placement state
  Status {
    /// Inspect release artifacts instead of debug
    #[arg(long)]
    release: bool,

    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .init();

  let manifest = BridgeManifest::load(&cli.config)
    .with_context(|| format!("failed to load {}", cli.config.display()))?;

  match cli.command {
    Commands::Build { release } => cmd::cmd_build(&manifest, release),
    Commands::Sync { release } => cmd::cmd_sync(&manifest, release),
    Commands::Run { tasks } => cmd::cmd_run(&manifest, &tasks),
    Commands::Preload => cmd::cmd_preload(&manifest),
    Commands::Status { release, json } => cmd::cmd_status(&manifest, release, json),
  }
}

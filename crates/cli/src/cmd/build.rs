//! Implementation of the `musebridge build` command.
//!
//! Runs the cross-compile orchestrator for every declared target ABI,
//! skipping the toolchain when no watched input changed.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use musebridge_lib::build::{self, BuildOutcome};
use musebridge_lib::manifest::BridgeManifest;

use crate::output::{print_info, print_success};

pub fn cmd_build(manifest: &BridgeManifest, release: bool) -> Result<()> {
  let mode = super::mode_from_flag(release);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let started = Instant::now();
  let outcome = rt.block_on(build::realize(manifest, mode)).context("Build failed")?;

  match outcome {
    BuildOutcome::Fresh { targets } => {
      print_info(&format!("artifacts up to date ({} targets, {} mode)", targets.len(), mode));
    }
    BuildOutcome::Rebuilt { targets } => {
      let elapsed = Duration::from_millis(started.elapsed().as_millis() as u64);
      print_success(&format!(
        "built {} targets ({} mode) in {}",
        targets.len(),
        mode,
        humantime::format_duration(elapsed)
      ));
      for target in &targets {
        println!("  {}", target);
      }
    }
  }

  Ok(())
}

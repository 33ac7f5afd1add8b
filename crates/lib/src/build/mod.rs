//! Cross-compile orchestrator.
//!
//! Invokes the native toolchain (`cargo ndk` by default) once per run,
//! covering every declared target ABI in one build mode. The invocation is
//! skipped entirely when no watched input changed since the last produced
//! artifact, which is the central performance contract: never rebuild
//! spuriously, always rebuild on source change.
//!
//! Toolchain stdout/stderr are inherited, so compiler errors reach the
//! invoking pipeline verbatim; a non-zero exit aborts with
//! [`BuildError::ToolchainFailed`] and is never retried.

pub mod stale;
mod types;

use tokio::process::Command;
use tracing::{info, instrument};

use crate::manifest::BridgeManifest;
use crate::target::{BuildMode, Target};

pub use types::*;

/// Build every declared target at the given mode, if anything is stale.
#[instrument(skip_all, fields(bridge = %manifest.bridge.name, mode = %mode))]
pub async fn realize(manifest: &BridgeManifest, mode: BuildMode) -> Result<BuildOutcome, BuildError> {
  let targets = manifest.targets_for(mode);
  let verdicts = stale::check(manifest, &targets)?;

  let stale_count = verdicts.iter().filter(|v| v.needs_build()).count();
  if stale_count == 0 {
    info!(targets = targets.len(), "artifacts up to date, skipping toolchain");
    return Ok(BuildOutcome::Fresh { targets });
  }

  info!(stale = stale_count, targets = targets.len(), "invoking toolchain");
  invoke_toolchain(manifest, mode, &targets).await?;
  Ok(BuildOutcome::Rebuilt { targets })
}

/// Spawn one toolchain process covering all targets.
///
/// Shape: `<program> <args> -t <abi>... build [--release]`, with the bridge
/// crate root as working directory.
async fn invoke_toolchain(manifest: &BridgeManifest, mode: BuildMode, targets: &[Target]) -> Result<(), BuildError> {
  let toolchain = &manifest.toolchain;

  let mut command = Command::new(&toolchain.program);
  command.args(&toolchain.args);
  for target in targets {
    command.arg("-t").arg(target.abi.name());
  }
  command.arg("build");
  command.args(mode.cargo_flags());
  command.current_dir(manifest.source_dir());

  let status = command.status().await.map_err(|source| BuildError::Spawn {
    program: toolchain.program.clone(),
    source,
  })?;

  if !status.success() {
    return Err(BuildError::ToolchainFailed {
      program: toolchain.program.clone(),
      code: status.code(),
    });
  }

  info!("toolchain finished");
  Ok(())
}

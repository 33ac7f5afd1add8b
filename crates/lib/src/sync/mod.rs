//! Artifact placement stage.
//!
//! Copies each target's produced shared library from the toolchain's
//! per-triple output directory into the ABI-keyed tree the packaging step
//! scans (`<out>/<abi>/lib<bridge>.so`). A missing source artifact is fatal
//! for the run. Placement is idempotent: when the destination already holds
//! identical content the copy is skipped, so placed artifacts are never
//! rewritten by a no-op re-run.

mod types;

use tokio::fs;
use tracing::{debug, info, instrument};

use crate::manifest::BridgeManifest;
use crate::target::BuildMode;
use crate::util::hash::hash_file;

pub use types::*;

/// Place every declared target's artifact for the given build mode.
#[instrument(skip_all, fields(bridge = %manifest.bridge.name, mode = %mode))]
pub async fn place(manifest: &BridgeManifest, mode: BuildMode) -> Result<SyncOutcome, SyncError> {
  let source_dir = manifest.source_dir();
  let out_dir = manifest.out_dir();
  let bridge = &manifest.bridge.name;

  let mut outcome = SyncOutcome::default();
  for target in manifest.targets_for(mode) {
    let source = target.artifact_path(&source_dir, bridge);
    if !source.is_file() {
      return Err(SyncError::MissingArtifact {
        abi: target.abi,
        path: source,
      });
    }

    let dest = target.placement_path(&out_dir, bridge);
    let action = if dest.is_file() && hash_file(&dest)? == hash_file(&source)? {
      debug!(dest = %dest.display(), "destination unchanged, skipping copy");
      PlaceAction::Unchanged
    } else {
      if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
      }
      fs::copy(&source, &dest).await?;
      debug!(source = %source.display(), dest = %dest.display(), "artifact copied");
      PlaceAction::Copied
    };

    outcome.placed.push(PlacedArtifact {
      target,
      source,
      dest,
      action,
    });
  }

  info!(
    copied = outcome.copied(),
    unchanged = outcome.unchanged(),
    "placement complete"
  );
  Ok(outcome)
}

//! Staleness detection for the cross-compile orchestrator.
//!
//! Watched inputs are the bridge crate's `src/` tree and its `Cargo.toml`;
//! declared outputs are each target's shared-library artifact. A target is
//! stale when its artifact is missing or older than the newest input.

use std::path::Path;
use std::time::SystemTime;

use tracing::debug;
use walkdir::WalkDir;

use crate::consts;
use crate::manifest::BridgeManifest;
use crate::target::Target;

use super::types::{BuildError, FreshState, TargetFreshness};

/// Newest modification time across the watched inputs.
///
/// Fails when the source tree or build manifest is absent, since a build
/// without inputs is a misconfiguration rather than an empty rebuild.
pub fn newest_input_mtime(source_dir: &Path) -> Result<SystemTime, BuildError> {
  let cargo_manifest = source_dir.join(consts::CARGO_MANIFEST);
  let mut newest = std::fs::metadata(&cargo_manifest)?.modified()?;

  let src_dir = source_dir.join(consts::SRC_DIR);
  for entry in WalkDir::new(&src_dir) {
    let entry = entry.map_err(|e| BuildError::Io(e.into()))?;
    if !entry.file_type().is_file() {
      continue;
    }
    let modified = entry.metadata().map_err(|e| BuildError::Io(e.into()))?.modified()?;
    if modified > newest {
      newest = modified;
    }
  }

  Ok(newest)
}

/// Compute each declared target's freshness against the watched inputs.
pub fn check(manifest: &BridgeManifest, targets: &[Target]) -> Result<Vec<TargetFreshness>, BuildError> {
  let source_dir = manifest.source_dir();
  let newest_input = newest_input_mtime(&source_dir)?;

  let mut verdicts = Vec::with_capacity(targets.len());
  for &target in targets {
    let artifact = target.artifact_path(&source_dir, &manifest.bridge.name);
    let state = match std::fs::metadata(&artifact) {
      Ok(meta) => {
        let produced = meta.modified()?;
        if newest_input > produced {
          FreshState::Stale
        } else {
          FreshState::Fresh
        }
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => FreshState::Missing,
      Err(e) => return Err(e.into()),
    };
    debug!(target = %target, ?state, artifact = %artifact.display(), "freshness");
    verdicts.push(TargetFreshness { target, artifact, state });
  }

  Ok(verdicts)
}

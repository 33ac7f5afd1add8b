//! Types for the artifact placement stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::target::{Abi, Target};

/// Errors raised while placing artifacts.
#[derive(Debug, Error)]
pub enum SyncError {
  /// The orchestrator produced nothing for a declared target. This is a
  /// build error, never a silently empty output directory.
  #[error("missing artifact for {abi}: expected {path}")]
  MissingArtifact { abi: Abi, path: PathBuf },

  /// I/O error while copying or hashing.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// What happened to one target's artifact during placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceAction {
  /// Destination written (new or changed content).
  Copied,
  /// Destination already held identical content; nothing written.
  Unchanged,
}

/// One placed artifact.
#[derive(Debug, Clone)]
pub struct PlacedArtifact {
  pub target: Target,
  pub source: PathBuf,
  pub dest: PathBuf,
  pub action: PlaceAction,
}

/// Result of placing every declared target's artifact.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
  pub placed: Vec<PlacedArtifact>,
}

impl SyncOutcome {
  pub fn copied(&self) -> usize {
    self
      .placed
      .iter()
      .filter(|p| p.action == PlaceAction::Copied)
      .count()
  }

  pub fn unchanged(&self) -> usize {
    self.placed.len() - self.copied()
  }
}

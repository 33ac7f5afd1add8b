//! Types for the cross-compile orchestrator.

use std::path::PathBuf;

use thiserror::Error;

use crate::target::Target;

/// Errors raised while orchestrating the cross-compile.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The toolchain process could not be spawned at all.
  #[error("cannot spawn toolchain {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The toolchain ran and exited non-zero. Its output goes straight to the
  /// invoking pipeline's stdio, so the compiler error is already on screen.
  #[error("toolchain {program} failed with exit code {code:?}")]
  ToolchainFailed { program: String, code: Option<i32> },

  /// I/O error while checking inputs or outputs.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// How one invocation of the orchestrator resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
  /// Every declared artifact was newer than every input; nothing ran.
  Fresh { targets: Vec<Target> },
  /// At least one target was stale; one toolchain invocation covered all
  /// declared targets.
  Rebuilt { targets: Vec<Target> },
}

impl BuildOutcome {
  /// Whether the toolchain was actually invoked.
  pub fn invoked(&self) -> bool {
    matches!(self, BuildOutcome::Rebuilt { .. })
  }

  pub fn targets(&self) -> &[Target] {
    match self {
      BuildOutcome::Fresh { targets } | BuildOutcome::Rebuilt { targets } => targets,
    }
  }
}

/// Per-target freshness, as reported by the staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshState {
  /// Artifact exists and is newer than every watched input.
  Fresh,
  /// Artifact exists but an input changed after it was produced.
  Stale,
  /// Artifact does not exist.
  Missing,
}

/// One target's freshness verdict.
#[derive(Debug, Clone)]
pub struct TargetFreshness {
  pub target: Target,
  pub artifact: PathBuf,
  pub state: FreshState,
}

impl TargetFreshness {
  pub fn needs_build(&self) -> bool {
    !matches!(self.state, FreshState::Fresh)
  }
}

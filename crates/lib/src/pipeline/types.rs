//! Types for the host task-graph model.

use thiserror::Error;

use crate::build::{BuildError, BuildOutcome};
use crate::sync::{SyncError, SyncOutcome};
use crate::target::BuildMode;

/// Errors raised while building or running the task graph.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// Task names must be unique within a graph.
  #[error("duplicate task: {0}")]
  DuplicateTask(String),

  /// A dependency edge or request referenced a task that was never added.
  #[error("unknown task: {0}")]
  UnknownTask(String),

  /// Dependency cycle in the task graph.
  #[error("dependency cycle detected")]
  CycleDetected,

  /// The build task failed; the run aborts here.
  #[error(transparent)]
  Build(#[from] BuildError),

  /// The sync task failed; the run aborts here.
  #[error(transparent)]
  Sync(#[from] SyncError),
}

/// What a task does when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
  /// Cross-compile orchestrator.
  Build,
  /// Artifact placement stage.
  Sync,
  /// A host pipeline task we only model for ordering; executing it is a
  /// no-op on our side.
  Host,
}

/// A named task in the graph.
#[derive(Debug, Clone)]
pub struct Task {
  pub name: String,
  pub kind: TaskKind,
}

/// Result of driving the host task list through the graph.
#[derive(Debug)]
pub struct RunSummary {
  /// Build mode derived from the requested task names.
  pub mode: BuildMode,
  /// Task names in the order they executed.
  pub executed: Vec<String>,
  /// Present when the build task was part of the plan.
  pub build: Option<BuildOutcome>,
  /// Present when the sync task was part of the plan.
  pub sync: Option<SyncOutcome>,
}

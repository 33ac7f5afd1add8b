//! Host task-graph model.
//!
//! The placement stage has to run before the packaging step merges native
//! libraries, but the exact merge task names vary across host toolchain
//! versions. Instead of hardcoding names, the graph supports listener-style
//! defensive binding: a registered listener attaches a dependency onto any
//! later-added task whose name satisfies a predicate.
//!
//! The graph itself is a plain petgraph DAG; execution runs the dependency
//! closure of the requested tasks in topological order and aborts on the
//! first task failure.

mod types;

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, instrument};

use crate::consts::{BUILD_TASK, SYNC_TASK};
use crate::manifest::BridgeManifest;
use crate::target::BuildMode;
use crate::{build, sync};

pub use types::*;

/// Does this host task name merge native libraries into the package?
///
/// Matches any name carrying a merge marker together with either a
/// JNI-lib-folders marker or a native-libs marker, case-insensitive. Both
/// spellings exist across host toolchain versions.
pub fn is_library_merge_task(name: &str) -> bool {
  let name = name.to_ascii_lowercase();
  name.contains("merge") && (name.contains("jnilibfolders") || name.contains("nativelibs"))
}

type Predicate = Box<dyn Fn(&str) -> bool>;

struct Listener {
  predicate: Predicate,
  /// Task every matching task gains a dependency on.
  dependency: NodeIndex,
}

/// A named-task DAG with add-time binding listeners.
pub struct TaskGraph {
  graph: DiGraph<Task, ()>,
  nodes: HashMap<String, NodeIndex>,
  listeners: Vec<Listener>,
}

impl TaskGraph {
  pub fn new() -> Self {
    Self {
      graph: DiGraph::new(),
      nodes: HashMap::new(),
      listeners: Vec::new(),
    }
  }

  /// Add a task. Registered listeners see it immediately: every listener
  /// whose predicate matches the name binds its dependency onto the task.
  pub fn add_task(&mut self, name: &str, kind: TaskKind) -> Result<NodeIndex, PipelineError> {
    if self.nodes.contains_key(name) {
      return Err(PipelineError::DuplicateTask(name.to_string()));
    }
    let idx = self.graph.add_node(Task {
      name: name.to_string(),
      kind,
    });
    self.nodes.insert(name.to_string(), idx);

    for listener in &self.listeners {
      if (listener.predicate)(name) {
        debug!(task = name, "listener bound dependency onto task");
        self.graph.add_edge(listener.dependency, idx, ());
      }
    }
    Ok(idx)
  }

  /// Declare that `task` depends on (runs after) `dependency`.
  pub fn depends_on(&mut self, task: &str, dependency: &str) -> Result<(), PipelineError> {
    let task = self.index_of(task)?;
    let dependency = self.index_of(dependency)?;
    self.graph.add_edge(dependency, task, ());
    Ok(())
  }

  /// Register a listener: every task added from now on whose name satisfies
  /// `predicate` gains a dependency on `dependency`. Also applied to tasks
  /// already present.
  pub fn when_task_added<P>(&mut self, predicate: P, dependency: &str) -> Result<(), PipelineError>
  where
    P: Fn(&str) -> bool + 'static,
  {
    let dependency = self.index_of(dependency)?;

    let existing: Vec<NodeIndex> = self
      .graph
      .node_indices()
      .filter(|&idx| idx != dependency && predicate(&self.graph[idx].name))
      .collect();
    for idx in existing {
      self.graph.add_edge(dependency, idx, ());
    }

    self.listeners.push(Listener {
      predicate: Box::new(predicate),
      dependency,
    });
    Ok(())
  }

  fn index_of(&self, name: &str) -> Result<NodeIndex, PipelineError> {
    self
      .nodes
      .get(name)
      .copied()
      .ok_or_else(|| PipelineError::UnknownTask(name.to_string()))
  }

  /// The dependency closure of the requested tasks, in execution order.
  pub fn execution_plan(&self, requested: &[String]) -> Result<Vec<&Task>, PipelineError> {
    let mut wanted = HashSet::new();
    let mut stack = Vec::new();
    for name in requested {
      stack.push(self.index_of(name)?);
    }
    while let Some(idx) = stack.pop() {
      if wanted.insert(idx) {
        stack.extend(self.graph.neighbors_directed(idx, Direction::Incoming));
      }
    }

    let order = toposort(&self.graph, None).map_err(|_| PipelineError::CycleDetected)?;
    Ok(
      order
        .into_iter()
        .filter(|idx| wanted.contains(idx))
        .map(|idx| &self.graph[idx])
        .collect(),
    )
  }
}

impl Default for TaskGraph {
  fn default() -> Self {
    Self::new()
  }
}

/// Build the standard graph for one run: our build and sync tasks, the
/// defensive merge-task binding, and the host's task names as markers.
fn standard_graph(host_tasks: &[String]) -> Result<TaskGraph, PipelineError> {
  let mut graph = TaskGraph::new();
  graph.add_task(BUILD_TASK, TaskKind::Build)?;
  graph.add_task(SYNC_TASK, TaskKind::Sync)?;
  graph.depends_on(SYNC_TASK, BUILD_TASK)?;
  graph.when_task_added(is_library_merge_task, SYNC_TASK)?;
  for name in host_tasks {
    graph.add_task(name, TaskKind::Host)?;
  }
  Ok(graph)
}

/// Drive a host task list: derive the build mode from the task names, bind
/// the sync stage onto matching merge tasks, and execute the plan.
#[instrument(skip_all, fields(tasks = host_tasks.len()))]
pub async fn run_host_tasks(manifest: &BridgeManifest, host_tasks: &[String]) -> Result<RunSummary, PipelineError> {
  let mode = BuildMode::from_task_names(host_tasks);
  let graph = standard_graph(host_tasks)?;
  let plan = graph.execution_plan(host_tasks)?;

  info!(mode = %mode, tasks = plan.len(), "executing plan");

  let mut summary = RunSummary {
    mode,
    executed: Vec::new(),
    build: None,
    sync: None,
  };
  for task in plan {
    debug!(task = %task.name, "running task");
    match task.kind {
      TaskKind::Build => summary.build = Some(build::realize(manifest, mode).await?),
      TaskKind::Sync => summary.sync = Some(sync::place(manifest, mode).await?),
      TaskKind::Host => {}
    }
    summary.executed.push(task.name.clone());
  }
  Ok(summary)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn merge_predicate_matches_both_spellings() {
    assert!(is_library_merge_task("mergeDebugJniLibFolders"));
    assert!(is_library_merge_task("mergeReleaseNativeLibs"));
    assert!(is_library_merge_task("MERGEDEBUGNATIVELIBS"));
    assert!(!is_library_merge_task("mergeDebugResources"));
    assert!(!is_library_merge_task("stripDebugNativeLibs"));
    assert!(!is_library_merge_task("packageDebug"));
  }

  fn plan_names(graph: &TaskGraph, requested: &[&str]) -> Vec<String> {
    let requested: Vec<String> = requested.iter().map(|s| s.to_string()).collect();
    graph
      .execution_plan(&requested)
      .unwrap()
      .iter()
      .map(|t| t.name.clone())
      .collect()
  }

  #[test]
  fn merge_task_pulls_in_sync_then_build() {
    let tasks = vec!["mergeDebugJniLibFolders".to_string()];
    let graph = standard_graph(&tasks).unwrap();
    let plan = plan_names(&graph, &["mergeDebugJniLibFolders"]);
    assert_eq!(plan, [BUILD_TASK, SYNC_TASK, "mergeDebugJniLibFolders"]);
  }

  #[test]
  fn unrelated_host_task_runs_alone() {
    let tasks = vec!["compileDebugKotlin".to_string()];
    let graph = standard_graph(&tasks).unwrap();
    let plan = plan_names(&graph, &["compileDebugKotlin"]);
    assert_eq!(plan, ["compileDebugKotlin"]);
  }

  #[test]
  fn listener_applies_to_every_matching_task() {
    let tasks = vec![
      "mergeDebugJniLibFolders".to_string(),
      "mergeDebugNativeLibs".to_string(),
      "packageDebug".to_string(),
    ];
    let graph = standard_graph(&tasks).unwrap();
    let plan = plan_names(&graph, &["mergeDebugNativeLibs"]);
    assert_eq!(plan, [BUILD_TASK, SYNC_TASK, "mergeDebugNativeLibs"]);
    let plan = plan_names(&graph, &["packageDebug"]);
    assert_eq!(plan, ["packageDebug"]);
  }

  #[test]
  fn duplicate_task_is_rejected() {
    let mut graph = TaskGraph::new();
    graph.add_task("a", TaskKind::Host).unwrap();
    assert!(matches!(
      graph.add_task("a", TaskKind::Host),
      Err(PipelineError::DuplicateTask(_))
    ));
  }

  #[test]
  fn unknown_request_is_rejected() {
    let graph = TaskGraph::new();
    let err = graph.execution_plan(&["nope".to_string()]).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownTask(_)));
  }

  #[test]
  fn cycle_is_detected() {
    let mut graph = TaskGraph::new();
    graph.add_task("a", TaskKind::Host).unwrap();
    graph.add_task("b", TaskKind::Host).unwrap();
    graph.depends_on("a", "b").unwrap();
    graph.depends_on("b", "a").unwrap();
    let err = graph.execution_plan(&["a".to_string()]).unwrap_err();
    assert!(matches!(err, PipelineError::CycleDetected));
  }

  #[test]
  fn when_task_added_binds_existing_tasks_too() {
    let mut graph = TaskGraph::new();
    graph.add_task("sync", TaskKind::Sync).unwrap();
    graph.add_task("mergeDebugNativeLibs", TaskKind::Host).unwrap();
    graph.when_task_added(is_library_merge_task, "sync").unwrap();
    let plan = plan_names(&graph, &["mergeDebugNativeLibs"]);
    assert_eq!(plan, ["sync", "mergeDebugNativeLibs"]);
  }
}

//! Implementation of the `musebridge run` command.
//!
//! Drives the host pipeline's task names through the task graph: the sync
//! stage binds itself onto any task whose name matches the library-merge
//! pattern, and the build mode is derived from the task names.

use anyhow::{Context, Result};

use musebridge_lib::manifest::BridgeManifest;
use musebridge_lib::pipeline;

use crate::output::{print_info, print_stat, print_success};

pub fn cmd_run(manifest: &BridgeManifest, tasks: &[String]) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let summary = rt
    .block_on(pipeline::run_host_tasks(manifest, tasks))
    .context("Pipeline run failed")?;

  print_success(&format!("ran {} tasks ({} mode)", summary.executed.len(), summary.mode));
  print_stat("Order", &summary.executed.join(" → "));
  match &summary.build {
    Some(outcome) if outcome.invoked() => print_stat("Build", "toolchain invoked"),
    Some(_) => print_stat("Build", "up to date"),
    None => {}
  }
  if let Some(sync) = &summary.sync {
    print_stat(
      "Sync",
      &format!("{} copied, {} unchanged", sync.copied(), sync.unchanged()),
    );
  }
  if summary.build.is_none() && summary.sync.is_none() {
    print_info("no library-merge task in the request; nothing to build or place");
  }

  Ok(())
}

//! Implementation of the `musebridge sync` command.
//!
//! Builds anything stale, then places every target's artifact into the
//! ABI-keyed packaging tree.

use anyhow::{Context, Result};
use tracing::info;

use musebridge_lib::manifest::BridgeManifest;
use musebridge_lib::sync::PlaceAction;
use musebridge_lib::{build, sync};

use crate::output::{print_success, symbols};

pub fn cmd_sync(manifest: &BridgeManifest, release: bool) -> Result<()> {
  let mode = super::mode_from_flag(release);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt
    .block_on(async {
      build::realize(manifest, mode).await?;
      Ok::<_, anyhow::Error>(sync::place(manifest, mode).await?)
    })
    .context("Sync failed")?;

  for placed in &outcome.placed {
    let note = match placed.action {
      PlaceAction::Copied => "copied",
      PlaceAction::Unchanged => "unchanged",
    };
    println!(
      "  {} {} {} ({})",
      placed.target.abi,
      symbols::ARROW,
      placed.dest.display(),
      note
    );
  }
  print_success(&format!(
    "placed {} artifacts ({} copied, {} unchanged)",
    outcome.placed.len(),
    outcome.copied(),
    outcome.unchanged()
  ));
  info!(out_dir = %manifest.out_dir().display(), "placement tree updated");

  Ok(())
}

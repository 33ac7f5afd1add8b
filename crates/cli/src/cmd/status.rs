//! Implementation of the `musebridge status` command.
//!
//! Shows, per declared target, whether the built artifact is fresh against
//! the watched inputs and whether it has been placed into the packaging
//! tree.

use anyhow::Result;

use musebridge_lib::build::{FreshState, stale};
use musebridge_lib::manifest::BridgeManifest;
use musebridge_lib::target::Target;

use crate::output::{print_stat, symbols};

pub fn cmd_status(manifest: &BridgeManifest, release: bool, json: bool) -> Result<()> {
  let mode = super::mode_from_flag(release);
  let targets = manifest.targets_for(mode);
  let verdicts = stale::check(manifest, &targets)?;

  if json {
    let target_list: Vec<_> = verdicts
      .iter()
      .map(|v| {
        serde_json::json!({
          "abi": v.target.abi.name(),
          "state": state_name(v.state),
          "placed": placed_path_exists(manifest, &v.target),
        })
      })
      .collect();
    let output = serde_json::json!({
      "bridge": manifest.bridge.name,
      "mode": mode.dir_name(),
      "targets": target_list,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    return Ok(());
  }

  print_stat("Bridge", &manifest.bridge.name);
  print_stat("Mode", &mode.to_string());
  println!();

  for verdict in &verdicts {
    let symbol = match verdict.state {
      FreshState::Fresh => symbols::SUCCESS,
      FreshState::Stale => symbols::WARNING,
      FreshState::Missing => symbols::ERROR,
    };
    let placed = if placed_path_exists(manifest, &verdict.target) {
      "placed"
    } else {
      "not placed"
    };
    println!(
      "  {} {} {} {}, {}",
      symbol,
      verdict.target.abi,
      symbols::ARROW,
      state_name(verdict.state),
      placed
    );
  }

  Ok(())
}

fn state_name(state: FreshState) -> &'static str {
  match state {
    FreshState::Fresh => "fresh",
    FreshState::Stale => "stale",
    FreshState::Missing => "missing",
  }
}

fn placed_path_exists(manifest: &BridgeManifest, target: &Target) -> bool {
  target
    .placement_path(&manifest.out_dir(), &manifest.bridge.name)
    .is_file()
}

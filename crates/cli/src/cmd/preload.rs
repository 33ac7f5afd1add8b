//! Implementation of the `musebridge preload` command.
//!
//! Runs the native initialization sequence in this process: loads the
//! configured libraries in order via the platform dynamic loader and
//! performs the runtime-context handshake. Useful for verifying a packaged
//! library set outside the application.

use anyhow::{Result, bail};

use musebridge_lib::loader::{self, LoaderState, RuntimeContext};
use musebridge_lib::manifest::BridgeManifest;

use crate::output::{print_error, print_stat, print_success, print_warning, symbols};

pub fn cmd_preload(manifest: &BridgeManifest) -> Result<()> {
  let report = loader::init_once(&manifest.libraries, manifest.handshake.as_ref(), RuntimeContext::null());

  for attempt in &report.attempts {
    let kind = if attempt.required { "required" } else { "optional" };
    match &attempt.error {
      None => println!("  {} {} ({})", symbols::SUCCESS, attempt.name, kind),
      Some(error) => println!("  {} {} ({}): {}", symbols::ERROR, attempt.name, kind, error),
    }
  }

  if let Some(handshake) = &report.handshake {
    match &handshake.error {
      None => print_stat("Handshake", &format!("{}::{} ok", handshake.library, handshake.symbol)),
      Some(error) => print_warning(&format!(
        "handshake {}::{} failed: {}",
        handshake.library, handshake.symbol, error
      )),
    }
  }

  match report.state {
    LoaderState::HandshakeComplete => print_success("native initialization complete (handshake done)"),
    LoaderState::Loaded => print_success("native initialization complete"),
    LoaderState::LoadFailed | LoaderState::NotLoaded | LoaderState::Loading => {
      print_error("native initialization failed");
      bail!("a required library failed to load");
    }
  }

  Ok(())
}

//! Bridge manifest: the `bridge.toml` configuration file.
//!
//! The manifest names the bridge crate, the target ABIs, the toolchain
//! command, the native library load sequence, and the optional handshake.
//! Loading resolves relative paths against the manifest's directory and
//! validates the load-order rules up front, so the build, sync, and loader
//! stages can assume a well-formed configuration.

mod types;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use types::*;

use crate::target::{BuildMode, Target};

/// A validated bridge manifest with paths resolved against its location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeManifest {
  pub bridge: BridgeSection,
  #[serde(default)]
  pub toolchain: ToolchainSpec,
  #[serde(default, rename = "library")]
  pub libraries: Vec<LibraryEntry>,
  #[serde(default)]
  pub handshake: Option<HandshakeSpec>,

  /// Directory the manifest was loaded from; relative paths resolve here.
  #[serde(skip)]
  root: PathBuf,
}

impl BridgeManifest {
  /// Load and validate a manifest file.
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let mut manifest: BridgeManifest = toml::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    manifest.root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
    manifest.normalize()?;
    debug!(
      bridge = %manifest.bridge.name,
      targets = manifest.bridge.targets.len(),
      libraries = manifest.libraries.len(),
      "manifest loaded"
    );
    Ok(manifest)
  }

  /// Parse a manifest from a string, resolving paths against `root`.
  /// Used by tests and by callers that generate configuration.
  pub fn from_str_at(content: &str, root: &Path) -> Result<Self, ManifestError> {
    let mut manifest: BridgeManifest = toml::from_str(content).map_err(|source| ManifestError::Parse {
      path: root.join("<inline>"),
      source,
    })?;
    manifest.root = root.to_path_buf();
    manifest.normalize()?;
    Ok(manifest)
  }

  /// Validate structural rules and append the bridge library if absent.
  fn normalize(&mut self) -> Result<(), ManifestError> {
    if self.bridge.name.is_empty() {
      return Err(ManifestError::Invalid("bridge.name must not be empty".to_string()));
    }
    if self.bridge.targets.is_empty() {
      return Err(ManifestError::Invalid("at least one target abi is required".to_string()));
    }
    let mut seen = Vec::new();
    for abi in &self.bridge.targets {
      if seen.contains(abi) {
        return Err(ManifestError::Invalid(format!("duplicate target abi: {}", abi)));
      }
      seen.push(*abi);
    }

    let mut names = Vec::new();
    for lib in &self.libraries {
      if names.contains(&lib.name) {
        return Err(ManifestError::Invalid(format!("duplicate library: {}", lib.name)));
      }
      names.push(lib.name.clone());
    }

    // The bridge library depends on symbols from everything before it, so it
    // must sit at the end of the sequence. Append it when not listed.
    match self.libraries.iter().position(|lib| lib.name == self.bridge.name) {
      Some(pos) if pos != self.libraries.len() - 1 => {
        return Err(ManifestError::Invalid(format!(
          "bridge library {} must be last in the load sequence",
          self.bridge.name
        )));
      }
      Some(_) => {}
      None => self.libraries.push(LibraryEntry {
        name: self.bridge.name.clone(),
        required: true,
      }),
    }

    if let Some(handshake) = &self.handshake
      && !self.libraries.iter().any(|lib| lib.name == handshake.library)
    {
      return Err(ManifestError::Invalid(format!(
        "handshake library {} is not in the load sequence",
        handshake.library
      )));
    }

    Ok(())
  }

  /// Bridge crate root, resolved.
  pub fn source_dir(&self) -> PathBuf {
    self.root.join(&self.bridge.source_dir)
  }

  /// Placement tree root, resolved.
  pub fn out_dir(&self) -> PathBuf {
    self.root.join(&self.bridge.out_dir)
  }

  /// The declared targets at a given build mode.
  pub fn targets_for(&self, mode: BuildMode) -> Vec<Target> {
    self.bridge.targets.iter().map(|&abi| Target::new(abi, mode)).collect()
  }
}

//! Manifest data types, deserialized from `bridge.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::target::Abi;

/// Errors raised while loading or validating a bridge manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// Manifest file could not be read.
  #[error("cannot read manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Manifest file is not valid TOML for the expected schema.
  #[error("cannot parse manifest {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  /// Manifest parsed but violates a structural rule.
  #[error("invalid manifest: {0}")]
  Invalid(String),
}

/// The `[bridge]` section: where the bridge crate lives, what it produces,
/// and which ABIs to produce it for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSection {
  /// Library name without `lib` prefix or extension, e.g. `muse_bridge`.
  pub name: String,
  /// Bridge crate root, relative to the manifest.
  pub source_dir: PathBuf,
  /// ABI-keyed placement tree, relative to the manifest.
  pub out_dir: PathBuf,
  /// Declared target ABIs, one artifact each.
  pub targets: Vec<Abi>,
}

/// The `[toolchain]` section: how to invoke the cross-compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSpec {
  /// Program to spawn.
  pub program: String,
  /// Arguments placed before the per-target flags.
  pub args: Vec<String>,
}

impl Default for ToolchainSpec {
  fn default() -> Self {
    Self {
      program: "cargo".to_string(),
      args: vec!["ndk".to_string()],
    }
  }
}

/// One `[[library]]` entry in the native load sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
  /// Library name as passed to the dynamic loader (no prefix/extension).
  pub name: String,
  /// Whether a load failure aborts initialization.
  #[serde(default = "default_required")]
  pub required: bool,
}

fn default_required() -> bool {
  true
}

/// The `[handshake]` section: the one-time runtime-context call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeSpec {
  /// Library exporting the handshake symbol.
  pub library: String,
  /// Exported symbol taking one opaque context pointer.
  pub symbol: String,
}

//! Build targets: ABIs, build modes, and the ABI/triple translation table.
//!
//! The packaging step keys native libraries by Android ABI name
//! (`arm64-v8a`, ...), while the toolchain writes output under its own target
//! triple (`aarch64-linux-android`, ...). `Abi` owns the translation between
//! the two namings; a `Target` pairs an ABI with the build mode selected by
//! the invoking pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Error raised for architecture names outside the translation table.
#[derive(Debug, Error)]
pub enum TargetError {
  /// ABI name is not one the packaging step knows.
  #[error("unknown abi: {0}")]
  UnknownAbi(String),

  /// Toolchain triple is not one the translation table covers.
  #[error("unknown target triple: {0}")]
  UnknownTriple(String),
}

/// Android packaging ABI, the architecture key of the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Abi {
  #[serde(rename = "arm64-v8a")]
  Arm64V8a,
  #[serde(rename = "armeabi-v7a")]
  ArmeabiV7a,
  #[serde(rename = "x86_64")]
  X86_64,
  #[serde(rename = "x86")]
  X86,
}

impl Abi {
  /// All ABIs the translation table covers.
  pub const ALL: [Abi; 4] = [Abi::Arm64V8a, Abi::ArmeabiV7a, Abi::X86_64, Abi::X86];

  /// The packaging-side directory name for this ABI.
  pub fn name(self) -> &'static str {
    match self {
      Abi::Arm64V8a => "arm64-v8a",
      Abi::ArmeabiV7a => "armeabi-v7a",
      Abi::X86_64 => "x86_64",
      Abi::X86 => "x86",
    }
  }

  /// The toolchain target triple producing artifacts for this ABI.
  pub fn triple(self) -> &'static str {
    match self {
      Abi::Arm64V8a => "aarch64-linux-android",
      Abi::ArmeabiV7a => "armv7-linux-androideabi",
      Abi::X86_64 => "x86_64-linux-android",
      Abi::X86 => "i686-linux-android",
    }
  }

  /// Parse a packaging ABI name.
  pub fn from_name(name: &str) -> Result<Self, TargetError> {
    Self::ALL
      .into_iter()
      .find(|abi| abi.name() == name)
      .ok_or_else(|| TargetError::UnknownAbi(name.to_string()))
  }

  /// Reverse translation: toolchain triple back to packaging ABI.
  pub fn from_triple(triple: &str) -> Result<Self, TargetError> {
    Self::ALL
      .into_iter()
      .find(|abi| abi.triple() == triple)
      .ok_or_else(|| TargetError::UnknownTriple(triple.to_string()))
  }
}

impl fmt::Display for Abi {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Build mode, selected by the invoking pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
  #[default]
  Debug,
  Release,
}

impl BuildMode {
  /// The per-triple output subdirectory name for this mode.
  pub fn dir_name(self) -> &'static str {
    match self {
      BuildMode::Debug => "debug",
      BuildMode::Release => "release",
    }
  }

  /// Extra toolchain flags for this mode.
  pub fn cargo_flags(self) -> &'static [&'static str] {
    match self {
      BuildMode::Debug => &[],
      BuildMode::Release => &["--release"],
    }
  }

  /// Derive the mode from the host pipeline's invoked task names.
  ///
  /// Any task name containing "release" (case-insensitive) selects release
  /// mode for the whole run; otherwise the run is a debug build.
  pub fn from_task_names<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let release = names
      .into_iter()
      .any(|name| name.as_ref().to_ascii_lowercase().contains("release"));
    if release { BuildMode::Release } else { BuildMode::Debug }
  }
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.dir_name())
  }
}

/// An (ABI, build-mode) pair for which one artifact is built and placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
  pub abi: Abi,
  pub mode: BuildMode,
}

impl Target {
  pub fn new(abi: Abi, mode: BuildMode) -> Self {
    Self { abi, mode }
  }

  /// Toolchain output directory for this target under the bridge crate root.
  pub fn out_dir(&self, source_dir: &Path) -> PathBuf {
    source_dir
      .join(consts::TARGET_DIR)
      .join(self.abi.triple())
      .join(self.mode.dir_name())
  }

  /// Path of the produced shared library for this target.
  pub fn artifact_path(&self, source_dir: &Path, bridge_name: &str) -> PathBuf {
    self.out_dir(source_dir).join(consts::lib_filename(bridge_name))
  }

  /// Path the placement stage writes this target's artifact to.
  pub fn placement_path(&self, out_dir: &Path, bridge_name: &str) -> PathBuf {
    out_dir.join(self.abi.name()).join(consts::lib_filename(bridge_name))
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.abi, self.mode)
  }
}

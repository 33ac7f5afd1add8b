//! Crate-wide constants.

/// Default manifest filename, looked up in the working directory.
pub const DEFAULT_MANIFEST: &str = "bridge.toml";

/// Prefix of every produced shared-library filename.
pub const LIB_PREFIX: &str = "lib";

/// Extension of every produced shared library (Android packaging expects
/// `.so` regardless of the build host).
pub const LIB_EXT: &str = "so";

/// Directory inside the bridge crate that cargo writes per-triple output to.
pub const TARGET_DIR: &str = "target";

/// Watched source subdirectory inside the bridge crate.
pub const SRC_DIR: &str = "src";

/// Watched build manifest inside the bridge crate.
pub const CARGO_MANIFEST: &str = "Cargo.toml";

/// Task names used when driving the host pipeline.
pub const BUILD_TASK: &str = "buildRustAndroid";
pub const SYNC_TASK: &str = "syncRustLib";

/// Shared-library filename for a bridge name, e.g. `libmuse_bridge.so`.
pub fn lib_filename(name: &str) -> String {
  format!("{}{}.{}", LIB_PREFIX, name, LIB_EXT)
}

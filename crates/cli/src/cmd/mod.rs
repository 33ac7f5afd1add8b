mod build;
mod preload;
mod run;
mod status;
mod sync;

pub use build::cmd_build;
pub use preload::cmd_preload;
pub use run::cmd_run;
pub use status::cmd_status;
pub use sync::cmd_sync;

use musebridge_lib::target::BuildMode;

/// Build mode from the `--release` flag.
pub(crate) fn mode_from_flag(release: bool) -> BuildMode {
  if release { BuildMode::Release } else { BuildMode::Debug }
}

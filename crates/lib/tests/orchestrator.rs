//! Integration tests for the build orchestrator, placement stage, and the
//! task-graph driver, run against a stub toolchain script that records its
//! invocations and fabricates per-triple artifacts the way `cargo ndk`
//! lays them out.

#![cfg(unix)]

use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use musebridge_lib::build::{self, BuildError, BuildOutcome};
use musebridge_lib::manifest::BridgeManifest;
use musebridge_lib::pipeline;
use musebridge_lib::sync::{self, PlaceAction, SyncError};
use musebridge_lib::target::BuildMode;

/// A bridge project scaffold with a recording stub toolchain.
struct Scaffold {
  #[allow(dead_code)]
  dir: tempfile::TempDir,
  manifest: BridgeManifest,
  log: PathBuf,
}

impl Scaffold {
  fn new() -> Self {
    Self::with_script(STUB_TOOLCHAIN)
  }

  fn with_script(script_body: &str) -> Self {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("rust/src")).unwrap();
    fs::write(root.join("rust/Cargo.toml"), "[package]\nname = \"muse_bridge\"\n").unwrap();
    fs::write(root.join("rust/src/lib.rs"), "pub fn stream() {}\n").unwrap();
    // Inputs start in the past so freshly fabricated artifacts win.
    let past = SystemTime::now() - Duration::from_secs(3600);
    set_mtime(&root.join("rust/Cargo.toml"), past);
    set_mtime(&root.join("rust/src/lib.rs"), past);

    let log = root.join("toolchain.log");
    let script = root.join("stub-toolchain.sh");
    fs::write(&script, script_body.replace("@LOG@", &log.display().to_string())).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let manifest = BridgeManifest::from_str_at(
      &format!(
        r#"
[bridge]
name = "muse_bridge"
source_dir = "rust"
out_dir = "out"
targets = ["arm64-v8a", "armeabi-v7a"]

[toolchain]
program = "{}"
args = []
"#,
        script.display()
      ),
      root,
    )
    .unwrap();

    Self { dir, manifest, log }
  }

  fn invocations(&self) -> usize {
    match fs::read_to_string(&self.log) {
      Ok(content) => content.lines().count(),
      Err(_) => 0,
    }
  }

  fn touch_source(&self) {
    let source = self.manifest.source_dir().join("src/lib.rs");
    set_mtime(&source, SystemTime::now() + Duration::from_secs(10));
  }
}

fn set_mtime(path: &Path, time: SystemTime) {
  File::options()
    .write(true)
    .open(path)
    .unwrap()
    .set_modified(time)
    .unwrap();
}

/// Records each invocation, then fabricates one artifact per `-t <abi>`
/// under `target/<triple>/<mode>/`, mirroring the real toolchain layout.
const STUB_TOOLCHAIN: &str = r#"#!/bin/sh
echo "$@" >> "@LOG@"
mode=debug
for arg in "$@"; do
  [ "$arg" = "--release" ] && mode=release
done
prev=""
for arg in "$@"; do
  if [ "$prev" = "-t" ]; then
    case "$arg" in
      arm64-v8a) triple=aarch64-linux-android ;;
      armeabi-v7a) triple=armv7-linux-androideabi ;;
      x86_64) triple=x86_64-linux-android ;;
      x86) triple=i686-linux-android ;;
      *) exit 2 ;;
    esac
    mkdir -p "target/$triple/$mode"
    printf 'elf %s %s\n' "$triple" "$mode" > "target/$triple/$mode/libmuse_bridge.so"
  fi
  prev="$arg"
done
"#;

/// Records the invocation and exits non-zero without producing anything.
const FAILING_TOOLCHAIN: &str = r#"#!/bin/sh
echo "$@" >> "@LOG@"
exit 101
"#;

#[tokio::test]
async fn second_invocation_skips_the_toolchain() {
  let scaffold = Scaffold::new();

  let first = build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  assert!(first.invoked());
  assert_eq!(scaffold.invocations(), 1);

  let second = build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  assert!(matches!(second, BuildOutcome::Fresh { .. }));
  assert_eq!(scaffold.invocations(), 1);
}

#[tokio::test]
async fn source_change_triggers_a_rebuild() {
  let scaffold = Scaffold::new();

  build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  scaffold.touch_source();

  let outcome = build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  assert!(outcome.invoked());
  assert_eq!(scaffold.invocations(), 2);
}

#[tokio::test]
async fn mode_switch_rebuilds_into_separate_output_dirs() {
  let scaffold = Scaffold::new();

  build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  let outcome = build::realize(&scaffold.manifest, BuildMode::Release).await.unwrap();
  assert!(outcome.invoked());

  let source_dir = scaffold.manifest.source_dir();
  assert!(source_dir.join("target/aarch64-linux-android/debug/libmuse_bridge.so").is_file());
  assert!(
    source_dir
      .join("target/aarch64-linux-android/release/libmuse_bridge.so")
      .is_file()
  );
}

#[tokio::test]
async fn toolchain_failure_is_fatal_with_exit_code() {
  let scaffold = Scaffold::with_script(FAILING_TOOLCHAIN);

  let err = build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap_err();
  match err {
    BuildError::ToolchainFailed { code, .. } => assert_eq!(code, Some(101)),
    other => panic!("expected ToolchainFailed, got {other:?}"),
  }
}

#[tokio::test]
async fn end_to_end_build_and_place_debug() {
  let scaffold = Scaffold::new();
  scaffold.touch_source();

  build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  let outcome = sync::place(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  assert_eq!(outcome.copied(), 2);

  let out = scaffold.manifest.out_dir();
  assert!(out.join("arm64-v8a/libmuse_bridge.so").is_file());
  assert!(out.join("armeabi-v7a/libmuse_bridge.so").is_file());

  // Exactly two artifact files in the placement tree.
  let placed: Vec<_> = walkdir::WalkDir::new(&out)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .collect();
  assert_eq!(placed.len(), 2);
}

#[tokio::test]
async fn placement_without_artifacts_is_a_missing_artifact_error() {
  let scaffold = Scaffold::new();

  let err = sync::place(&scaffold.manifest, BuildMode::Debug).await.unwrap_err();
  assert!(matches!(err, SyncError::MissingArtifact { .. }));
  // No half-filled output tree.
  assert!(!scaffold.manifest.out_dir().join("arm64-v8a").exists());
}

#[tokio::test]
async fn replacing_unchanged_artifacts_rewrites_nothing() {
  let scaffold = Scaffold::new();

  build::realize(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  sync::place(&scaffold.manifest, BuildMode::Debug).await.unwrap();

  let placed = scaffold.manifest.out_dir().join("arm64-v8a/libmuse_bridge.so");
  let marker = SystemTime::now() - Duration::from_secs(900);
  set_mtime(&placed, marker);

  let outcome = sync::place(&scaffold.manifest, BuildMode::Debug).await.unwrap();
  assert!(outcome.placed.iter().all(|p| p.action == PlaceAction::Unchanged));
  assert_eq!(fs::metadata(&placed).unwrap().modified().unwrap(), marker);
}

#[tokio::test]
async fn merge_task_drives_build_then_sync() {
  let scaffold = Scaffold::new();

  let tasks = vec!["mergeDebugJniLibFolders".to_string()];
  let summary = pipeline::run_host_tasks(&scaffold.manifest, &tasks).await.unwrap();

  assert_eq!(summary.mode, BuildMode::Debug);
  assert_eq!(
    summary.executed,
    ["buildRustAndroid", "syncRustLib", "mergeDebugJniLibFolders"]
  );
  assert!(summary.build.unwrap().invoked());
  assert_eq!(summary.sync.unwrap().placed.len(), 2);
  assert!(scaffold.manifest.out_dir().join("arm64-v8a/libmuse_bridge.so").is_file());
}

#[tokio::test]
async fn release_task_name_selects_release_mode() {
  let scaffold = Scaffold::new();

  let tasks = vec!["mergeReleaseNativeLibs".to_string()];
  let summary = pipeline::run_host_tasks(&scaffold.manifest, &tasks).await.unwrap();

  assert_eq!(summary.mode, BuildMode::Release);
  let placed = scaffold.manifest.out_dir().join("arm64-v8a/libmuse_bridge.so");
  let content = fs::read_to_string(&placed).unwrap();
  assert!(content.contains("release"));
}

#[tokio::test]
async fn non_merge_task_does_not_trigger_build_or_sync() {
  let scaffold = Scaffold::new();

  let tasks = vec!["compileDebugKotlin".to_string()];
  let summary = pipeline::run_host_tasks(&scaffold.manifest, &tasks).await.unwrap();

  assert_eq!(summary.executed, ["compileDebugKotlin"]);
  assert!(summary.build.is_none());
  assert!(summary.sync.is_none());
  assert_eq!(scaffold.invocations(), 0);
}

//! musebridge-lib: Core logic for the musebridge native-bridge toolchain
//!
//! This crate provides the pieces that sit between a Rust sensor-bridge crate
//! and the Android application that embeds it:
//! - `build`: cross-compiles the bridge crate for every declared ABI, skipping
//!   the toolchain when nothing changed
//! - `sync`: places the produced shared libraries into the ABI-keyed tree the
//!   packaging step scans
//! - `pipeline`: a small task graph that binds the sync stage onto the host
//!   pipeline's library-merge tasks by name predicate
//! - `loader`: loads the bundled native libraries in dependency order at
//!   process start and performs the one-time runtime handshake

pub mod build;
pub mod consts;
pub mod loader;
pub mod manifest;
pub mod pipeline;
pub mod sync;
pub mod target;
pub mod util;

//! Native library loader/initializer.
//!
//! Loads the configured native libraries in dependency order on the
//! process's startup path, then performs the one-time handshake that hands
//! the opaque runtime context into the configured module.
//!
//! Failure policy (applied consistently, see the tests):
//! - a failed **required** library stops the sequence; libraries after it
//!   are not attempted and the state is [`LoaderState::LoadFailed`]
//! - a failed **optional** library is logged and skipped; loading continues
//!   and [`LoaderState::Loaded`] is still reachable
//! - the handshake runs only after loading completes, at most once; a
//!   missing symbol or failed call is logged and leaves the state at
//!   `Loaded`, never aborting initialization
//!
//! Already-loaded libraries are never rolled back; native loading is not
//! reversible.

mod backend;
mod types;

use std::sync::OnceLock;

use tracing::{error, info, warn};

use crate::manifest::{HandshakeSpec, LibraryEntry};

pub use backend::*;
pub use types::*;

/// Run one initialization pass over `backend`.
pub fn initialize(
  backend: &mut dyn LibraryBackend,
  libraries: &[LibraryEntry],
  handshake: Option<&HandshakeSpec>,
  context: RuntimeContext,
) -> InitReport {
  let mut report = InitReport {
    state: LoaderState::Loading,
    attempts: Vec::new(),
    handshake: None,
  };

  for entry in libraries {
    match backend.load(&entry.name) {
      Ok(()) => {
        info!(library = %entry.name, "loaded");
        report.attempts.push(LoadAttempt {
          name: entry.name.clone(),
          required: entry.required,
          error: None,
        });
      }
      Err(e) => {
        report.attempts.push(LoadAttempt {
          name: entry.name.clone(),
          required: entry.required,
          error: Some(e.to_string()),
        });
        if entry.required {
          error!(library = %entry.name, error = %e, "required library failed to load, stopping");
          report.state = LoaderState::LoadFailed;
          return report;
        }
        warn!(library = %entry.name, error = %e, "optional library failed to load, continuing");
      }
    }
  }

  report.state = LoaderState::Loaded;

  if let Some(spec) = handshake {
    match backend.handshake(&spec.library, &spec.symbol, context) {
      Ok(()) => {
        info!(library = %spec.library, symbol = %spec.symbol, "handshake complete");
        report.state = LoaderState::HandshakeComplete;
        report.handshake = Some(HandshakeAttempt {
          library: spec.library.clone(),
          symbol: spec.symbol.clone(),
          error: None,
        });
      }
      Err(e) => {
        warn!(library = %spec.library, symbol = %spec.symbol, error = %e, "handshake failed");
        report.handshake = Some(HandshakeAttempt {
          library: spec.library.clone(),
          symbol: spec.symbol.clone(),
          error: Some(e.to_string()),
        });
      }
    }
  }

  report
}

static NATIVE_INIT: OnceLock<InitReport> = OnceLock::new();

/// Process-wide initialization, performed at most once.
///
/// The first call loads the libraries through the platform dynamic loader
/// and keeps their handles resident for the process lifetime; every later
/// call returns the original report without loading anything.
pub fn init_once(
  libraries: &[LibraryEntry],
  handshake: Option<&HandshakeSpec>,
  context: RuntimeContext,
) -> &'static InitReport {
  NATIVE_INIT.get_or_init(|| {
    // Handles must outlive this call; the backend is intentionally leaked.
    let backend: &'static mut DlBackend = Box::leak(Box::new(DlBackend::new()));
    initialize(backend, libraries, handshake, context)
  })
}

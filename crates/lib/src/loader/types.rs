//! Types for the native library loader.

use std::ffi::c_void;

use thiserror::Error;

/// Errors raised by a library backend.
#[derive(Debug, Error)]
pub enum LoaderError {
  /// The dynamic loader could not load a named library.
  #[error("failed to load library {name}: {message}")]
  LoadFailed { name: String, message: String },

  /// Handshake targeted a library that is not resident.
  #[error("library {name} is not loaded")]
  LibraryNotLoaded { name: String },

  /// Handshake symbol is absent from the target library. Older bridge
  /// builds do not export it; this is tolerated.
  #[error("library {library} does not export {symbol}: {message}")]
  SymbolMissing {
    library: String,
    symbol: String,
    message: String,
  },

  /// Handshake symbol was called and reported failure.
  #[error("handshake {symbol} in {library} returned {code}")]
  HandshakeFailed {
    library: String,
    symbol: String,
    code: i32,
  },
}

/// Loader lifecycle. One forward pass per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
  NotLoaded,
  Loading,
  /// Every required library is resident. Optional libraries may be absent.
  Loaded,
  /// A required library failed to load; the sequence stopped there.
  LoadFailed,
  /// `Loaded`, plus the runtime-context handshake succeeded.
  HandshakeComplete,
}

/// Opaque, non-owning handle to the host runtime environment.
///
/// The host process owns whatever the pointer refers to; the native module
/// receiving it through the handshake holds it for the process lifetime. A
/// null context is valid and means "no host environment object".
#[derive(Debug, Clone, Copy)]
pub struct RuntimeContext(*mut c_void);

impl RuntimeContext {
  /// A null context.
  pub fn null() -> Self {
    Self(std::ptr::null_mut())
  }

  /// Wrap a raw host-runtime pointer.
  ///
  /// # Safety
  ///
  /// The pointer must stay valid for the lifetime of the process, since the
  /// native module keeps it after the handshake.
  pub unsafe fn from_ptr(ptr: *mut c_void) -> Self {
    Self(ptr)
  }

  pub fn as_ptr(self) -> *mut c_void {
    self.0
  }
}

/// Result of one library load attempt.
#[derive(Debug, Clone)]
pub struct LoadAttempt {
  pub name: String,
  pub required: bool,
  /// `None` on success.
  pub error: Option<String>,
}

impl LoadAttempt {
  pub fn ok(&self) -> bool {
    self.error.is_none()
  }
}

/// Result of the one handshake attempt.
#[derive(Debug, Clone)]
pub struct HandshakeAttempt {
  pub library: String,
  pub symbol: String,
  /// `None` on success.
  pub error: Option<String>,
}

/// Aggregated result of one initialization run.
///
/// Every attempted load is recorded, so partial failure is observable
/// instead of being swallowed; libraries after a failed required load are
/// deliberately absent.
#[derive(Debug, Clone)]
pub struct InitReport {
  pub state: LoaderState,
  pub attempts: Vec<LoadAttempt>,
  pub handshake: Option<HandshakeAttempt>,
}

impl InitReport {
  /// Whether every required library is resident.
  pub fn usable(&self) -> bool {
    matches!(self.state, LoaderState::Loaded | LoaderState::HandshakeComplete)
  }

  /// Names of libraries that are resident after this run.
  pub fn loaded(&self) -> impl Iterator<Item = &str> {
    self.attempts.iter().filter(|a| a.ok()).map(|a| a.name.as_str())
  }
}

//! Library backends: how libraries actually get loaded.
//!
//! The loader drives a [`LibraryBackend`], so the sequencing and failure
//! policy stay testable without touching the platform's dynamic loader.
//! Production uses [`DlBackend`] over `libloading`.

use std::collections::HashMap;
use std::ffi::c_void;

use tracing::debug;

use super::types::{LoaderError, RuntimeContext};

/// Signature of the exported handshake function: one opaque runtime-context
/// pointer in, zero on success.
type HandshakeFn = unsafe extern "C" fn(*mut c_void) -> i32;

/// Loads libraries by name and invokes the handshake symbol.
pub trait LibraryBackend {
  /// Load one library by name (no prefix, extension, or path).
  fn load(&mut self, name: &str) -> Result<(), LoaderError>;

  /// Call `symbol(context)` inside an already-loaded `library`.
  fn handshake(&mut self, library: &str, symbol: &str, context: RuntimeContext) -> Result<(), LoaderError>;
}

/// Production backend over the platform dynamic loader.
///
/// Libraries are resolved by name through the platform search path, which
/// the packaging step populated. Handles stay resident for the process
/// lifetime; there is no unload.
#[derive(Default)]
pub struct DlBackend {
  libraries: HashMap<String, libloading::Library>,
}

impl DlBackend {
  pub fn new() -> Self {
    Self::default()
  }
}

impl LibraryBackend for DlBackend {
  fn load(&mut self, name: &str) -> Result<(), LoaderError> {
    let filename = libloading::library_filename(name);
    debug!(library = name, filename = ?filename, "dlopen");
    let library = unsafe { libloading::Library::new(&filename) }.map_err(|e| LoaderError::LoadFailed {
      name: name.to_string(),
      message: e.to_string(),
    })?;
    self.libraries.insert(name.to_string(), library);
    Ok(())
  }

  fn handshake(&mut self, library: &str, symbol: &str, context: RuntimeContext) -> Result<(), LoaderError> {
    let lib = self
      .libraries
      .get(library)
      .ok_or_else(|| LoaderError::LibraryNotLoaded {
        name: library.to_string(),
      })?;

    let func: libloading::Symbol<'_, HandshakeFn> =
      unsafe { lib.get(symbol.as_bytes()) }.map_err(|e| LoaderError::SymbolMissing {
        library: library.to_string(),
        symbol: symbol.to_string(),
        message: e.to_string(),
      })?;

    debug!(library, symbol, context = ?context.as_ptr(), "calling handshake");
    let code = unsafe { func(context.as_ptr()) };
    if code != 0 {
      return Err(LoaderError::HandshakeFailed {
        library: library.to_string(),
        symbol: symbol.to_string(),
        code,
      });
    }
    Ok(())
  }
}

//! Content hashing for artifact comparison.
//!
//! The placement stage compares source and destination hashes to keep
//! re-placement idempotent: placed artifacts are never rewritten when their
//! content is unchanged.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

/// A full 64-character lowercase hex SHA-256 of file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash a single file's content.
pub fn hash_file(path: &Path) -> std::io::Result<ContentHash> {
  let mut file = File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let n = file.read(&mut buffer)?;
    if n == 0 {
      break;
    }
    hasher.update(&buffer[..n]);
  }
  Ok(ContentHash(hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_content_hashes_equal() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.so");
    let b = dir.path().join("b.so");
    std::fs::write(&a, b"native payload").unwrap();
    std::fs::write(&b, b"native payload").unwrap();
    assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
  }

  #[test]
  fn different_content_hashes_differ() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.so");
    let b = dir.path().join("b.so");
    std::fs::write(&a, b"one").unwrap();
    std::fs::write(&b, b"two").unwrap();
    assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
  }
}

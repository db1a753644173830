//! Streaming content hash used for per-file digests and the TOC digest.
//!
//! The wider format is specified against an abstract `reset`/`input`/`result`
//! SHA-1 contract so that the concrete primitive is swappable; this crate
//! satisfies that contract with the `sha1` crate rather than asking callers
//! to bring their own digest implementation.

use sha1::{Digest, Sha1};

use crate::format::Hash;

/// Streaming SHA-1 accumulator matching the `reset`/`input`/`result`
/// contract this format is specified against.
#[derive(Default)]
pub struct ContentHasher {
    inner: Sha1,
}

impl ContentHasher {
    pub fn new() -> Self {
        ContentHasher { inner: Sha1::new() }
    }

    pub fn reset(&mut self) {
        self.inner = Sha1::new();
    }

    pub fn input(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Finalizes the digest, consuming the hasher.
    pub fn result(self) -> Hash {
        let digest = self.inner.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest);
        out
    }
}

/// Convenience one-shot hash, used for the empty-file boundary case and in
/// tests.
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = ContentHasher::new();
    hasher.input(data);
    hasher.result()
}

/// Parses a 40-character hex string into a raw 20-byte hash. Returns `None`
/// on any malformed input (wrong length, non-hex characters) without
/// performing any further work — callers must not fall back to a linear
/// scan when this returns `None`.
pub fn parse_hex_hash(hex_str: &str) -> Option<Hash> {
    if hex_str.len() != 40 {
        return None;
    }
    let mut out = [0u8; 20];
    hex::decode_to_slice(hex_str, &mut out).ok()?;
    Some(out)
}

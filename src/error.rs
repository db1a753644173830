//! Error kinds surfaced by this crate.
//!
//! The on-disk format distinguishes far fewer error kinds than a full
//! application would want, so this enum collapses every failure into the
//! six kinds the archive core itself needs to tell apart internally: I/O,
//! format, integrity, not-found, mode violation, and resource exhaustion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FarcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed archive: {0}")]
    Format(String),

    #[error("TOC digest mismatch")]
    Integrity,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("mode violation: {0}")]
    ModeViolation(String),

    #[error("resource exhausted: {0}")]
    Exhausted(String),
}

pub type Result<T> = std::result::Result<T, FarcError>;

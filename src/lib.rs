//! # farc — content-addressable file archive format
//!
//! Format guarantees:
//! - All multi-byte integers are little-endian, 32-bit unless noted.
//! - An archive is `[data region][TOC][56-byte footer]`; the footer is
//!   found by scanning backwards from end of file for its cookie, so an
//!   archive can be opened without any separately stored index.
//! - The TOC is one opaque, optionally block-compressed byte region whose
//!   own digest (SHA-1) is checked against the footer on every open —
//!   a corrupt TOC is rejected before any path lookup is attempted.
//! - Every file's content is hashed (SHA-1) independently of its path, so
//!   the same bytes written under two different names are reachable by
//!   hash from either, and the same path written twice is reachable by
//!   hash from both writes even though only the most recent is reachable
//!   by path.
//! - Per-entry and TOC compression are independent; either may be `NONE`,
//!   `FASTLZ`, or the optional `DEFLATE`.
//!
//! See `DESIGN.md` in the repository root for how each module here is
//! grounded against the historical reference implementation.

pub mod archive;
pub mod block;
pub mod codec;
pub mod dir;
pub mod error;
pub mod file_reader;
pub mod file_writer;
pub mod format;
pub mod hash;
pub mod info;
pub mod path;
pub mod reader;
pub mod toc;
pub mod toc_builder;
pub mod writer;

pub use archive::Archive;
pub use error::{FarcError, Result};
pub use file_reader::FileReader;
pub use file_writer::FileWriter;
pub use format::Compression;
pub use info::{ArchiveInfo, DirEntry, EntryKind};
pub use reader::ArchiveReader;
pub use writer::ArchiveWriter;

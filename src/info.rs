//! Reporting structures surfaced at archive-open/close and during
//! directory enumeration. These reinstate the original interface's
//! `fa_archiveinfo_t` and `fa_dirinfo_t` out-parameters as ordinary return
//! values.

use crate::format::{Compression, Footer, Hash, Header};

/// Header and footer of an archive, available once it has been opened (read
/// mode) or just been finalized (write mode).
#[derive(Debug, Clone, Copy)]
pub struct ArchiveInfo {
    pub header: Header,
    pub footer: Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One enumerated directory or file entry.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    pub compression: Compression,
    pub size_original: u32,
    pub size_compressed: u32,
    pub hash: Hash,
}

impl DirEntry {
    pub(crate) fn dir(name: String) -> Self {
        DirEntry {
            name,
            kind: EntryKind::Dir,
            compression: Compression::None,
            size_original: 0,
            size_compressed: 0,
            hash: [0u8; 20],
        }
    }
}

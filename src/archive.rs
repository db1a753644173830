//! Entry points for opening and creating archives.
//!
//! `Archive` itself holds no state; it exists so callers write
//! `Archive::open(stream)` / `Archive::create(stream, alignment)` rather
//! than reaching into [`crate::reader`] or [`crate::writer`] directly. The
//! source exposes the same two-function shape (`fa_open_archive` /
//! `fa_create_archive`), construction there is implicit — entries are
//! assembled one at a time and finalized by `fa_close_archive`, same as
//! here via [`crate::writer::ArchiveWriter::close`].

use std::io::{Read, Seek, Write};

use crate::error::Result;
use crate::reader::ArchiveReader;
use crate::writer::ArchiveWriter;

pub struct Archive;

impl Archive {
    /// Opens an existing archive for reading.
    pub fn open<R: Read + Seek>(stream: R) -> Result<ArchiveReader<R>> {
        ArchiveReader::open(stream)
    }

    /// Starts a new archive for writing. `alignment`, if greater than 1,
    /// pads every file's starting data offset up to the next multiple.
    pub fn create<W: Write + Seek>(stream: W, alignment: u32) -> ArchiveWriter<W> {
        ArchiveWriter::create(stream, alignment)
    }
}

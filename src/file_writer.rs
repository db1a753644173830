//! Write handle for one file being appended to an archive under
//! construction. Mirrors the source's `fa_open_file` (write mode) /
//! `fa_write_file` / `fa_close_file` cluster.

use std::io::{Seek, Write};

use crate::error::Result;
use crate::format::{Compression, MAX_BLOCK_SIZE};
use crate::hash::ContentHasher;
use crate::info::{DirEntry, EntryKind};
use crate::toc_builder::WriterEntry;
use crate::writer::ArchiveWriter;
use crate::{block, path};

pub struct FileWriter<'a, W: Write + Seek> {
    archive: &'a mut ArchiveWriter<W>,
    path: String,
    compression: Compression,
    data_offset: u32,
    hasher: ContentHasher,
    staging: Vec<u8>,
    size_original: u64,
    size_compressed: u64,
}

impl<'a, W: Write + Seek> FileWriter<'a, W> {
    pub(crate) fn new(archive: &'a mut ArchiveWriter<W>, path: String, compression: Compression) -> Result<Self> {
        let data_offset = archive.align_for_next_file()?;
        Ok(FileWriter {
            archive,
            path,
            compression,
            data_offset,
            hasher: ContentHasher::new(),
            staging: Vec::new(),
            size_original: 0,
            size_compressed: 0,
        })
    }

    /// Appends `bytes` to the file being written. Uncompressed files are
    /// streamed straight through; compressed files are accumulated into
    /// [`MAX_BLOCK_SIZE`]-sized blocks and flushed as they fill.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.hasher.input(bytes);
        self.size_original += bytes.len() as u64;

        if self.compression == Compression::None {
            self.archive.stream.write_all(bytes)?;
            self.size_compressed += bytes.len() as u64;
            self.archive.offset_compressed += bytes.len() as u64;
            self.archive.offset_original += bytes.len() as u64;
            return Ok(());
        }

        self.staging.extend_from_slice(bytes);
        while self.staging.len() >= MAX_BLOCK_SIZE {
            let rest = self.staging.split_off(MAX_BLOCK_SIZE);
            let chunk = std::mem::replace(&mut self.staging, rest);
            self.flush_block(&chunk)?;
        }
        Ok(())
    }

    fn flush_block(&mut self, chunk: &[u8]) -> Result<()> {
        let encoded = block::encode_block(self.compression, chunk);
        self.archive.stream.write_all(&encoded)?;
        self.size_compressed += encoded.len() as u64;
        self.archive.offset_compressed += encoded.len() as u64;
        self.archive.offset_original += chunk.len() as u64;
        Ok(())
    }

    /// Finalizes the file: flushes any partial trailing block, records the
    /// entry in the archive's writer-side table, and returns a summary of
    /// what was written.
    pub fn close(mut self) -> Result<DirEntry> {
        if self.compression != Compression::None && !self.staging.is_empty() {
            let chunk = std::mem::take(&mut self.staging);
            self.flush_block(&chunk)?;
        }
        let hash = self.hasher.result();
        let normalized = path::normalize(&self.path);

        self.archive.entries.push(WriterEntry {
            path: normalized.clone(),
            data_offset: self.data_offset,
            compression: self.compression,
            size_original: self.size_original as u32,
            size_compressed: self.size_compressed as u32,
            hash,
        });

        let (_, name) = path::split_segments(&normalized);
        Ok(DirEntry {
            name: name.to_string(),
            kind: EntryKind::File,
            compression: self.compression,
            size_original: self.size_original as u32,
            size_compressed: self.size_compressed as u32,
            hash,
        })
    }
}

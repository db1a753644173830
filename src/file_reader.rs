//! Read handle for one entry's data stream.
//!
//! Mirrors the source's `fa_open_file` / `fa_read_file` / `fa_seek` /
//! `fa_tell` cluster. A `FileReader` borrows its archive mutably for its
//! whole lifetime: since the underlying stream and the decompression cache
//! are both owned by the archive, that borrow is what stands in for the
//! source's single-cache-ownership rule — at most one file can be mid-read
//! at a time, enforced at compile time rather than with a runtime flag.

use std::io::{Read, Seek, SeekFrom};

use crate::block;
use crate::error::{FarcError, Result};
use crate::format::{BlockHeader, Compression, Entry, Hash};
use crate::reader::ArchiveReader;

pub struct FileReader<'a, R: Read + Seek> {
    archive: &'a mut ArchiveReader<R>,
    entry: Entry,
    hash: Hash,
    compression: Compression,
    base: u64,
    pos_original: u64,
    pos_read_compressed: u64,
    staging: Vec<u8>,
    staging_pos: usize,
}

impl<'a, R: Read + Seek> FileReader<'a, R> {
    pub(crate) fn new(archive: &'a mut ArchiveReader<R>, entry: Entry, hash: Hash) -> Result<Self> {
        let compression = Compression::from_tag(entry.compression)
            .ok_or_else(|| FarcError::Format(format!("unknown compression tag {:#x}", entry.compression)))?;
        let base = archive.data_base() + entry.data_offset as u64;
        archive.cache.clear();
        Ok(FileReader {
            archive,
            entry,
            hash,
            compression,
            base,
            pos_original: 0,
            pos_read_compressed: 0,
            staging: Vec::new(),
            staging_pos: 0,
        })
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn size(&self) -> u32 {
        self.entry.size_original
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Reads up to `buf.len()` bytes, returning the number actually read.
    /// Returns `0` at end of file, matching [`std::io::Read`] convention.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.compression == Compression::None {
            return self.read_none(buf);
        }

        let mut written = 0;
        while written < buf.len() && self.pos_original < self.entry.size_original as u64 {
            if self.staging_pos >= self.staging.len() {
                self.staging = self.next_block()?;
                self.staging_pos = 0;
            }
            let avail = self.staging.len() - self.staging_pos;
            let want = (buf.len() - written).min(avail);
            buf[written..written + want].copy_from_slice(&self.staging[self.staging_pos..self.staging_pos + want]);
            self.staging_pos += want;
            written += want;
            self.pos_original += want as u64;
        }
        Ok(written)
    }

    fn read_none(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = self.entry.size_original as u64 - self.pos_original;
        let want = (buf.len() as u64).min(remaining) as usize;
        if want == 0 {
            return Ok(0);
        }
        self.archive.stream.seek(SeekFrom::Start(self.base + self.pos_original))?;
        self.archive.stream.read_exact(&mut buf[..want])?;
        self.pos_original += want as u64;
        Ok(want)
    }

    /// Seek within an uncompressed file. Compressed files are append-only
    /// streams of blocks and do not support random access, matching the
    /// source's restriction there.
    pub fn seek(&mut self, offset: i64, whence: SeekFrom) -> Result<()> {
        if self.compression != Compression::None {
            return Err(FarcError::ModeViolation("seek is unsupported on a compressed file".into()));
        }
        let size = self.entry.size_original as i64;
        let base = match whence {
            SeekFrom::Start(_) => 0,
            SeekFrom::Current(_) => self.pos_original as i64,
            SeekFrom::End(_) => size,
        };
        let target = base + offset;
        if !(0..=size).contains(&target) {
            return Err(FarcError::Format("seek target outside file bounds".into()));
        }
        self.pos_original = target as u64;
        Ok(())
    }

    pub fn tell(&self) -> u64 {
        self.pos_original
    }

    /// Decodes and returns the next block of decompressed bytes, refilling
    /// the archive's scratch cache from the stream as needed.
    fn next_block(&mut self) -> Result<Vec<u8>> {
        self.fill_cache(BlockHeader::SIZE)?;
        if self.archive.cache.len() < BlockHeader::SIZE {
            return Err(FarcError::Format("truncated block header".into()));
        }
        let mut hdr_buf = [0u8; BlockHeader::SIZE];
        hdr_buf.copy_from_slice(&self.archive.cache[..BlockHeader::SIZE]);
        let header = BlockHeader::read(&hdr_buf);

        let need = BlockHeader::SIZE + header.payload_len();
        self.fill_cache(need)?;
        if self.archive.cache.len() < need {
            return Err(FarcError::Format("truncated block payload".into()));
        }

        let (decoded, consumed) = block::decode_block(self.compression, &self.archive.cache[..need])
            .ok_or_else(|| FarcError::Format("malformed block".into()))?;
        self.archive.cache.drain(0..consumed);
        Ok(decoded)
    }

    /// Grows the archive's cache to at least `min_bytes` by reading more of
    /// this entry's compressed stream, stopping early at end of entry.
    fn fill_cache(&mut self, min_bytes: usize) -> Result<()> {
        while self.archive.cache.len() < min_bytes && self.pos_read_compressed < self.entry.size_compressed as u64 {
            let remaining = self.entry.size_compressed as u64 - self.pos_read_compressed;
            let want = ((min_bytes - self.archive.cache.len()) as u64).min(remaining) as usize;
            if want == 0 {
                break;
            }
            self.archive.stream.seek(SeekFrom::Start(self.base + self.pos_read_compressed))?;
            let mut chunk = vec![0u8; want];
            self.archive.stream.read_exact(&mut chunk)?;
            self.archive.cache.extend_from_slice(&chunk);
            self.pos_read_compressed += want as u64;
        }
        Ok(())
    }
}

//! Read-mode archive handle. Mirrors the source's `fa_open_archive` /
//! `fa_close_archive` and the lookup half of `fa_open_file`.

use std::io::{Read, Seek, SeekFrom};

use crate::block;
use crate::dir::DirIter;
use crate::error::{FarcError, Result};
use crate::file_reader::FileReader;
use crate::format::{BlockHeader, Compression, Footer, Hash, ARCHIVE_CACHE_SIZE, FOOTER_COOKIE, MAX_BLOCK_SIZE};
use crate::hash::hash_bytes;
use crate::info::ArchiveInfo;
use crate::path;
use crate::toc::Toc;

/// An opened archive, ready to resolve paths and hashes into readable
/// files. Holds the parsed table of contents in memory and a single
/// scratch cache shared by whichever [`FileReader`] currently borrows it.
pub struct ArchiveReader<R: Read + Seek> {
    pub(crate) stream: R,
    toc: Toc,
    footer: Footer,
    data_base: u64,
    pub(crate) cache: Vec<u8>,
}

impl<R: Read + Seek> std::fmt::Debug for ArchiveReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("footer", &self.footer)
            .field("data_base", &self.data_base)
            .finish_non_exhaustive()
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Opens an archive by scanning backwards from the end of the stream
    /// for the footer, decompressing the TOC it points at, and verifying
    /// the TOC digest. See module docs on `archive.c`'s original algorithm.
    pub fn open(mut stream: R) -> Result<Self> {
        let file_size = stream.seek(SeekFrom::End(0))?;
        if file_size < Footer::SIZE as u64 {
            return Err(FarcError::Format("file too small to hold a footer".into()));
        }

        let scan_len = (ARCHIVE_CACHE_SIZE as u64).min(file_size) as usize;
        stream.seek(SeekFrom::Start(file_size - scan_len as u64))?;
        let mut tail = vec![0u8; scan_len];
        stream.read_exact(&mut tail)?;

        let cookie_bytes = FOOTER_COOKIE.to_le_bytes();
        let mut footer_pos = None;
        let mut i = scan_len - Footer::SIZE;
        loop {
            if tail[i..i + 4] == cookie_bytes {
                footer_pos = Some(i);
                break;
            }
            if i == 0 {
                break;
            }
            i -= 1;
        }
        let footer_pos = footer_pos.ok_or_else(|| FarcError::Format("footer cookie not found".into()))?;

        let mut footer_buf = [0u8; Footer::SIZE];
        footer_buf.copy_from_slice(&tail[footer_pos..footer_pos + Footer::SIZE]);
        let footer = Footer::read(&footer_buf).ok_or_else(|| FarcError::Format("footer cookie mismatch".into()))?;

        let footer_offset_from_end = (scan_len - footer_pos) as u64;
        let toc_start = file_size
            .checked_sub(footer_offset_from_end)
            .and_then(|v| v.checked_sub(footer.toc_compressed as u64))
            .ok_or_else(|| FarcError::Format("footer TOC size overflows file bounds".into()))?;
        let data_base = toc_start
            .checked_sub(footer.data_compressed as u64)
            .ok_or_else(|| FarcError::Format("footer data size overflows file bounds".into()))?;

        stream.seek(SeekFrom::Start(toc_start))?;
        let mut raw = vec![0u8; footer.toc_compressed as usize];
        stream.read_exact(&mut raw)?;

        let toc_compression = Compression::from_tag(footer.toc_compression)
            .ok_or_else(|| FarcError::Format(format!("unknown TOC compression tag {:#x}", footer.toc_compression)))?;

        let decompressed = if toc_compression == Compression::None {
            if raw.len() != footer.toc_original as usize {
                return Err(FarcError::Format("uncompressed TOC size mismatch".into()));
            }
            raw
        } else {
            let mut out = Vec::with_capacity(footer.toc_original as usize);
            let mut pos = 0;
            while out.len() < footer.toc_original as usize {
                let (chunk, consumed) = block::decode_block(toc_compression, &raw[pos..])
                    .ok_or_else(|| FarcError::Format("malformed TOC block".into()))?;
                out.extend_from_slice(&chunk);
                pos += consumed;
            }
            if out.len() != footer.toc_original as usize {
                return Err(FarcError::Format("TOC size mismatch after decompression".into()));
            }
            out
        };

        if hash_bytes(&decompressed) != footer.toc_hash {
            return Err(FarcError::Integrity);
        }

        let toc = Toc::parse(decompressed)?;

        Ok(ArchiveReader {
            stream,
            toc,
            footer,
            data_base,
            cache: Vec::with_capacity(MAX_BLOCK_SIZE + BlockHeader::SIZE),
        })
    }

    pub fn info(&self) -> ArchiveInfo {
        ArchiveInfo {
            header: *self.toc.header(),
            footer: self.footer,
        }
    }

    pub(crate) fn data_base(&self) -> u64 {
        self.data_base
    }

    /// Resolves `path` — either a `/`-separated path or an `@<hex>`
    /// content-hash reference — and opens it for reading.
    pub fn open_file(&mut self, path: &str) -> Result<FileReader<'_, R>> {
        let idx = self.resolve_index(path)?;
        let entry = self.toc.entry_at_index(idx);
        let hash = self.toc.hash_at_index(idx);
        FileReader::new(self, entry, hash)
    }

    /// Opens a file directly by its content hash, bypassing path lookup.
    pub fn open_by_hash(&mut self, hash: &Hash) -> Result<FileReader<'_, R>> {
        let idx = self
            .toc
            .find_by_hash(hash)
            .ok_or_else(|| FarcError::NotFound(hex::encode(hash)))?;
        let entry = self.toc.entry_at_index(idx);
        FileReader::new(self, entry, *hash)
    }

    pub fn open_dir(&self, path: &str) -> Result<DirIter<'_>> {
        let normalized = path::normalize(path);
        let (mut dirs, last) = path::split_segments(&normalized);
        if !last.is_empty() {
            dirs.push(last);
        }
        let container = self
            .toc
            .find_container(&dirs)
            .ok_or_else(|| FarcError::NotFound(path.to_string()))?;
        Ok(DirIter::new(&self.toc, container))
    }

    fn resolve_index(&self, path: &str) -> Result<u32> {
        if let Some(hash) = crate::path::parse_hash_prefixed(path) {
            return self
                .toc
                .find_by_hash(&hash)
                .ok_or_else(|| FarcError::NotFound(path.to_string()));
        }
        let normalized = path::normalize(path);
        let (dirs, name) = path::split_segments(&normalized);
        let container = self
            .toc
            .find_container(&dirs)
            .ok_or_else(|| FarcError::NotFound(path.to_string()))?;
        self.toc
            .find_entry(container, name)
            .ok_or_else(|| FarcError::NotFound(path.to_string()))
    }
}

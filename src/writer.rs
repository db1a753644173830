//! Write-mode archive handle. Mirrors the source's `fa_create_archive` /
//! `fa_close_archive` cluster and the construction half of `fa_open_file`.

use std::io::{Seek, Write};

use crate::error::{FarcError, Result};
use crate::file_writer::FileWriter;
use crate::format::{Compression, MAX_BLOCK_SIZE};
use crate::hash::hash_bytes;
use crate::info::ArchiveInfo;
use crate::toc_builder::{build_toc, WriterEntry};
use crate::block;

/// An archive under construction. Files are appended one at a time through
/// [`ArchiveWriter::create_file`]; the table of contents is assembled and
/// written only once, by [`ArchiveWriter::close`].
pub struct ArchiveWriter<W: Write + Seek> {
    pub(crate) stream: W,
    alignment: u32,
    pub(crate) offset_original: u64,
    pub(crate) offset_compressed: u64,
    pub(crate) entries: Vec<WriterEntry>,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Starts a new archive over an empty stream. `alignment`, if nonzero,
    /// rounds every file's starting data offset up to the next multiple —
    /// passing `0` or `1` disables alignment padding entirely.
    pub fn create(stream: W, alignment: u32) -> Self {
        ArchiveWriter {
            stream,
            alignment,
            offset_original: 0,
            offset_compressed: 0,
            entries: Vec::new(),
        }
    }

    /// Opens `path` for writing with the given compression. Writing the
    /// same path twice is permitted — see [`crate::toc_builder`] for how
    /// duplicates are resolved at lookup time. The returned [`FileWriter`]
    /// borrows this archive exclusively until it is closed.
    pub fn create_file(&mut self, path: &str, compression: Compression) -> Result<FileWriter<'_, W>> {
        FileWriter::new(self, path.to_string(), compression)
    }

    /// Pads the data region up to the next alignment boundary and returns
    /// the (now aligned) offset the next file's data will start at.
    pub(crate) fn align_for_next_file(&mut self) -> Result<u32> {
        if self.offset_compressed > u32::MAX as u64 {
            return Err(FarcError::Exhausted("data region exceeds 4 GiB".into()));
        }
        if self.alignment > 1 {
            let remainder = self.offset_compressed % self.alignment as u64;
            if remainder != 0 {
                let pad = self.alignment as u64 - remainder;
                self.stream.write_all(&vec![0u8; pad as usize])?;
                self.offset_compressed += pad;
            }
        }
        Ok(self.offset_compressed as u32)
    }

    /// Builds and writes the table of contents and footer, finalizing the
    /// archive, and hands the underlying stream back to the caller.
    /// `toc_compression` controls how the TOC block itself is stored; it is
    /// independent of any individual file's compression.
    pub fn close(mut self, toc_compression: Compression) -> Result<(W, ArchiveInfo)> {
        let (raw_toc, header) = build_toc(&self.entries);
        let toc_hash = hash_bytes(&raw_toc);

        let compressed_toc = if toc_compression == Compression::None {
            raw_toc.clone()
        } else {
            let mut out = Vec::new();
            for chunk in raw_toc.chunks(MAX_BLOCK_SIZE) {
                out.extend_from_slice(&block::encode_block(toc_compression, chunk));
            }
            out
        };

        self.stream.write_all(&compressed_toc)?;

        let footer = crate::format::Footer {
            toc_compression: toc_compression.to_tag(),
            toc_original: raw_toc.len() as u32,
            toc_compressed: compressed_toc.len() as u32,
            toc_hash,
            data_original: self.offset_original as u32,
            data_compressed: self.offset_compressed as u32,
        };
        let mut footer_buf = [0u8; crate::format::Footer::SIZE];
        footer.write(&mut footer_buf);
        self.stream.write_all(&footer_buf)?;
        self.stream.flush()?;

        Ok((self.stream, ArchiveInfo { header, footer }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::reader::ArchiveReader;

    #[test]
    fn write_then_read_roundtrips_uncompressed_file() {
        let mut writer = ArchiveWriter::create(Cursor::new(Vec::new()), 0);
        let mut file = writer.create_file("hello.txt", Compression::None).unwrap();
        file.write(b"hello world").unwrap();
        file.close().unwrap();
        let (stream, info) = writer.close(Compression::None).unwrap();
        assert_eq!(info.footer.data_original, 11);

        let mut reader = ArchiveReader::open(stream).unwrap();
        let mut handle = reader.open_file("hello.txt").unwrap();
        let mut out = [0u8; 11];
        handle.read(&mut out).unwrap();
        assert_eq!(&out, b"hello world");
    }

    #[test]
    fn nested_compressed_file_roundtrips() {
        let mut writer = ArchiveWriter::create(Cursor::new(Vec::new()), 0);
        let payload = vec![b'x'; 40_000];
        let mut file = writer.create_file("a/b/big.bin", Compression::FastLz).unwrap();
        file.write(&payload).unwrap();
        file.close().unwrap();
        let (stream, _) = writer.close(Compression::None).unwrap();

        let mut reader = ArchiveReader::open(stream).unwrap();
        let mut handle = reader.open_file("a/b/big.bin").unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = handle.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, payload);
    }

    #[test]
    fn alignment_pads_each_files_data_offset() {
        let mut writer = ArchiveWriter::create(Cursor::new(Vec::new()), 4096);
        let mut f1 = writer.create_file("a.bin", Compression::None).unwrap();
        f1.write(b"short").unwrap();
        f1.close().unwrap();
        let mut f2 = writer.create_file("b.bin", Compression::None).unwrap();
        f2.write(b"also short").unwrap();
        f2.close().unwrap();
        let (stream, _) = writer.close(Compression::None).unwrap();

        let mut reader = ArchiveReader::open(stream).unwrap();
        let mut h2 = reader.open_file("b.bin").unwrap();
        let mut out = [0u8; 10];
        h2.read(&mut out).unwrap();
        assert_eq!(&out, b"also short");
    }
}

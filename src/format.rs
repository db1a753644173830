//! On-disk layout constants and the raw structures that make up an archive's
//! table of contents, header and footer.
//!
//! Every structure here is a plain fixed-size record with little-endian
//! fields; nothing is derived through `serde` because the TOC is not a
//! self-describing document, it is a byte-for-byte binary layout that other
//! readers of this format (including the historical C implementation this
//! crate is wire-compatible with) must be able to parse without any Rust
//! knowledge at all.

use byteorder::{ByteOrder, LittleEndian};

/// Sentinel used throughout the TOC for "no offset" / "none".
pub const NULL_OFFSET: u32 = 0xFFFF_FFFF;

/// Header cookie: ASCII `FARH` read as a big-endian u32.
pub const HEADER_COOKIE: u32 = 0x4641_5248;
/// Footer cookie: ASCII `FARF` read as a big-endian u32.
pub const FOOTER_COOKIE: u32 = 0x4641_5246;

pub const FORMAT_VERSION: u32 = 1;

/// Maximum number of logical bytes a single compressed block may cover.
pub const MAX_BLOCK_SIZE: usize = 16_384;
/// Size of the archive's scratch cache: four maximum-size blocks.
pub const ARCHIVE_CACHE_SIZE: usize = MAX_BLOCK_SIZE * 4;

/// High bit of a block header's `compressed` field: payload is stored raw.
pub const BLOCK_LITERAL_BIT: u16 = 0x8000;
/// Mask to recover the literal payload length from `compressed`.
pub const BLOCK_LITERAL_MASK: u16 = 0x7FFF;

/// Compression tag stored in the footer and in per-entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    FastLz,
    Deflate,
}

impl Compression {
    pub const NONE_TAG: u32 = 0;
    /// ASCII "FLZ0" read as a big-endian u32.
    pub const FASTLZ_TAG: u32 = 0x464C_5A30;
    /// ASCII "ZLDF" read as a big-endian u32.
    pub const DEFLATE_TAG: u32 = 0x5A4C_4446;

    pub fn to_tag(self) -> u32 {
        match self {
            Compression::None => Self::NONE_TAG,
            Compression::FastLz => Self::FASTLZ_TAG,
            Compression::Deflate => Self::DEFLATE_TAG,
        }
    }

    pub fn from_tag(tag: u32) -> Option<Compression> {
        match tag {
            Self::NONE_TAG => Some(Compression::None),
            Self::FASTLZ_TAG => Some(Compression::FastLz),
            Self::DEFLATE_TAG => Some(Compression::Deflate),
            _ => None,
        }
    }
}

/// A 4-byte header that precedes every block in a compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockHeader {
    pub original: u16,
    pub compressed: u16,
}

impl BlockHeader {
    pub const SIZE: usize = 4;

    pub fn is_literal(&self) -> bool {
        self.compressed & BLOCK_LITERAL_BIT != 0
    }

    pub fn payload_len(&self) -> usize {
        if self.is_literal() {
            (self.compressed & BLOCK_LITERAL_MASK) as usize
        } else {
            self.compressed as usize
        }
    }

    pub fn literal(original: u16) -> Self {
        BlockHeader {
            original,
            compressed: BLOCK_LITERAL_BIT | original,
        }
    }

    pub fn compressed(original: u16, compressed_len: u16) -> Self {
        BlockHeader {
            original,
            compressed: compressed_len,
        }
    }

    pub fn write(&self, out: &mut [u8; Self::SIZE]) {
        LittleEndian::write_u16(&mut out[0..2], self.original);
        LittleEndian::write_u16(&mut out[2..4], self.compressed);
    }

    pub fn read(buf: &[u8; Self::SIZE]) -> Self {
        BlockHeader {
            original: LittleEndian::read_u16(&buf[0..2]),
            compressed: LittleEndian::read_u16(&buf[2..4]),
        }
    }
}

/// SHA-1 content hash: 20 raw bytes.
pub type Hash = [u8; 20];

/// A directory-tree node. Offsets are relative to the start of the TOC,
/// except where noted as [`NULL_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Container {
    pub parent: u32,
    pub children: u32,
    pub next_sibling: u32,
    pub name_offset: u32,
    pub entries_offset: u32,
    pub entries_count: u32,
}

impl Container {
    pub const SIZE: usize = 24;

    pub fn write(&self, out: &mut [u8]) {
        LittleEndian::write_u32(&mut out[0..4], self.parent);
        LittleEndian::write_u32(&mut out[4..8], self.children);
        LittleEndian::write_u32(&mut out[8..12], self.next_sibling);
        LittleEndian::write_u32(&mut out[12..16], self.name_offset);
        LittleEndian::write_u32(&mut out[16..20], self.entries_offset);
        LittleEndian::write_u32(&mut out[20..24], self.entries_count);
    }

    pub fn read(buf: &[u8]) -> Self {
        Container {
            parent: LittleEndian::read_u32(&buf[0..4]),
            children: LittleEndian::read_u32(&buf[4..8]),
            next_sibling: LittleEndian::read_u32(&buf[8..12]),
            name_offset: LittleEndian::read_u32(&buf[12..16]),
            entries_offset: LittleEndian::read_u32(&buf[16..20]),
            entries_count: LittleEndian::read_u32(&buf[20..24]),
        }
    }
}

/// A file record. `data_offset` is relative to the start of the data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Entry {
    pub data_offset: u32,
    pub name_offset: u32,
    pub compression: u32,
    pub block_size: u32,
    pub size_original: u32,
    pub size_compressed: u32,
}

impl Entry {
    pub const SIZE: usize = 24;

    pub fn write(&self, out: &mut [u8]) {
        LittleEndian::write_u32(&mut out[0..4], self.data_offset);
        LittleEndian::write_u32(&mut out[4..8], self.name_offset);
        LittleEndian::write_u32(&mut out[8..12], self.compression);
        LittleEndian::write_u32(&mut out[12..16], self.block_size);
        LittleEndian::write_u32(&mut out[16..20], self.size_original);
        LittleEndian::write_u32(&mut out[20..24], self.size_compressed);
    }

    pub fn read(buf: &[u8]) -> Self {
        Entry {
            data_offset: LittleEndian::read_u32(&buf[0..4]),
            name_offset: LittleEndian::read_u32(&buf[4..8]),
            compression: LittleEndian::read_u32(&buf[8..12]),
            block_size: LittleEndian::read_u32(&buf[12..16]),
            size_original: LittleEndian::read_u32(&buf[16..20]),
            size_compressed: LittleEndian::read_u32(&buf[20..24]),
        }
    }
}

/// First bytes of the TOC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub size: u32,
    pub flags: u32,
    pub containers_offset: u32,
    pub containers_count: u32,
    pub entries_offset: u32,
    pub entries_count: u32,
    pub hashes_offset: u32,
}

impl Header {
    pub const SIZE: usize = 32;

    pub fn write(&self, out: &mut [u8]) {
        LittleEndian::write_u32(&mut out[0..4], HEADER_COOKIE);
        LittleEndian::write_u32(&mut out[4..8], FORMAT_VERSION);
        LittleEndian::write_u32(&mut out[8..12], self.size);
        LittleEndian::write_u32(&mut out[12..16], self.flags);
        LittleEndian::write_u32(&mut out[16..20], self.containers_offset);
        LittleEndian::write_u32(&mut out[20..24], self.containers_count);
        LittleEndian::write_u32(&mut out[24..28], self.entries_offset);
        LittleEndian::write_u32(&mut out[28..32], self.entries_count);
    }

    /// Reads the fixed portion; `hashes_offset` is appended separately since
    /// it lives just past this struct's nominal 32 bytes in the original
    /// layout's padding-free encoding used here (kept at offset 32..36).
    pub fn read(buf: &[u8]) -> Option<(u32, u32, Self)> {
        let cookie = LittleEndian::read_u32(&buf[0..4]);
        let version = LittleEndian::read_u32(&buf[4..8]);
        let header = Header {
            size: LittleEndian::read_u32(&buf[8..12]),
            flags: LittleEndian::read_u32(&buf[12..16]),
            containers_offset: LittleEndian::read_u32(&buf[16..20]),
            containers_count: LittleEndian::read_u32(&buf[20..24]),
            entries_offset: LittleEndian::read_u32(&buf[24..28]),
            entries_count: LittleEndian::read_u32(&buf[28..32]),
            hashes_offset: LittleEndian::read_u32(&buf[32..36]),
        };
        Some((cookie, version, header))
    }
}

/// Total on-disk size of the header record including the trailing
/// `hashes_offset` field that [`Header::read`] pulls in separately.
pub const HEADER_ON_DISK_SIZE: usize = Header::SIZE + 4;

/// Last 56 bytes of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    pub toc_compression: u32,
    pub toc_original: u32,
    pub toc_compressed: u32,
    pub toc_hash: Hash,
    pub data_original: u32,
    pub data_compressed: u32,
}

impl Footer {
    pub const SIZE: usize = 56;

    pub fn write(&self, out: &mut [u8; Self::SIZE]) {
        LittleEndian::write_u32(&mut out[0..4], FOOTER_COOKIE);
        LittleEndian::write_u32(&mut out[4..8], self.toc_compression);
        LittleEndian::write_u32(&mut out[8..12], self.toc_original);
        LittleEndian::write_u32(&mut out[12..16], self.toc_compressed);
        out[16..36].copy_from_slice(&self.toc_hash);
        LittleEndian::write_u32(&mut out[36..40], self.data_original);
        LittleEndian::write_u32(&mut out[40..44], self.data_compressed);
        out[44..56].fill(0);
    }

    pub fn read(buf: &[u8; Self::SIZE]) -> Option<Self> {
        let cookie = LittleEndian::read_u32(&buf[0..4]);
        if cookie != FOOTER_COOKIE {
            return None;
        }
        let mut toc_hash = [0u8; 20];
        toc_hash.copy_from_slice(&buf[16..36]);
        Some(Footer {
            toc_compression: LittleEndian::read_u32(&buf[4..8]),
            toc_original: LittleEndian::read_u32(&buf[8..12]),
            toc_compressed: LittleEndian::read_u32(&buf[12..16]),
            toc_hash,
            data_original: LittleEndian::read_u32(&buf[36..40]),
            data_compressed: LittleEndian::read_u32(&buf[40..44]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_header_literal_roundtrip() {
        let h = BlockHeader::literal(1234);
        let mut buf = [0u8; BlockHeader::SIZE];
        h.write(&mut buf);
        let back = BlockHeader::read(&buf);
        assert_eq!(h, back);
        assert!(back.is_literal());
        assert_eq!(back.payload_len(), 1234);
    }

    #[test]
    fn block_header_compressed_roundtrip() {
        let h = BlockHeader::compressed(16384, 900);
        let mut buf = [0u8; BlockHeader::SIZE];
        h.write(&mut buf);
        let back = BlockHeader::read(&buf);
        assert!(!back.is_literal());
        assert_eq!(back.payload_len(), 900);
        assert_eq!(back.original, 16384);
    }

    #[test]
    fn footer_roundtrip() {
        let footer = Footer {
            toc_compression: Compression::None.to_tag(),
            toc_original: 100,
            toc_compressed: 100,
            toc_hash: [7u8; 20],
            data_original: 55,
            data_compressed: 55,
        };
        let mut buf = [0u8; Footer::SIZE];
        footer.write(&mut buf);
        let back = Footer::read(&buf).expect("cookie must parse");
        assert_eq!(footer, back);
    }

    #[test]
    fn compression_tag_roundtrip() {
        assert_eq!(Compression::from_tag(Compression::FastLz.to_tag()), Some(Compression::FastLz));
        assert_eq!(Compression::from_tag(0xDEAD_BEEF), None);
    }
}

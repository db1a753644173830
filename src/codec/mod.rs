//! Codec registry for the three compression tags this format recognizes.
//!
//! # Identity rules
//! Every codec is identified by a 32-bit tag (the same value stored in the
//! footer's `toc.compression` field and in each entry's `compression`
//! field). Unlike a UUID scheme, there is no in-process short ID — the tag
//! space is small enough that the tag itself is the dispatch key.
//!
//! `FASTLZ` here is satisfied by `lz4_flex` rather than the historical
//! FastLZ C library: the wire contract this format makes is the tag value
//! (`0x464C5A30`), not bit-for-bit compatibility with a specific codec
//! implementation, and `lz4_flex` is the closest already-available
//! fast/low-ratio block codec. See DESIGN.md for the full rationale.

use std::io::{self, Read, Write};
use thiserror::Error;

use crate::format::Compression;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("compression error: {0}")]
    Compression(String),
    #[error("decompression error: {0}")]
    Decompression(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A pure compressor/decompressor for one block's worth of bytes.
///
/// Implementations never see block framing (the 4-byte header with the
/// literal bit) — that is a layer above, in [`crate::block`].
pub trait Codec {
    fn compression(&self) -> Compression;
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError>;
}

pub struct NoneCodec;
impl Codec for NoneCodec {
    fn compression(&self) -> Compression {
        Compression::None
    }
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }
    fn decompress(&self, data: &[u8], _expected_len: usize) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }
}

pub struct FastLzCodec;
impl Codec for FastLzCodec {
    fn compression(&self) -> Compression {
        Compression::FastLz
    }
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(lz4_flex::block::compress(data))
    }
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
        lz4_flex::block::decompress(data, expected_len)
            .map_err(|e| CodecError::Decompression(e.to_string()))
    }
}

pub struct DeflateCodec;
impl Codec for DeflateCodec {
    fn compression(&self) -> Compression {
        Compression::Deflate
    }
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        use flate2::write::DeflateEncoder;
        use flate2::Compression as Level;
        let mut encoder = DeflateEncoder::new(Vec::new(), Level::default());
        encoder.write_all(data)?;
        encoder.finish().map_err(CodecError::Io)
    }
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
        use flate2::read::DeflateDecoder;
        let mut decoder = DeflateDecoder::new(data);
        let mut out = Vec::with_capacity(expected_len);
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Resolve a compression tag to its codec implementation.
pub fn get_codec(compression: Compression) -> Box<dyn Codec> {
    match compression {
        Compression::None => Box::new(NoneCodec),
        Compression::FastLz => Box::new(FastLzCodec),
        Compression::Deflate => Box::new(DeflateCodec),
    }
}

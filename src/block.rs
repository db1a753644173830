//! Block-codec glue: the two pure operations the rest of the archive core
//! invokes to compress or decompress one block's worth of bytes, plus the
//! framing layer (4-byte header, literal fallback) that sits above them.

use crate::codec::get_codec;
use crate::format::{BlockHeader, Compression, MAX_BLOCK_SIZE};

/// Minimum input size FastLz-tagged blocks will attempt to compress. Below
/// this the codec declines and the caller stores the block literally.
const FASTLZ_MIN_INPUT: usize = 16;

/// Compress one block's worth of input. Returns the compressed bytes.
///
/// Returns `None` when the codec declines — the caller is expected to store
/// `input` literally in that case. `NONE` never declines: a `NONE`-tagged
/// caller already knows it wants the raw path, so it should not call this at
/// all, but `compress_block` still handles it in case it is.
pub fn compress_block(compression: Compression, input: &[u8]) -> Option<Vec<u8>> {
    match compression {
        Compression::None => None,
        Compression::FastLz if input.len() < FASTLZ_MIN_INPUT => {
            log::trace!("block codec declines {} input bytes (below FastLz floor)", input.len());
            None
        }
        _ => Some(get_codec(compression).compress(input).unwrap_or_else(|e| {
            log::warn!("block compression failed, falling back to literal: {e}");
            Vec::new()
        })),
    }
    .filter(|out| !out.is_empty())
}

/// Decompress one block's worth of input into exactly `expected_len` bytes.
/// Returns `None` on failure.
pub fn decompress_block(compression: Compression, input: &[u8], expected_len: usize) -> Option<Vec<u8>> {
    get_codec(compression).decompress(input, expected_len).ok()
}

/// Encodes `input` (at most [`MAX_BLOCK_SIZE`] bytes) as one framed block:
/// a [`BlockHeader`] followed by its payload. Chooses the literal path
/// whenever compression doesn't shrink the block, matching the source's
/// "codec declined" and "output `>=` input" policies identically.
pub fn encode_block(compression: Compression, input: &[u8]) -> Vec<u8> {
    debug_assert!(input.len() <= MAX_BLOCK_SIZE);
    let original = input.len() as u16;

    let payload = match compression {
        Compression::None => None,
        _ => compress_block(compression, input).filter(|c| c.len() < input.len()),
    };

    let mut out = Vec::with_capacity(BlockHeader::SIZE + input.len());
    match payload {
        Some(compressed) => {
            let header = BlockHeader::compressed(original, compressed.len() as u16);
            let mut hdr_buf = [0u8; BlockHeader::SIZE];
            header.write(&mut hdr_buf);
            out.extend_from_slice(&hdr_buf);
            out.extend_from_slice(&compressed);
        }
        None => {
            let header = BlockHeader::literal(original);
            let mut hdr_buf = [0u8; BlockHeader::SIZE];
            header.write(&mut hdr_buf);
            out.extend_from_slice(&hdr_buf);
            out.extend_from_slice(input);
        }
    }
    out
}

/// Decodes one framed block from the front of `input`. Returns the decoded
/// bytes and the number of input bytes consumed (header + payload), or
/// `None` on a truncated header/payload.
pub fn decode_block(compression: Compression, input: &[u8]) -> Option<(Vec<u8>, usize)> {
    if input.len() < BlockHeader::SIZE {
        return None;
    }
    let mut hdr_buf = [0u8; BlockHeader::SIZE];
    hdr_buf.copy_from_slice(&input[..BlockHeader::SIZE]);
    let header = BlockHeader::read(&hdr_buf);

    if header.original as usize > MAX_BLOCK_SIZE {
        return None;
    }

    let payload_len = header.payload_len();
    let consumed = BlockHeader::SIZE + payload_len;
    if input.len() < consumed {
        return None;
    }
    let payload = &input[BlockHeader::SIZE..consumed];

    let decoded = if header.is_literal() {
        payload.to_vec()
    } else {
        decompress_block(compression, payload, header.original as usize)?
    };

    if decoded.len() != header.original as usize {
        return None;
    }

    Some((decoded, consumed))
}

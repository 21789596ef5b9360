//! Single-call compress/decompress entry points over fully materialized
//! byte ranges.
//!
//! Region-based and slice-based call styles share one engine path, so a
//! payload compressed through either produces bit-identical frames at a
//! fixed level.

use crate::codec::zstd::{ZstdCompressor, ZstdDecompressor};
use crate::codec::{BlockCompressor, BlockDecompressor};
use crate::error::{Error, Result};
use crate::region::{ReadRegion, WriteRegion};

/// Worst-case compressed size for `uncompressed_len` input bytes.
pub fn max_compressed_len(uncompressed_len: usize) -> usize {
    zstd::zstd_safe::compress_bound(uncompressed_len)
}

/// Payload size recorded in the frame header, or `None` when the frame does
/// not carry one (callers must then supply their own bound).
pub fn decompressed_size(frame: &[u8]) -> Result<Option<u64>> {
    ZstdDecompressor::new()?.decompressed_size(frame)
}

/// Compresses the unread range of `src` into the spare range of `dst` as one
/// frame, advancing both cursors. Returns the number of compressed bytes
/// written.
///
/// Fails with [`Error::DestinationTooSmall`] when the frame does not fit;
/// neither cursor moves on failure and nothing is written past `dst`'s limit.
pub fn compress(dst: &mut WriteRegion, src: &mut ReadRegion, level: i32) -> Result<usize> {
    let mut codec = ZstdCompressor::new(level)?;
    compress_with(&mut codec, dst, src)
}

/// [`compress`] against a caller-chosen codec.
pub fn compress_with<C: BlockCompressor>(
    codec: &mut C,
    dst: &mut WriteRegion,
    src: &mut ReadRegion,
) -> Result<usize> {
    let n = codec.compress(dst.spare(), src.unread())?;
    src.advance(src.remaining());
    dst.advance(n);
    Ok(n)
}

/// Decompresses one complete frame from the unread range of `src` into the
/// spare range of `dst`, advancing both cursors. Returns the number of bytes
/// produced.
///
/// Fails with [`Error::DestinationTooSmall`] when the frame's true payload
/// size exceeds the destination's remaining capacity.
pub fn decompress(dst: &mut WriteRegion, src: &mut ReadRegion) -> Result<usize> {
    let mut codec = ZstdDecompressor::new()?;
    decompress_with(&mut codec, dst, src)
}

/// [`decompress`] against a caller-chosen codec.
pub fn decompress_with<D: BlockDecompressor>(
    codec: &mut D,
    dst: &mut WriteRegion,
    src: &mut ReadRegion,
) -> Result<usize> {
    if let Some(size) = codec.decompressed_size(src.unread())? {
        if size > dst.remaining() as u64 {
            return Err(Error::too_small(size as usize, dst.remaining()));
        }
    }
    let n = codec.decompress(dst.spare(), src.unread())?;
    src.advance(src.remaining());
    dst.advance(n);
    Ok(n)
}

/// Compresses `src` into a freshly allocated, exactly sized vector.
pub fn compress_to_vec(src: &[u8], level: i32) -> Result<Vec<u8>> {
    let mut codec = ZstdCompressor::new(level)?;
    let mut dst = vec![0u8; codec.compress_bound(src.len())];
    let n = codec.compress(&mut dst, src)?;
    dst.truncate(n);
    Ok(dst)
}

/// Decompresses one frame into a freshly allocated vector.
///
/// `capacity` is the caller's bound on the decompressed size; frames that
/// carry their own size (see [`decompressed_size`]) let callers size this
/// exactly, others require a caller-supplied upper bound.
pub fn decompress_to_vec(src: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut codec = ZstdDecompressor::new()?;
    let mut dst = vec![0u8; capacity];
    let n = codec.decompress(&mut dst, src)?;
    dst.truncate(n);
    Ok(dst)
}

//! Passthrough codec with a minimal self-delimiting frame format.
//!
//! A stored frame is a sequence of blocks, each a little-endian `u32` length
//! followed by that many raw bytes, terminated by a zero-length block. No
//! compression happens; the codec exists to exercise the adapter choreography
//! (and any engine-agnostic caller) without a real engine behind it.

use byteorder::{ByteOrder, LittleEndian};

use crate::codec::{
    BlockCompressor, BlockDecompressor, CompressContext, DecompressContext, Pump,
};
use crate::error::{Error, Result};
use crate::region::{ReadRegion, WriteRegion};

const BLOCK_HEADER_LEN: usize = 4;
const STAGING_SIZE: usize = 16 * 1024;

/// One-shot stored compressor: emits a single block plus the terminator.
pub struct StoredCompressor;

impl BlockCompressor for StoredCompressor {
    fn compress_bound(&self, uncompressed_len: usize) -> usize {
        uncompressed_len + 2 * BLOCK_HEADER_LEN
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let needed = self.compress_bound(src.len());
        if dst.len() < needed {
            return Err(Error::too_small(needed, dst.len()));
        }
        LittleEndian::write_u32(&mut dst[..BLOCK_HEADER_LEN], src.len() as u32);
        dst[BLOCK_HEADER_LEN..BLOCK_HEADER_LEN + src.len()].copy_from_slice(src);
        let trailer = BLOCK_HEADER_LEN + src.len();
        LittleEndian::write_u32(&mut dst[trailer..trailer + BLOCK_HEADER_LEN], 0);
        Ok(needed)
    }
}

/// One-shot stored decompressor.
pub struct StoredDecompressor;

impl BlockDecompressor for StoredDecompressor {
    fn decompressed_size(&self, frame: &[u8]) -> Result<Option<u64>> {
        let mut total = 0u64;
        let mut at = 0usize;
        loop {
            if frame.len() < at + BLOCK_HEADER_LEN {
                return Err(Error::malformed("stored frame truncated in block header"));
            }
            let len = LittleEndian::read_u32(&frame[at..at + BLOCK_HEADER_LEN]) as usize;
            at += BLOCK_HEADER_LEN;
            if len == 0 {
                return Ok(Some(total));
            }
            if frame.len() < at + len {
                return Err(Error::malformed("stored frame truncated in block payload"));
            }
            total += len as u64;
            at += len;
        }
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let total = self
            .decompressed_size(src)?
            .unwrap_or_default() as usize;
        if dst.len() < total {
            return Err(Error::too_small(total, dst.len()));
        }
        let mut at = 0usize;
        let mut out = 0usize;
        loop {
            let len = LittleEndian::read_u32(&src[at..at + BLOCK_HEADER_LEN]) as usize;
            at += BLOCK_HEADER_LEN;
            if len == 0 {
                return Ok(out);
            }
            dst[out..out + len].copy_from_slice(&src[at..at + len]);
            at += len;
            out += len;
        }
    }
}

/// Incremental stored compressor: one block per `feed` call.
pub struct StoredCompressContext {
    finished: bool,
}

impl StoredCompressContext {
    pub fn new() -> Self {
        Self { finished: false }
    }
}

impl Default for StoredCompressContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressContext for StoredCompressContext {
    fn recommended_input_size(&self) -> usize {
        STAGING_SIZE
    }

    fn recommended_output_size(&self) -> usize {
        STAGING_SIZE + 2 * BLOCK_HEADER_LEN
    }

    fn feed(&mut self, dst: &mut WriteRegion, src: &mut ReadRegion) -> Result<()> {
        debug_assert!(!self.finished, "feed after finish");
        if dst.remaining() <= BLOCK_HEADER_LEN || !src.has_remaining() {
            return Ok(());
        }
        let take = src.remaining().min(dst.remaining() - BLOCK_HEADER_LEN);
        {
            let spare = dst.spare();
            LittleEndian::write_u32(&mut spare[..BLOCK_HEADER_LEN], take as u32);
            spare[BLOCK_HEADER_LEN..BLOCK_HEADER_LEN + take]
                .copy_from_slice(&src.unread()[..take]);
        }
        dst.advance(BLOCK_HEADER_LEN + take);
        src.advance(take);
        Ok(())
    }

    fn flush(&mut self, _dst: &mut WriteRegion) -> Result<bool> {
        // Nothing is ever buffered: feed emits blocks immediately.
        Ok(true)
    }

    fn finish(&mut self, dst: &mut WriteRegion) -> Result<bool> {
        if self.finished {
            return Ok(true);
        }
        if dst.remaining() < BLOCK_HEADER_LEN {
            return Ok(false);
        }
        LittleEndian::write_u32(&mut dst.spare()[..BLOCK_HEADER_LEN], 0);
        dst.advance(BLOCK_HEADER_LEN);
        self.finished = true;
        Ok(true)
    }
}

enum DecodeState {
    Header { buf: [u8; BLOCK_HEADER_LEN], filled: usize },
    Payload { left: usize },
}

/// Incremental stored decompressor, tolerant of 1-byte inputs and outputs.
pub struct StoredDecompressContext {
    state: DecodeState,
}

impl StoredDecompressContext {
    pub fn new() -> Self {
        Self {
            state: DecodeState::Header {
                buf: [0; BLOCK_HEADER_LEN],
                filled: 0,
            },
        }
    }
}

impl Default for StoredDecompressContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DecompressContext for StoredDecompressContext {
    fn recommended_input_size(&self) -> usize {
        STAGING_SIZE
    }

    fn recommended_output_size(&self) -> usize {
        STAGING_SIZE
    }

    fn pump(&mut self, dst: &mut WriteRegion, src: &mut ReadRegion) -> Result<Pump> {
        loop {
            match &mut self.state {
                DecodeState::Header { buf, filled } => {
                    let take = src.remaining().min(BLOCK_HEADER_LEN - *filled);
                    buf[*filled..*filled + take].copy_from_slice(&src.unread()[..take]);
                    *filled += take;
                    src.advance(take);
                    if *filled < BLOCK_HEADER_LEN {
                        return Ok(Pump::InProgress);
                    }
                    let len = LittleEndian::read_u32(buf) as usize;
                    self.state = DecodeState::Header {
                        buf: [0; BLOCK_HEADER_LEN],
                        filled: 0,
                    };
                    if len == 0 {
                        // Frame terminator; the context is ready for the
                        // next concatenated frame as-is.
                        return Ok(Pump::FrameComplete);
                    }
                    self.state = DecodeState::Payload { left: len };
                }
                DecodeState::Payload { left } => {
                    let take = src.remaining().min(dst.remaining()).min(*left);
                    if take == 0 {
                        return Ok(Pump::InProgress);
                    }
                    dst.spare()[..take].copy_from_slice(&src.unread()[..take]);
                    dst.advance(take);
                    src.advance(take);
                    *left -= take;
                    if *left == 0 {
                        self.state = DecodeState::Header {
                            buf: [0; BLOCK_HEADER_LEN],
                            filled: 0,
                        };
                    }
                }
            }
        }
    }
}

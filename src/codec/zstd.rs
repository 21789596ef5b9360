//! Zstandard implementation of the codec boundary, backed by the `zstd`
//! crate: `zstd::bulk` for the one-shot calls and raw `zstd_safe` contexts
//! for the incremental ones.

use zstd::zstd_safe::{self, CCtx, DCtx, InBuffer, OutBuffer};

use crate::codec::{
    BlockCompressor, BlockDecompressor, CompressContext, DecompressContext, Pump,
};
use crate::error::{Error, Result};
use crate::region::{ReadRegion, WriteRegion};

/// The compression level range accepted by this engine.
pub fn level_range() -> std::ops::RangeInclusive<i32> {
    zstd::compression_level_range()
}

/// One-shot compressor over [`zstd::bulk::Compressor`].
pub struct ZstdCompressor {
    inner: zstd::bulk::Compressor<'static>,
    level: i32,
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Result<Self> {
        let inner = zstd::bulk::Compressor::new(level)?;
        Ok(Self { inner, level })
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl BlockCompressor for ZstdCompressor {
    fn compress_bound(&self, uncompressed_len: usize) -> usize {
        zstd_safe::compress_bound(uncompressed_len)
    }

    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let bound = zstd_safe::compress_bound(src.len());
        match self.inner.compress_to_buffer(src, dst) {
            Ok(n) => Ok(n),
            // The bound is a sufficient capacity, so a failure below it is a
            // capacity failure, not an engine one.
            Err(_) if dst.len() < bound => Err(Error::too_small(bound, dst.len())),
            Err(e) => Err(e.into()),
        }
    }
}

/// One-shot decompressor over [`zstd::bulk::Decompressor`].
pub struct ZstdDecompressor {
    inner: zstd::bulk::Decompressor<'static>,
}

impl ZstdDecompressor {
    pub fn new() -> Result<Self> {
        let inner = zstd::bulk::Decompressor::new()?;
        Ok(Self { inner })
    }
}

impl BlockDecompressor for ZstdDecompressor {
    fn decompressed_size(&self, frame: &[u8]) -> Result<Option<u64>> {
        zstd_safe::get_frame_content_size(frame)
            .map_err(|_| Error::malformed("invalid frame header"))
    }

    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        if let Some(size) = self.decompressed_size(src)? {
            if size > dst.len() as u64 {
                return Err(Error::too_small(size as usize, dst.len()));
            }
            return self
                .inner
                .decompress_to_buffer(src, dst)
                .map_err(|e| Error::MalformedFrame(e.to_string()));
        }
        // The frame does not record its payload size, so a bulk call cannot
        // tell a capacity failure from a format one. Stream it instead: the
        // output filling up with frame bytes left is a capacity failure,
        // everything else is malformed input.
        let capacity = dst.len();
        let mut dctx = ZstdDecompressContext::new();
        let mut out = WriteRegion::new(dst);
        let mut input = ReadRegion::new(src);
        loop {
            let before_out = out.position();
            let before_in = input.position();
            match dctx.pump(&mut out, &mut input)? {
                Pump::FrameComplete => return Ok(out.position()),
                Pump::InProgress => {
                    if !out.has_remaining() {
                        return Err(Error::too_small(None, capacity));
                    }
                    if out.position() == before_out && input.position() == before_in {
                        return Err(Error::malformed("frame ends prematurely"));
                    }
                }
            }
        }
    }
}

/// Incremental compression context over [`zstd_safe::CCtx`].
pub struct ZstdCompressContext {
    cctx: CCtx<'static>,
}

impl ZstdCompressContext {
    pub fn new(level: i32) -> Result<Self> {
        let mut cctx = CCtx::create();
        cctx.set_parameter(zstd_safe::CParameter::CompressionLevel(level))
            .map_err(engine_error)?;
        Ok(Self { cctx })
    }
}

impl CompressContext for ZstdCompressContext {
    fn recommended_input_size(&self) -> usize {
        CCtx::in_size()
    }

    fn recommended_output_size(&self) -> usize {
        CCtx::out_size()
    }

    fn feed(&mut self, dst: &mut WriteRegion, src: &mut ReadRegion) -> Result<()> {
        let (consumed, produced) = {
            let mut input = InBuffer::around(src.unread());
            let mut output = OutBuffer::around(dst.spare());
            self.cctx
                .compress_stream(&mut output, &mut input)
                .map_err(engine_error)?;
            (input.pos, output.pos())
        };
        src.advance(consumed);
        dst.advance(produced);
        Ok(())
    }

    fn flush(&mut self, dst: &mut WriteRegion) -> Result<bool> {
        let (remaining, produced) = {
            let mut output = OutBuffer::around(dst.spare());
            let remaining = self
                .cctx
                .flush_stream(&mut output)
                .map_err(engine_error)?;
            (remaining, output.pos())
        };
        dst.advance(produced);
        Ok(remaining == 0)
    }

    fn finish(&mut self, dst: &mut WriteRegion) -> Result<bool> {
        let (remaining, produced) = {
            let mut output = OutBuffer::around(dst.spare());
            let remaining = self.cctx.end_stream(&mut output).map_err(engine_error)?;
            (remaining, output.pos())
        };
        dst.advance(produced);
        Ok(remaining == 0)
    }
}

/// Incremental decompression context over [`zstd_safe::DCtx`].
///
/// After a frame completes the context accepts the next concatenated frame
/// without an explicit reset.
pub struct ZstdDecompressContext {
    dctx: DCtx<'static>,
}

impl ZstdDecompressContext {
    pub fn new() -> Self {
        Self {
            dctx: DCtx::create(),
        }
    }
}

impl Default for ZstdDecompressContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DecompressContext for ZstdDecompressContext {
    fn recommended_input_size(&self) -> usize {
        DCtx::in_size()
    }

    fn recommended_output_size(&self) -> usize {
        DCtx::out_size()
    }

    fn pump(&mut self, dst: &mut WriteRegion, src: &mut ReadRegion) -> Result<Pump> {
        let (hint, consumed, produced) = {
            let mut input = InBuffer::around(src.unread());
            let mut output = OutBuffer::around(dst.spare());
            let hint = self
                .dctx
                .decompress_stream(&mut output, &mut input)
                .map_err(|code| Error::malformed(zstd_safe::get_error_name(code)))?;
            (hint, input.pos, output.pos())
        };
        src.advance(consumed);
        dst.advance(produced);
        Ok(if hint == 0 {
            Pump::FrameComplete
        } else {
            Pump::InProgress
        })
    }
}

fn engine_error(code: zstd_safe::ErrorCode) -> Error {
    Error::Io(std::io::Error::other(zstd_safe::get_error_name(code)))
}

//! Pull-based streaming adapters over in-memory regions.
//!
//! [`RegionDecompressor`] decompresses directly from a source cursor into a
//! destination cursor without materializing the whole payload, which suits
//! very large or memory-mapped inputs. [`RegionCompressor`] is the
//! compressing counterpart, draining compressed output to a bound sink.

use std::io::Write;

use log::trace;

use crate::codec::zstd::{ZstdCompressContext, ZstdDecompressContext};
use crate::codec::{CompressContext, DecompressContext, Pump};
use crate::error::{Error, Result};
use crate::lifecycle::Guarded;
use crate::region::{ReadRegion, WriteRegion};

/// Streaming decompressor over a compressed in-memory region.
///
/// Frame boundaries inside the region are always crossed transparently: the
/// region is presented as one logical byte source, so consecutive frames
/// decode as one concatenated payload.
pub struct RegionDecompressor<'a, D: DecompressContext = ZstdDecompressContext> {
    src: ReadRegion<'a>,
    ctx: Guarded<D>,
    // A frame is partially decoded: bytes may still be buffered inside the
    // context, or the source may yet owe the rest of the frame.
    in_frame: bool,
}

impl<'a> RegionDecompressor<'a> {
    /// Creates a decompressor over the unread range of `src`.
    pub fn new(src: ReadRegion<'a>) -> Self {
        Self::with_context(src, ZstdDecompressContext::new())
    }

    /// Creates a decompressor over a whole slice.
    pub fn over(buf: &'a [u8]) -> Self {
        Self::new(ReadRegion::new(buf))
    }
}

impl<'a, D: DecompressContext> RegionDecompressor<'a, D> {
    /// Creates a decompressor driving a caller-chosen context.
    pub fn with_context(src: ReadRegion<'a>, ctx: D) -> Self {
        Self {
            src,
            ctx: Guarded::new(ctx),
            in_frame: false,
        }
    }

    /// Position of the source cursor within the backing storage.
    pub fn position(&self) -> usize {
        self.src.position()
    }

    /// True while unconsumed source bytes or buffered-but-unproduced
    /// decompressed bytes remain.
    pub fn has_remaining(&self) -> bool {
        !self.ctx.is_closed() && (self.src.has_remaining() || self.in_frame)
    }

    /// Decompresses into the spare range of `dst`, advancing the source and
    /// destination cursors. Returns the number of bytes produced, `0` once
    /// the region is exhausted.
    ///
    /// A one-byte destination still makes forward progress; already-consumed
    /// source bytes are never re-read.
    pub fn read(&mut self, dst: &mut WriteRegion) -> Result<usize> {
        let ctx = self.ctx.get()?;
        let start = dst.position();
        loop {
            if !dst.has_remaining() {
                break;
            }
            let before_dst = dst.position();
            let before_src = self.src.position();
            let status = ctx.pump(dst, &mut self.src)?;
            self.in_frame = status == Pump::InProgress
                && (self.in_frame
                    || dst.position() > before_dst
                    || self.src.position() > before_src);
            match status {
                Pump::FrameComplete => {
                    if !self.src.has_remaining() {
                        break;
                    }
                    trace!("region source continuing into next frame");
                }
                Pump::InProgress => {
                    if !dst.has_remaining() {
                        break;
                    }
                    if dst.position() == before_dst && self.src.position() == before_src {
                        if !self.src.has_remaining() {
                            if dst.position() > start {
                                break;
                            }
                            return Err(Error::malformed(
                                "compressed region ended inside a frame",
                            ));
                        }
                        return Err(Error::Io(std::io::Error::other(
                            "decompression context made no progress",
                        )));
                    }
                }
            }
        }
        Ok(dst.position() - start)
    }

    /// Releases the context. Idempotent; reads after close fail with
    /// [`Error::StreamClosed`].
    pub fn close(&mut self) {
        if self.ctx.close().is_some() {
            trace!("region decompressor closed");
        }
    }
}

/// Streaming compressor from caller regions into a bound sink.
///
/// Compressed output is handed to the sink as soon as it is ready; the sink
/// object replaces the flush-hook subclassing pattern of buffer-compressing
/// streams.
pub struct RegionCompressor<W: Write, C: CompressContext = ZstdCompressContext> {
    sink: W,
    ctx: Guarded<C>,
    out: Vec<u8>,
}

impl<W: Write> RegionCompressor<W> {
    /// Creates a compressor producing one frame at `level` into `sink`.
    pub fn new(sink: W, level: i32) -> Result<Self> {
        Ok(Self::with_context(sink, ZstdCompressContext::new(level)?))
    }

    /// Creates a compressor with an explicit staging-buffer size for
    /// compressed output.
    pub fn with_capacity(sink: W, level: i32, staging: usize) -> Result<Self> {
        let mut comp = Self::new(sink, level)?;
        comp.out = vec![0u8; staging.max(64)];
        Ok(comp)
    }
}

impl<W: Write, C: CompressContext> RegionCompressor<W, C> {
    /// Creates a compressor driving a caller-chosen context.
    pub fn with_context(sink: W, ctx: C) -> Self {
        let staging = ctx.recommended_output_size().max(64);
        Self {
            sink,
            ctx: Guarded::new(ctx),
            out: vec![0u8; staging],
        }
    }

    /// Compresses the entire unread range of `src`, advancing its cursor and
    /// draining compressed bytes to the sink as they are produced.
    pub fn compress(&mut self, src: &mut ReadRegion) -> Result<()> {
        let ctx = self.ctx.get()?;
        while src.has_remaining() {
            let before = src.position();
            let produced = {
                let mut dst = WriteRegion::new(&mut self.out);
                ctx.feed(&mut dst, src)?;
                dst.position()
            };
            if produced > 0 {
                self.sink.write_all(&self.out[..produced])?;
            }
            if produced == 0 && src.position() == before {
                return Err(Error::Io(std::io::Error::other(
                    "compression context made no progress",
                )));
            }
        }
        Ok(())
    }

    /// Flushes buffered input through the context and the sink without
    /// finishing the frame.
    pub fn flush(&mut self) -> Result<()> {
        let ctx = self.ctx.get()?;
        loop {
            let (done, produced) = {
                let mut dst = WriteRegion::new(&mut self.out);
                let done = ctx.flush(&mut dst)?;
                (done, dst.position())
            };
            if produced > 0 {
                self.sink.write_all(&self.out[..produced])?;
            }
            if done {
                break;
            }
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Finalizes the frame epilogue, flushes the sink, and releases the
    /// context. Idempotent; `compress` after close fails with
    /// [`Error::StreamClosed`].
    pub fn close(&mut self) -> Result<()> {
        let Some(mut ctx) = self.ctx.close() else {
            return Ok(());
        };
        loop {
            let (done, produced) = {
                let mut dst = WriteRegion::new(&mut self.out);
                let done = ctx.finish(&mut dst)?;
                (done, dst.position())
            };
            if produced > 0 {
                self.sink.write_all(&self.out[..produced])?;
            }
            if done {
                break;
            }
            if produced == 0 {
                return Err(Error::Io(std::io::Error::other(
                    "frame epilogue made no progress",
                )));
            }
        }
        self.sink.flush()?;
        trace!("region compressor finalized frame");
        Ok(())
    }

    /// Consumes the adapter and returns the sink.
    ///
    /// Does not finish the frame; call [`close`](Self::close) first for a
    /// complete stream.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

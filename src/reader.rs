//! Blocking-stream decompressor: compressed bytes pulled from an underlying
//! [`std::io::Read`], plaintext out.

use std::io::{self, Read};

use log::trace;

use crate::codec::zstd::ZstdDecompressContext;
use crate::codec::{DecompressContext, Pump};
use crate::error::{Error, Result};
use crate::lifecycle::Guarded;
use crate::region::{ReadRegion, WriteRegion};

/// Streaming decompressor over an underlying byte source.
///
/// Reads return however many decompressed bytes are ready, mirroring
/// blocking partial-read semantics; single-byte reads always make progress.
/// A read returns `0` once the current frame is exhausted. In continuous
/// mode the reader instead advances across concatenated frames and only
/// reports `0` when the source itself is exhausted between frames.
pub struct FrameReader<R: Read, D: DecompressContext = ZstdDecompressContext> {
    source: R,
    ctx: Guarded<D>,
    input: Vec<u8>,
    pos: usize,
    filled: usize,
    continuous: bool,
    // Terminal end-of-frame reached (single-frame mode only).
    frame_done: bool,
    // Some bytes of the current frame have been consumed.
    frame_started: bool,
    source_eof: bool,
}

impl<R: Read> FrameReader<R> {
    /// Creates a single-frame reader with the engine's preferred staging size.
    pub fn new(source: R) -> Self {
        Self::with_context(source, ZstdDecompressContext::new())
    }

    /// Creates a reader with an explicit compressed-input staging size.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        let mut reader = Self::new(source);
        reader.input = vec![0u8; capacity.max(1)];
        reader
    }
}

impl<R: Read, D: DecompressContext> FrameReader<R, D> {
    /// Creates a reader driving a caller-chosen decompression context.
    pub fn with_context(source: R, ctx: D) -> Self {
        let staging = ctx.recommended_input_size().max(1);
        Self {
            source,
            ctx: Guarded::new(ctx),
            input: vec![0u8; staging],
            pos: 0,
            filled: 0,
            continuous: false,
            frame_done: false,
            frame_started: false,
            source_eof: false,
        }
    }

    /// Selects continuous mode: exhausting one frame with more underlying
    /// bytes available transparently opens the next frame. Set at
    /// construction, before the first read.
    pub fn continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Releases the decompression context and staging storage. Idempotent;
    /// reads after close fail with [`Error::StreamClosed`]. The underlying
    /// source is released when the reader is dropped.
    pub fn close(&mut self) {
        if self.ctx.close().is_some() {
            self.input = Vec::new();
            self.pos = 0;
            self.filled = 0;
            trace!("frame reader closed");
        }
    }

    /// Consumes the reader and returns the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn refill(&mut self) -> Result<()> {
        debug_assert_eq!(self.pos, self.filled);
        self.pos = 0;
        self.filled = self.source.read(&mut self.input)?;
        if self.filled == 0 {
            self.source_eof = true;
        }
        Ok(())
    }

    /// Decompresses into the spare range of `dst`, advancing its cursor.
    /// Returns the number of bytes produced, `0` at end of data.
    pub fn read_region(&mut self, dst: &mut WriteRegion) -> Result<usize> {
        if self.ctx.is_closed() {
            return Err(Error::StreamClosed);
        }
        let start = dst.position();
        if !dst.has_remaining() {
            return Ok(0);
        }
        loop {
            if self.frame_done {
                break;
            }
            if self.pos == self.filled && !self.source_eof {
                self.refill()?;
            }
            if self.pos == self.filled && self.source_eof && !self.frame_started {
                // Clean end: no frame is in flight.
                break;
            }

            let before_dst = dst.position();
            let before_pos = self.pos;
            let status = {
                let ctx = self.ctx.get()?;
                // At source end this region is empty; the pump then drains
                // output still buffered inside the context.
                let mut src = ReadRegion::with_bounds(&self.input, self.pos, self.filled);
                let status = ctx.pump(dst, &mut src)?;
                self.pos = src.position();
                status
            };
            if self.pos > before_pos {
                self.frame_started = true;
            }
            match status {
                Pump::FrameComplete => {
                    self.frame_started = false;
                    if !self.continuous {
                        self.frame_done = true;
                        break;
                    }
                    trace!("continuous mode: advancing to next frame");
                }
                Pump::InProgress => {
                    if dst.position() == before_dst && self.pos == before_pos {
                        if self.source_eof && self.pos == self.filled {
                            return Err(Error::malformed("source ended inside a frame"));
                        }
                        // Engine refused both input and output space.
                        return Err(Error::Io(io::Error::other(
                            "decompression context made no progress",
                        )));
                    }
                }
            }
            if !dst.has_remaining() || dst.position() > start {
                break;
            }
        }
        Ok(dst.position() - start)
    }
}

impl<R: Read, D: DecompressContext> Read for FrameReader<R, D> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut dst = WriteRegion::new(buf);
        let n = self.read_region(&mut dst)?;
        Ok(n)
    }
}

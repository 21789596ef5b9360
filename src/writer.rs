//! Blocking-stream compressor: [`std::io::Write`] in, one compressed frame
//! out.

use std::io::{self, Write};

use crate::buffer::RegionCompressor;
use crate::codec::zstd::ZstdCompressContext;
use crate::codec::CompressContext;
use crate::error::Result;
use crate::region::ReadRegion;

/// Streaming compressor writing one frame to an underlying sink.
///
/// Accepts writes of any size, including empty and single-byte chunks;
/// partial engine state persists across calls. [`finish`](Self::finish)
/// closes the frame exactly once; writes after it fail with
/// [`StreamClosed`](crate::Error::StreamClosed). The frame is incomplete
/// until `finish` has been called.
pub struct FrameWriter<W: Write, C: CompressContext = ZstdCompressContext> {
    inner: RegionCompressor<W, C>,
}

impl<W: Write> FrameWriter<W> {
    /// Creates a writer compressing at `level` into `sink`.
    pub fn new(sink: W, level: i32) -> Result<Self> {
        Ok(Self::with_context(sink, ZstdCompressContext::new(level)?))
    }

    /// Creates a writer with an explicit staging-buffer size for compressed
    /// output.
    pub fn with_capacity(sink: W, level: i32, staging: usize) -> Result<Self> {
        Ok(Self {
            inner: RegionCompressor::with_capacity(sink, level, staging)?,
        })
    }
}

impl<W: Write, C: CompressContext> FrameWriter<W, C> {
    /// Creates a writer driving a caller-chosen compression context.
    pub fn with_context(sink: W, ctx: C) -> Self {
        Self {
            inner: RegionCompressor::with_context(sink, ctx),
        }
    }

    /// Compresses the unread range of `src`, advancing its cursor.
    pub fn write_region(&mut self, src: &mut ReadRegion) -> Result<()> {
        self.inner.compress(src)
    }

    /// Flushes staged input, writes the frame epilogue, flushes the sink,
    /// and releases the compression context. The first call finalizes; every
    /// later call is a no-op.
    pub fn finish(&mut self) -> Result<()> {
        self.inner.close()
    }

    /// Consumes the writer and returns the sink. Call
    /// [`finish`](Self::finish) first for a complete frame.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write, C: CompressContext> Write for FrameWriter<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut src = ReadRegion::new(buf);
        self.write_region(&mut src)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

//! The frame codec boundary.
//!
//! A codec turns an input byte range into a self-delimiting compressed frame
//! and back. The adapters in this crate depend only on the traits below, so
//! any engine producing self-delimiting frames can sit behind them. The
//! default implementation is [`zstd`]; [`stored`] is a passthrough codec
//! useful for testing the adapter choreography in isolation.

use crate::error::Result;
use crate::region::{ReadRegion, WriteRegion};

pub mod stored;
pub mod zstd;

/// One-shot whole-buffer compressor.
pub trait BlockCompressor {
    /// Worst-case compressed size for `uncompressed_len` input bytes.
    fn compress_bound(&self, uncompressed_len: usize) -> usize;

    /// Compresses all of `src` into a single frame in `dst`, returning the
    /// number of bytes written.
    fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize>;
}

/// One-shot whole-frame decompressor.
pub trait BlockDecompressor {
    /// Payload size recorded in the frame header, or `None` when the engine
    /// cannot determine it without decompressing.
    fn decompressed_size(&self, frame: &[u8]) -> Result<Option<u64>>;

    /// Decompresses one complete frame from `src` into `dst`, returning the
    /// number of bytes written.
    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize>;
}

/// Progress report from one incremental decompression step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pump {
    /// The current frame still has bytes to consume or produce.
    InProgress,
    /// The current frame is fully decoded and flushed; any remaining input
    /// belongs to the next frame.
    FrameComplete,
}

/// Engine-side state carried across incremental compression calls.
///
/// A context is bound to exactly one frame at a time and must be driven from
/// a single caller; adapters own one context each for their whole lifetime.
pub trait CompressContext {
    /// Preferred staging size for input chunks.
    fn recommended_input_size(&self) -> usize;

    /// Preferred staging size for compressed output.
    ///
    /// A destination of at least this size always lets [`feed`] and
    /// [`finish`] make forward progress.
    ///
    /// [`feed`]: CompressContext::feed
    /// [`finish`]: CompressContext::finish
    fn recommended_output_size(&self) -> usize;

    /// Consumes bytes from `src`, possibly emitting compressed bytes into
    /// `dst`. Both cursors advance by exactly the bytes consumed/produced.
    fn feed(&mut self, dst: &mut WriteRegion, src: &mut ReadRegion) -> Result<()>;

    /// Flushes internally buffered input into `dst` without ending the
    /// frame. Returns `true` once nothing is left buffered.
    fn flush(&mut self, dst: &mut WriteRegion) -> Result<bool>;

    /// Drives the frame epilogue into `dst`. Returns `true` once the frame
    /// is complete; call again with a drained `dst` otherwise.
    fn finish(&mut self, dst: &mut WriteRegion) -> Result<bool>;
}

/// Engine-side state carried across incremental decompression calls.
pub trait DecompressContext {
    /// Preferred staging size for compressed input chunks.
    fn recommended_input_size(&self) -> usize;

    /// Preferred size for decompressed output buffers.
    fn recommended_output_size(&self) -> usize;

    /// Consumes compressed bytes from `src` and produces decompressed bytes
    /// into `dst`, advancing both cursors. May be called with an exhausted
    /// `src` to flush internally buffered output. After
    /// [`Pump::FrameComplete`], feeding further input starts the next frame.
    fn pump(&mut self, dst: &mut WriteRegion, src: &mut ReadRegion) -> Result<Pump>;
}

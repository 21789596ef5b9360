//! Buffer and stream adapters for frame-based block compression codecs.
//!
//! A frame codec consumes an input byte range and produces a self-delimiting
//! compressed frame, or the reverse. This crate supplies the choreography
//! around such an engine: translating blocking `read`/`write` stream
//! semantics into the codec's fixed-buffer, whole-frame calls, honoring
//! position/limit cursors on caller-supplied buffers, continuing across
//! concatenated frames, and surfacing recoverable capacity errors.
//!
//! The default engine is Zstandard via the [`zstd`] crate; anything
//! implementing the traits in [`codec`] can replace it.
//!
//! - One-shot calls over materialized buffers: [`compress`], [`decompress`]
//!   and their vector forms.
//! - Stream adapters: [`FrameWriter`] (implements [`std::io::Write`]) and
//!   [`FrameReader`] (implements [`std::io::Read`], with an opt-in
//!   continuous mode that crosses frame boundaries).
//! - Buffer adapters for large or memory-mapped inputs:
//!   [`RegionDecompressor`] and [`RegionCompressor`].
//!
//! ```
//! use std::io::{Read, Write};
//!
//! fn main() -> framio::Result<()> {
//!     let mut writer = framio::FrameWriter::new(Vec::new(), 3)?;
//!     writer.write_all(b"frames all the way down")?;
//!     writer.finish()?;
//!     let compressed = writer.into_inner();
//!
//!     let mut plain = Vec::new();
//!     framio::FrameReader::new(&compressed[..]).read_to_end(&mut plain)?;
//!     assert_eq!(plain, b"frames all the way down");
//!     Ok(())
//! }
//! ```
//!
//! Adapters are single-threaded per instance: each owns one streaming
//! context and must be driven by one logical caller at a time. The one-shot
//! functions are stateless and freely concurrent with independent buffers.

#![deny(unsafe_code)]

mod buffer;
pub mod codec;
mod error;
mod lifecycle;
mod oneshot;
mod reader;
mod region;
mod writer;

pub use buffer::{RegionCompressor, RegionDecompressor};
pub use error::{Error, Result};
pub use oneshot::{
    compress, compress_to_vec, compress_with, decompress, decompress_to_vec, decompress_with,
    decompressed_size, max_compressed_len,
};
pub use reader::FrameReader;
pub use region::{ReadRegion, WriteRegion};
pub use writer::FrameWriter;

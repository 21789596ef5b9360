//! Stream and buffer adapter coverage: chunking, continuous mode, lifecycle,
//! engine substitution, and decoding of independently assembled frames.

use std::io::{Read, Write};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use framio::codec::stored::{StoredCompressContext, StoredDecompressContext};
use framio::{
    compress_to_vec, decompress_to_vec, decompressed_size, Error, FrameReader, FrameWriter,
    ReadRegion, RegionCompressor, RegionDecompressor, WriteRegion,
};

fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    for chunk in data.chunks_mut(512) {
        if rng.gen_bool(0.6) {
            chunk.fill(rng.gen());
        } else {
            rng.fill(chunk);
        }
    }
    data
}

fn stream_frame(payload: &[u8], level: i32) -> Result<Vec<u8>> {
    let mut writer = FrameWriter::new(Vec::new(), level)?;
    writer.write_all(payload)?;
    writer.finish()?;
    Ok(writer.into_inner())
}

#[test]
fn read_chunk_size_does_not_change_output() -> Result<()> {
    let payload = random_payload(300_000, 3);
    let frame = stream_frame(&payload, 3)?;

    for chunk in [1usize, 128 * 1024, payload.len()] {
        let mut reader = FrameReader::new(&frame[..]);
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, payload, "chunk size {chunk}");
    }
    Ok(())
}

#[test]
fn write_chunk_size_does_not_change_payload() -> Result<()> {
    let payload = random_payload(50_000, 5);

    let mut tiny = FrameWriter::new(Vec::new(), 3)?;
    for b in &payload {
        tiny.write_all(std::slice::from_ref(b))?;
    }
    tiny.finish()?;

    let whole = stream_frame(&payload, 3)?;

    assert_eq!(decompress_to_vec(&tiny.into_inner(), payload.len())?, payload);
    assert_eq!(decompress_to_vec(&whole, payload.len())?, payload);
    Ok(())
}

#[test]
fn tiny_staging_buffers_still_round_trip() -> Result<()> {
    let payload = random_payload(10_000, 51);
    let mut writer = FrameWriter::with_capacity(Vec::new(), 3, 64)?;
    writer.write_all(&payload)?;
    writer.finish()?;
    let frame = writer.into_inner();

    let mut reader = FrameReader::with_capacity(&frame[..], 7);
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    assert_eq!(out, payload);
    Ok(())
}

#[test]
fn continuous_mode_crosses_frame_boundaries() -> Result<()> {
    let first = random_payload(20_000, 7);
    let second = random_payload(9_000, 9);
    let mut stream = stream_frame(&first, 1)?;
    stream.extend_from_slice(&stream_frame(&second, 9)?);

    let mut reader = FrameReader::new(&stream[..]).continuous(true);
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    let mut expected = first.clone();
    expected.extend_from_slice(&second);
    assert_eq!(out, expected);
    Ok(())
}

#[test]
fn single_frame_mode_stops_at_first_boundary() -> Result<()> {
    let first = random_payload(20_000, 7);
    let second = random_payload(9_000, 9);
    let mut stream = stream_frame(&first, 1)?;
    stream.extend_from_slice(&stream_frame(&second, 9)?);

    let mut reader = FrameReader::new(&stream[..]);
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    assert_eq!(out, first);
    // End of frame stays terminal.
    let mut more = [0u8; 64];
    assert_eq!(reader.read(&mut more)?, 0);
    Ok(())
}

#[test]
fn reader_lifecycle_is_close_once() -> Result<()> {
    let frame = stream_frame(b"lifecycle", 1)?;
    let mut reader = FrameReader::new(&frame[..]);
    let mut buf = [0u8; 4];
    reader.read(&mut buf)?;
    reader.close();
    reader.close();
    let err = reader.read(&mut buf).unwrap_err();
    let inner = err.get_ref().and_then(|e| e.downcast_ref::<Error>());
    assert!(matches!(inner, Some(Error::StreamClosed)));
    Ok(())
}

#[test]
fn writer_lifecycle_is_close_once() -> Result<()> {
    let mut writer = FrameWriter::new(Vec::new(), 1)?;
    writer.write_all(b"lifecycle")?;
    writer.finish()?;
    writer.finish()?;
    assert!(writer.write_all(b"x").is_err());
    assert!(writer.flush().is_err());
    Ok(())
}

#[test]
fn region_decompressor_concatenates_frames() -> Result<()> {
    let first = random_payload(30_000, 13);
    let second = random_payload(10_000, 17);
    let mut joined = compress_to_vec(&first, 1)?;
    joined.extend_from_slice(&compress_to_vec(&second, 19)?);

    let mut decomp = RegionDecompressor::over(&joined);
    let mut out = vec![0u8; first.len() + second.len()];
    let produced = {
        let mut dst = WriteRegion::new(&mut out);
        let mut produced = 0;
        while decomp.has_remaining() {
            let n = decomp.read(&mut dst)?;
            if n == 0 {
                break;
            }
            produced += n;
        }
        produced
    };
    assert_eq!(produced, first.len() + second.len());
    assert_eq!(&out[..first.len()], &first[..]);
    assert_eq!(&out[first.len()..], &second[..]);
    assert_eq!(decomp.position(), joined.len());
    Ok(())
}

#[test]
fn region_decompressor_single_byte_destinations_progress() -> Result<()> {
    let payload = random_payload(4_000, 19);
    let frame = compress_to_vec(&payload, 3)?;

    let mut decomp = RegionDecompressor::over(&frame);
    let mut out = Vec::new();
    while decomp.has_remaining() {
        let mut byte = [0u8; 1];
        let n = {
            let mut dst = WriteRegion::new(&mut byte);
            decomp.read(&mut dst)?
        };
        if n == 0 {
            break;
        }
        out.extend_from_slice(&byte[..n]);
    }
    assert_eq!(out, payload);
    Ok(())
}

#[test]
fn region_compressor_round_trips_through_sink() -> Result<()> {
    let payload = random_payload(60_000, 29);
    let mut comp = RegionCompressor::new(Vec::new(), 5)?;
    // Feed through two independently positioned views of the same storage.
    let half = payload.len() / 2;
    let mut front = ReadRegion::with_bounds(&payload, 0, half);
    let mut back = ReadRegion::with_bounds(&payload, half, payload.len());
    comp.compress(&mut front)?;
    comp.compress(&mut back)?;
    comp.close()?;
    comp.close()?;
    let frame = comp.into_inner();

    assert_eq!(decompress_to_vec(&frame, payload.len())?, payload);
    Ok(())
}

#[test]
fn stored_codec_substitutes_for_the_engine() -> Result<()> {
    let payload = random_payload(40_000, 37);

    let mut writer = FrameWriter::with_context(Vec::new(), StoredCompressContext::new());
    writer.write_all(&payload)?;
    writer.finish()?;
    let mut stream = writer.into_inner();

    // A second stored frame behind the first.
    let mut writer = FrameWriter::with_context(Vec::new(), StoredCompressContext::new());
    writer.write_all(b"tail frame")?;
    writer.finish()?;
    stream.extend_from_slice(&writer.into_inner());

    let mut reader =
        FrameReader::with_context(&stream[..], StoredDecompressContext::new()).continuous(true);
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    let mut expected = payload.clone();
    expected.extend_from_slice(b"tail frame");
    assert_eq!(out, expected);

    let mut reader = FrameReader::with_context(&stream[..], StoredDecompressContext::new());
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    assert_eq!(out, payload);
    Ok(())
}

// Frames assembled by hand against the published frame format, standing in
// for output of an independent encoder implementation.
const EMPTY_FRAME: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD, 0x20, 0x00, 0x01, 0x00, 0x00];
const RAW_ABC_FRAME: &[u8] = &[
    0x28, 0xB5, 0x2F, 0xFD, 0x20, 0x03, 0x19, 0x00, 0x00, 0x61, 0x62, 0x63,
];
const RLE_Z10_FRAME: &[u8] = &[
    0x28, 0xB5, 0x2F, 0xFD, 0x20, 0x0A, 0x53, 0x00, 0x00, 0x7A,
];

#[test]
fn foreign_frames_decode() -> Result<()> {
    assert_eq!(decompressed_size(EMPTY_FRAME)?, Some(0));
    assert_eq!(decompress_to_vec(EMPTY_FRAME, 0)?, b"");

    assert_eq!(decompressed_size(RAW_ABC_FRAME)?, Some(3));
    assert_eq!(decompress_to_vec(RAW_ABC_FRAME, 3)?, b"abc");

    assert_eq!(decompress_to_vec(RLE_Z10_FRAME, 10)?, b"zzzzzzzzzz");
    Ok(())
}

#[test]
fn foreign_frames_concatenate_in_continuous_mode() -> Result<()> {
    let mut stream = RAW_ABC_FRAME.to_vec();
    stream.extend_from_slice(EMPTY_FRAME);
    stream.extend_from_slice(RLE_Z10_FRAME);

    let mut reader = FrameReader::new(&stream[..]).continuous(true);
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    assert_eq!(out, b"abczzzzzzzzzz");
    Ok(())
}

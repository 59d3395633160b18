//! # DEFLATE Codec
//!
//! Thin wrappers over `flate2` with zlib framing. One call handles one
//! in-memory buffer; there is no streaming, chunking or retry.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{BenchError, BenchResult};

/// Level used by the benchmark workers.
pub const DEFAULT_LEVEL: u32 = 3;
/// Highest level zlib accepts.
pub const MAX_LEVEL: u32 = 9;

/// Compress `data` at `level` (0..=9).
pub fn deflate(data: &[u8], level: u32) -> BenchResult<Vec<u8>> {
    if level > MAX_LEVEL {
        return Err(BenchError::codec(
            "deflate",
            format!("level {} is outside 0..={}", level, MAX_LEVEL),
        ));
    }
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| BenchError::codec("deflate", e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| BenchError::codec("deflate", e.to_string()))
}

/// Decompress a zlib stream produced by [`deflate`].
pub fn inflate(data: &[u8]) -> BenchResult<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len().saturating_mul(2));
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| BenchError::codec("inflate", e.to_string()))?;
    Ok(out)
}

/// Deflate then inflate; returns the restored bytes.
pub fn round_trip(data: &[u8], level: u32) -> BenchResult<Vec<u8>> {
    let compressed = deflate(data, level)?;
    inflate(&compressed)
}

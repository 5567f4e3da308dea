//! Size guard codec for oversized metadata values.
//!
//! Wire format: zlib-wrapped DEFLATE at the default level, base64 encoded
//! with padding. Only strings longer than [`COMPRESSION_THRESHOLD`]
//! UTF-16 code units are compressed.

use crate::domain::CodecError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};

/// Maximum length, in UTF-16 code units, of a value emitted uncompressed.
pub const COMPRESSION_THRESHOLD: usize = 1000;

/// True when `s` is longer than the threshold.
pub fn exceeds_threshold(s: &str) -> bool {
    // Byte length bounds the UTF-16 length from above.
    s.len() > COMPRESSION_THRESHOLD && s.encode_utf16().count() > COMPRESSION_THRESHOLD
}

/// Compress `s` and return it as base64 text.
pub fn deflate_base64(s: &str) -> Result<String, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(s.len() / 2), Compression::default());
    encoder.write_all(s.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

/// Reverse of [`deflate_base64`].
pub fn inflate(encoded: &str) -> Result<String, CodecError> {
    let compressed = STANDARD.decode(encoded.trim())?;
    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(String::from_utf8(raw)?)
}

/// Apply the size guard: compress when over the threshold, else pass through.
pub fn guard(s: String) -> String {
    if !exceeds_threshold(&s) {
        return s;
    }
    match deflate_base64(&s) {
        Ok(encoded) => {
            tracing::trace!(
                original_len = s.len(),
                compressed_len = encoded.len(),
                "Compressed oversized value"
            );
            encoded
        }
        Err(e) => {
            // Writing into a Vec cannot fail in practice; keep the raw value if it does.
            tracing::warn!(error = %e, "Failed to compress oversized value");
            s
        }
    }
}

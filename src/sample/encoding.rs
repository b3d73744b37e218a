//! Permissive excerpt reading with encoding fallback.
//!
//! Working copies contain whatever bytes their authors committed. Excerpts are
//! read with a strict UTF-8 fast path and fall back to detection plus lossy
//! decoding, so an odd encoding never aborts sampling.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chardetng::EncodingDetector;

/// Read up to `max_bytes` bytes of `path` and decode them into text.
///
/// Invalid byte sequences are replaced rather than raised; the only errors
/// surfaced are I/O failures opening or reading the file.
pub fn read_excerpt(path: &Path, max_bytes: usize) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    file.take(max_bytes as u64).read_to_end(&mut bytes)?;
    Ok(decode_permissive(&bytes))
}

/// Decode bytes into a `String`, never failing.
///
/// Strict UTF-8 first — nearly every source file hits this path. Otherwise
/// chardetng guesses the encoding and encoding_rs decodes with replacement
/// characters for malformed sequences.
fn decode_permissive(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    // `decode` also sniffs BOMs, overriding the guess when one is present.
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

//! Text handling for the default character repertoire.
//!
//! The reading process preserves character data byte for byte;
//! each raw byte maps to the Unicode code point of the same value,
//! which round-trips the single-byte repertoires without loss.

/// Decode the given bytes under the default character repertoire.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Check whether the byte counts as trailing whitespace padding
/// at the end of a character-string value.
pub fn is_trailing_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

//! Transfer syntax identification.
//!
//! The reading process only needs to distinguish
//! the implicit-VR syntax from the explicit ones,
//! and the native (uncompressed little-endian) syntaxes
//! from the encapsulated ones.

/// Implicit VR Little Endian: the default transfer syntax.
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";

/// Explicit VR Little Endian.
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

/// Deflated Explicit VR Little Endian.
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";

/// Trim the trailing padding off a UID value.
/// UI values are padded to even length with a NUL byte,
/// and some writers pad with a space instead.
pub fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches(|c| c == '\0' || c == ' ')
}

/// Whether the data set encoding of this transfer syntax is implicit VR.
pub fn is_implicit_vr(uid: &str) -> bool {
    trim_uid(uid) == IMPLICIT_VR_LITTLE_ENDIAN
}

/// Whether the pixel data of this transfer syntax is encapsulated
/// in a sequence of frame items.
///
/// Every UID other than the three uncompressed little-endian syntaxes
/// is treated as encapsulated.
pub fn is_encapsulated(uid: &str) -> bool {
    !matches!(
        trim_uid(uid),
        IMPLICIT_VR_LITTLE_ENDIAN | EXPLICIT_VR_LITTLE_ENDIAN | DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_detection() {
        assert!(is_implicit_vr("1.2.840.10008.1.2"));
        assert!(is_implicit_vr("1.2.840.10008.1.2\0"));
        assert!(!is_implicit_vr("1.2.840.10008.1.2.1"));
    }

    #[test]
    fn encapsulation_detection() {
        assert!(!is_encapsulated("1.2.840.10008.1.2"));
        assert!(!is_encapsulated("1.2.840.10008.1.2.1"));
        assert!(!is_encapsulated("1.2.840.10008.1.2.1.99"));
        // JPEG Baseline
        assert!(is_encapsulated("1.2.840.10008.1.2.4.50"));
        // JPEG 2000 Image Compression (Lossless Only)
        assert!(is_encapsulated("1.2.840.10008.1.2.4.90"));
        assert!(is_encapsulated("1.2.840.10008.1.2.4.50\0"));
    }
}

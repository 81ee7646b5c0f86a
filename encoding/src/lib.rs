//! This crate handles the low-level decoding of DICOM data element
//! and item headers, in both the implicit and the explicit VR forms
//! of the little-endian transfer syntaxes, plus the small amount of
//! transfer syntax and text handling that the reading process needs.

pub mod decode;
pub mod text;
pub mod transfer_syntax;

pub use crate::decode::{Decode, ExplicitVRLittleEndianDecoder, ImplicitVRLittleEndianDecoder};

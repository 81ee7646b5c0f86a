//! This module contains all DICOM data element header decoding logic.

use dcmio_core::header::{DataElementHeader, SequenceItemHeader};
use dcmio_core::{Tag, VR};
use snafu::{Backtrace, Snafu};
use std::io::{self, Read};

pub mod basic;
pub mod explicit_le;
pub mod implicit_le;

pub use self::explicit_le::ExplicitVRLittleEndianDecoder;
pub use self::implicit_le::ImplicitVRLittleEndianDecoder;

/// Module-level error type:
/// for errors which may occur while decoding element headers.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to read the beginning (tag) of the header: {}", source))]
    ReadHeaderTag {
        backtrace: Option<Backtrace>,
        source: io::Error,
    },
    #[snafu(display("Failed to read the item header: {}", source))]
    ReadItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's tag field: {}", source))]
    ReadTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's reserved bytes: {}", source))]
    ReadReserved {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's element length field: {}", source))]
    ReadLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's value representation: {}", source))]
    ReadVr {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display(
        "Unexpected value {:#06X} for the reserved bytes of element {}",
        value,
        tag
    ))]
    ReservedBytesNonZero {
        tag: Tag,
        value: u16,
        backtrace: Backtrace,
    },
    #[snafu(display("Unknown value representation {:?} in element {}", vr, tag))]
    UnknownVr {
        tag: Tag,
        vr: [u8; 2],
        backtrace: Backtrace,
    },
    #[snafu(display("Invalid data element tag {}", tag))]
    InvalidTag { tag: Tag, backtrace: Backtrace },
    #[snafu(display("Bad sequence item header: {}", source))]
    BadSequenceHeader {
        #[snafu(backtrace)]
        source: dcmio_core::header::SequenceItemHeaderError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Type trait for reading and decoding DICOM data element headers.
///
/// The decoder reports the number of bytes each header occupied in the
/// source; callers accumulate this to detect the end of defined-length
/// items and sequences.
pub trait Decode {
    /// Fetch and decode the next data element header from the given source.
    /// The value is not decoded and the source is left at the first byte
    /// after the header.
    ///
    /// Returns the header and the exact number of bytes read.
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read;

    /// Fetch and decode the next sequence item header from the given source.
    /// Item headers have a fixed size of 8 bytes.
    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read;

    /// Fetch and decode the next data element tag from the given source.
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read;
}

/// Obtain a data element decoder for reading the data elements in a DICOM
/// file's Meta information. According to the standard, these are always
/// encoded in Explicit VR Little Endian.
pub fn file_header_decoder() -> ExplicitVRLittleEndianDecoder {
    ExplicitVRLittleEndianDecoder::default()
}

pub(crate) fn require_known_vr(tag: Tag, vr_bytes: [u8; 2]) -> Result<VR> {
    VR::from_binary(vr_bytes).ok_or_else(|| UnknownVrSnafu { tag, vr: vr_bytes }.build())
}

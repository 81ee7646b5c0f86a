//! Pixel data access types:
//! the frame descriptor, the basic offset table,
//! and the pixel description gathered from the metadata.

use crate::file::{
    Error, InvalidNumberOfFramesSnafu, MissingElementSnafu, Result, RetrieveValueSnafu,
};
use dcmio_core::dataset::DataSet;
use dcmio_core::dictionary::tags;
use dcmio_core::{DataElement, Tag};
use snafu::{ensure, OptionExt, ResultExt};

/// A table of byte offsets locating the frames
/// inside the pixel data element.
///
/// Offsets are measured in bytes from the first byte
/// following the Basic Offset Table item's value.
/// The table is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicOffsetTable {
    offsets: Vec<u64>,
}

impl BasicOffsetTable {
    /// Construct an offset table from the given frame offsets.
    pub fn new(offsets: Vec<u64>) -> Self {
        BasicOffsetTable { offsets }
    }

    /// The number of frames covered by the table.
    pub fn num_frames(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Retrieve the byte offset of the given frame.
    /// `number` is 1-based.
    pub fn frame_offset(&self, number: u32) -> Option<u64> {
        if number == 0 {
            return None;
        }
        self.offsets.get(number as usize - 1).copied()
    }

    /// The full slice of frame offsets.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}

/// A single frame of the pixel data element:
/// the frame bytes plus the descriptor values needed
/// to interpret or decode them.
///
/// For an encapsulated transfer syntax the data is the
/// still-compressed frame item value.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    number: u32,
    data: Vec<u8>,
    rows: u16,
    columns: u16,
    samples_per_pixel: u16,
    bits_allocated: u16,
    bits_stored: u16,
    pixel_representation: u16,
    planar_configuration: u16,
    photometric_interpretation: String,
    transfer_syntax_uid: String,
}

impl Frame {
    pub(crate) fn new(
        number: u32,
        data: Vec<u8>,
        desc: &PixelDescription,
        transfer_syntax_uid: String,
    ) -> Self {
        Frame {
            number,
            data,
            rows: desc.rows,
            columns: desc.columns,
            samples_per_pixel: desc.samples_per_pixel,
            bits_allocated: desc.bits_allocated,
            bits_stored: desc.bits_stored,
            pixel_representation: desc.pixel_representation,
            planar_configuration: desc.planar_configuration,
            photometric_interpretation: desc.photometric_interpretation.clone(),
            transfer_syntax_uid,
        }
    }

    /// The 1-based frame number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The frame's byte buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The length of the frame's byte buffer.
    pub fn length(&self) -> usize {
        self.data.len()
    }

    /// Move the frame's byte buffer out of the frame.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of rows of the decoded frame.
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns of the decoded frame.
    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Number of samples (color channels) per pixel.
    pub fn samples_per_pixel(&self) -> u16 {
        self.samples_per_pixel
    }

    /// Number of bits allocated per sample.
    pub fn bits_allocated(&self) -> u16 {
        self.bits_allocated
    }

    /// Number of bits stored per sample.
    pub fn bits_stored(&self) -> u16 {
        self.bits_stored
    }

    /// Whether sample values are signed (1) or unsigned (0).
    pub fn pixel_representation(&self) -> u16 {
        self.pixel_representation
    }

    /// Whether color samples are interleaved (0) or stored per plane (1).
    pub fn planar_configuration(&self) -> u16 {
        self.planar_configuration
    }

    /// The photometric interpretation of the frame.
    pub fn photometric_interpretation(&self) -> &str {
        &self.photometric_interpretation
    }

    /// The transfer syntax which the frame data is encoded in.
    pub fn transfer_syntax_uid(&self) -> &str {
        &self.transfer_syntax_uid
    }
}

/// The image pixel module values required
/// to locate and describe frames.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PixelDescription {
    pub rows: u16,
    pub columns: u16,
    pub samples_per_pixel: u16,
    pub bits_allocated: u16,
    pub bits_stored: u16,
    pub pixel_representation: u16,
    pub planar_configuration: u16,
    pub photometric_interpretation: String,
}

impl PixelDescription {
    /// Gather the pixel description from the main data set.
    pub(crate) fn from_metadata(metadata: &DataSet) -> Result<Self> {
        Ok(PixelDescription {
            rows: required_us(metadata, tags::ROWS)?,
            columns: required_us(metadata, tags::COLUMNS)?,
            samples_per_pixel: required_us(metadata, tags::SAMPLES_PER_PIXEL)?,
            bits_allocated: required_us(metadata, tags::BITS_ALLOCATED)?,
            bits_stored: required_us(metadata, tags::BITS_STORED)?,
            pixel_representation: required_us(metadata, tags::PIXEL_REPRESENTATION)?,
            planar_configuration: required_us(metadata, tags::PLANAR_CONFIGURATION)?,
            photometric_interpretation: required_element(
                metadata,
                tags::PHOTOMETRIC_INTERPRETATION,
            )?
            .string()
            .context(RetrieveValueSnafu {
                tag: tags::PHOTOMETRIC_INTERPRETATION,
            })?
            .to_owned(),
        })
    }

    /// The byte length of one native (uncompressed) frame.
    pub(crate) fn frame_byte_length(&self) -> u32 {
        u32::from(self.rows)
            * u32::from(self.columns)
            * u32::from(self.samples_per_pixel)
            * u32::from(self.bits_allocated / 8)
    }
}

fn required_element(metadata: &DataSet, tag: Tag) -> Result<&DataElement> {
    metadata.get(tag).context(MissingElementSnafu { tag })
}

fn required_us(metadata: &DataSet, tag: Tag) -> Result<u16> {
    required_element(metadata, tag)?
        .uint16()
        .context(RetrieveValueSnafu { tag })
}

/// Read and parse the Number of Frames element of the data set.
/// The element is required and the decimal value must be positive.
pub(crate) fn read_num_frames(metadata: &DataSet) -> Result<u32, Error> {
    let element = required_element(metadata, tags::NUMBER_OF_FRAMES)?;
    let raw = element.string().context(RetrieveValueSnafu {
        tag: tags::NUMBER_OF_FRAMES,
    })?;
    let num_frames: u32 = raw
        .trim()
        .parse()
        .ok()
        .context(InvalidNumberOfFramesSnafu { value: raw })?;
    ensure!(
        num_frames > 0,
        InvalidNumberOfFramesSnafu { value: raw }
    );
    Ok(num_frames)
}

//! Module holding a stateful DICOM value decoding abstraction.
//!
//! The decoder wraps a data source and a header decoder,
//! tracks the absolute reading position,
//! and knows how to read a primitive value for every
//! value representation category.

use dcmio_core::header::{DataElementHeader, HasLength, SequenceItemHeader, Tag, VR};
use dcmio_core::value::PrimitiveValue;
use dcmio_encoding::decode::basic::LittleEndianBasicDecoder;
use dcmio_encoding::decode::Decode;
use dcmio_encoding::text;
use smallvec::smallvec;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{Read, Seek, SeekFrom};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Attempted to read non-primitive value at position {}", position))]
    NonPrimitiveType { position: u64, backtrace: Backtrace },

    #[snafu(display(
        "Undefined value length of element tagged {} at position {}",
        tag,
        position
    ))]
    UndefinedValueLength {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },

    #[snafu(display("Could not decode element header at position {}", position))]
    DecodeElementHeader {
        position: u64,
        #[snafu(backtrace)]
        source: dcmio_encoding::decode::Error,
    },

    #[snafu(display("Could not decode item header at position {}", position))]
    DecodeItemHeader {
        position: u64,
        #[snafu(backtrace)]
        source: dcmio_encoding::decode::Error,
    },

    #[snafu(display("Could not decode tag at position {}", position))]
    DecodeTag {
        position: u64,
        #[snafu(backtrace)]
        source: dcmio_encoding::decode::Error,
    },

    #[snafu(display("Could not read value from source at position {}", position))]
    ReadValueData {
        position: u64,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display(
        "Could not move source cursor from position {} to {}",
        position,
        new_position
    ))]
    SeekReader {
        position: u64,
        new_position: u64,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display(
        "Unexpected value multiplicity {} of element tagged {} at position {}",
        vm,
        tag,
        position
    ))]
    MultiplicityNotOne {
        tag: Tag,
        vm: u32,
        position: u64,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The initial capacity of the value reading buffer.
const PARSER_BUFFER_CAPACITY: usize = 2048;

/// A stateful abstraction for the DICOM value reading process.
/// `S` is the type of the data source,
/// `D` is the header decoder for the active transfer syntax.
#[derive(Debug)]
pub struct StatefulDecoder<D, S> {
    from: S,
    decoder: D,
    basic: LittleEndianBasicDecoder,
    buffer: Vec<u8>,
    /// the assumed position of the reader source
    position: u64,
}

impl<D, S> StatefulDecoder<D, S> {
    /// Create a new stateful decoder,
    /// while assuming a base reading position.
    ///
    /// `position` should be calculated with care:
    /// decoding or parsing errors may occur
    /// if it does not match the real position of the reader.
    pub fn new_with_position(from: S, decoder: D, position: u64) -> Self {
        StatefulDecoder {
            from,
            decoder,
            basic: LittleEndianBasicDecoder,
            buffer: Vec::with_capacity(PARSER_BUFFER_CAPACITY),
            position,
        }
    }

    /// Retrieve the known position of the inner reader source.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<D, S> StatefulDecoder<D, S>
where
    S: Seek,
{
    /// Create a new stateful decoder,
    /// determining the source's current position via `seek`.
    pub fn new_positioned(mut from: S, decoder: D) -> std::io::Result<Self> {
        let position = from.stream_position()?;
        Ok(Self::new_with_position(from, decoder, position))
    }

    /// Reposition the reader to the given absolute position.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.from
            .seek(SeekFrom::Start(position))
            .context(SeekReaderSnafu {
                position: self.position,
                new_position: position,
            })?;
        self.position = position;
        Ok(())
    }

    /// Move the reader back by the given number of bytes,
    /// typically to unread a peeked tag.
    pub fn rewind(&mut self, bytes: u64) -> Result<()> {
        let new_position = self.position - bytes;
        self.from
            .seek(SeekFrom::Current(-(bytes as i64)))
            .context(SeekReaderSnafu {
                position: self.position,
                new_position,
            })?;
        self.position = new_position;
        Ok(())
    }
}

impl<D, S> StatefulDecoder<D, S>
where
    S: Read + Seek,
{
    /// Probe whether the source has reached its end,
    /// without consuming any data.
    pub fn is_at_end(&mut self) -> Result<bool> {
        let mut probe = [0u8; 1];
        let n = self.from.read(&mut probe).context(ReadValueDataSnafu {
            position: self.position,
        })?;
        if n == 0 {
            return Ok(true);
        }
        self.from
            .seek(SeekFrom::Current(-1))
            .context(SeekReaderSnafu {
                position: self.position,
                new_position: self.position,
            })?;
        Ok(false)
    }
}

impl<D, S> StatefulDecoder<D, S>
where
    D: Decode,
    S: Read,
{
    /// Decode the next data element header,
    /// accounting for the bytes read.
    pub fn decode_header(&mut self) -> Result<DataElementHeader> {
        self.decoder
            .decode_header(&mut self.from)
            .context(DecodeElementHeaderSnafu {
                position: self.position,
            })
            .map(|(header, bytes_read)| {
                self.position += bytes_read as u64;
                header
            })
    }

    /// Decode the next sequence item header (8 bytes).
    pub fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        self.decoder
            .decode_item_header(&mut self.from)
            .context(DecodeItemHeaderSnafu {
                position: self.position,
            })
            .map(|header| {
                self.position += 8;
                header
            })
    }

    /// Decode the next data element tag (4 bytes).
    pub fn decode_tag(&mut self) -> Result<Tag> {
        self.decoder
            .decode_tag(&mut self.from)
            .context(DecodeTagSnafu {
                position: self.position,
            })
            .map(|tag| {
                self.position += 4;
                tag
            })
    }

    /// Read the following number of bytes into a vector.
    pub fn read_to_vec(&mut self, length: u32, vec: &mut Vec<u8>) -> Result<()> {
        let base = vec.len();
        vec.resize(base + length as usize, 0);
        self.from
            .read_exact(&mut vec[base..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += u64::from(length);
        Ok(())
    }

    /// Read the following number of bytes
    /// as a sequence of unsigned 32 bit integers
    /// into a vector.
    pub fn read_u32_to_vec(&mut self, length: u32, vec: &mut Vec<u32>) -> Result<()> {
        let n = (length >> 2) as usize;
        let base = vec.len();
        vec.resize(base + n, 0);
        self.basic
            .decode_ul_into(&mut self.from, &mut vec[base..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += u64::from(length);
        Ok(())
    }

    /// Skip the following bytes,
    /// counting them as if they were read.
    pub fn skip_bytes(&mut self, length: u32) -> Result<()> {
        std::io::copy(
            &mut self.from.by_ref().take(u64::from(length)),
            &mut std::io::sink(),
        )
        .context(ReadValueDataSnafu {
            position: self.position,
        })?;
        self.position += u64::from(length);
        Ok(())
    }

    /// Eagerly read the following data in the source as a primitive value.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O problems,
    /// on an undefined value length,
    /// or if the header VR describes a sequence,
    /// which in that case this method should not be used.
    pub fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        match header.vr() {
            VR::SQ => {
                // sequence items are handled at a higher level
                NonPrimitiveTypeSnafu {
                    position: self.position,
                }
                .fail()
            }
            VR::ST | VR::LT | VR::UR | VR::UT => self.read_value_str(header),
            VR::AE
            | VR::AS
            | VR::AT
            | VR::CS
            | VR::DA
            | VR::DS
            | VR::DT
            | VR::IS
            | VR::LO
            | VR::PN
            | VR::SH
            | VR::TM
            | VR::UI => self.read_value_strs(header),
            VR::SS => self.read_value_ss(header),
            VR::US => self.read_value_us(header),
            VR::SL => self.read_value_sl(header),
            VR::UL => self.read_value_ul(header),
            VR::SV => self.read_value_sv(header),
            VR::UV => self.read_value_uv(header),
            VR::FL => self.read_value_fl(header),
            VR::FD => self.read_value_fd(header),
            VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::UC | VR::UN => {
                self.read_value_ob(header)
            }
        }
    }

    // ---------------- private methods ---------------------

    fn require_known_length(&self, header: &DataElementHeader) -> Result<usize> {
        header
            .length()
            .get()
            .map(|len| len as usize)
            .context(UndefinedValueLengthSnafu {
                position: self.position,
                tag: header.tag,
            })
    }

    /// Read the raw bytes of a character-string value,
    /// strip a single trailing whitespace byte when the VR admits padding,
    /// and split the result on backslashes.
    fn read_value_substrings(&mut self, header: &DataElementHeader) -> Result<Vec<String>> {
        let len = self.require_known_length(header)?;
        self.buffer.resize_with(len, Default::default);
        self.from
            .read_exact(&mut self.buffer)
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;

        let mut raw = &self.buffer[..];
        if header.vr() != VR::UI {
            if let [head @ .., last] = raw {
                if text::is_trailing_whitespace(*last) {
                    raw = head;
                }
            }
        }
        Ok(raw.split(|v| *v == b'\\').map(text::decode_text).collect())
    }

    fn read_value_strs(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let parts = self.read_value_substrings(header)?;
        Ok(PrimitiveValue::Strs(parts.into_iter().collect()))
    }

    fn read_value_str(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let mut parts = self.read_value_substrings(header)?;
        // this VR shall always have VM 1
        snafu::ensure!(
            parts.len() == 1,
            MultiplicityNotOneSnafu {
                tag: header.tag,
                vm: parts.len() as u32,
                position: self.position,
            }
        );
        Ok(PrimitiveValue::Str(parts.remove(0)))
    }

    fn read_value_ob(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 8-bit integers (or arbitrary byte data)
        let len = self.require_known_length(header)?;
        let mut buf = smallvec![0u8; len];
        self.from.read_exact(&mut buf).context(ReadValueDataSnafu {
            position: self.position,
        })?;
        self.position += len as u64;
        Ok(PrimitiveValue::U8(buf))
    }

    fn read_value_ss(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 16-bit signed integers
        let len = self.require_known_length(header)?;
        let n = len >> 1;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_ss_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::I16(vec))
    }

    fn read_value_us(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 16-bit unsigned integers
        let len = self.require_known_length(header)?;
        let n = len >> 1;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_us_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::U16(vec))
    }

    fn read_value_sl(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 32-bit signed integers
        let len = self.require_known_length(header)?;
        let n = len >> 2;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_sl_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::I32(vec))
    }

    fn read_value_ul(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 32-bit unsigned integers
        let len = self.require_known_length(header)?;
        let n = len >> 2;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_ul_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::U32(vec))
    }

    fn read_value_sv(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 64-bit signed integers
        let len = self.require_known_length(header)?;
        let n = len >> 3;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_sv_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::I64(vec))
    }

    fn read_value_uv(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 64-bit unsigned integers
        let len = self.require_known_length(header)?;
        let n = len >> 3;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_uv_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::U64(vec))
    }

    fn read_value_fl(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 32-bit floats
        let len = self.require_known_length(header)?;
        let n = len >> 2;
        let mut vec = smallvec![0.; n];
        self.basic
            .decode_fl_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::F32(vec))
    }

    fn read_value_fd(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 64-bit floats
        let len = self.require_known_length(header)?;
        let n = len >> 3;
        let mut vec = smallvec![0.; n];
        self.basic
            .decode_fd_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += len as u64;
        Ok(PrimitiveValue::F64(vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_core::header::Length;
    use dcmio_encoding::decode::ExplicitVRLittleEndianDecoder;
    use std::io::Cursor;

    fn decoder_for(
        data: &[u8],
    ) -> StatefulDecoder<ExplicitVRLittleEndianDecoder, Cursor<&[u8]>> {
        StatefulDecoder::new_with_position(
            Cursor::new(data),
            ExplicitVRLittleEndianDecoder::default(),
            0,
        )
    }

    #[test]
    fn read_multi_valued_string() {
        // (0008,0008) ImageType ; CS ; "DERIVED\PRIMARY "
        let raw: &[u8] = &[
            0x08, 0x00, 0x08, 0x00, b'C', b'S', 0x10, 0x00, b'D', b'E', b'R', b'I', b'V', b'E',
            b'D', b'\\', b'P', b'R', b'I', b'M', b'A', b'R', b'Y', b' ',
        ];
        let mut parser = decoder_for(raw);
        let header = parser.decode_header().unwrap();
        assert_eq!(header.vr(), VR::CS);
        let value = parser.read_value(&header).unwrap();
        assert_eq!(value.multiplicity(), 2);
        assert_eq!(value.strings().unwrap(), &["DERIVED", "PRIMARY"]);
        assert_eq!(parser.position(), raw.len() as u64);
    }

    #[test]
    fn read_empty_string_has_vm_one() {
        // (0008,0050) AccessionNumber ; SH ; zero length
        let raw: &[u8] = &[0x08, 0x00, 0x50, 0x00, b'S', b'H', 0x00, 0x00];
        let mut parser = decoder_for(raw);
        let header = parser.decode_header().unwrap();
        let value = parser.read_value(&header).unwrap();
        assert_eq!(value.multiplicity(), 1);
        assert_eq!(value.string().unwrap(), "");
    }

    #[test]
    fn uid_keeps_trailing_padding_byte() {
        // (0008,0018) SOPInstanceUID ; UI ; "1.2.3.4\0"
        let raw: &[u8] = &[
            0x08, 0x00, 0x18, 0x00, b'U', b'I', 0x08, 0x00, b'1', b'.', b'2', b'.', b'3', b'.',
            b'4', 0x00,
        ];
        let mut parser = decoder_for(raw);
        let header = parser.decode_header().unwrap();
        let value = parser.read_value(&header).unwrap();
        assert_eq!(value.string().unwrap(), "1.2.3.4\0");
    }

    #[test]
    fn single_valued_vr_rejects_backslash() {
        // (0008,0081) with VR ST and value "A\B"
        let raw: &[u8] = &[
            0x08, 0x00, 0x81, 0x00, b'S', b'T', 0x04, 0x00, b'A', b'\\', b'B', b' ',
        ];
        let mut parser = decoder_for(raw);
        let header = parser.decode_header().unwrap();
        let err = parser.read_value(&header).unwrap_err();
        assert!(matches!(
            err,
            Error::MultiplicityNotOne { vm: 2, .. }
        ));
    }

    #[test]
    fn read_numeric_values() {
        // (0028,0010) Rows ; US ; [512, 256, 16]
        let raw: &[u8] = &[
            0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x06, 0x00, 0x00, 0x02, 0x00, 0x01, 0x10, 0x00,
        ];
        let mut parser = decoder_for(raw);
        let header = parser.decode_header().unwrap();
        assert_eq!(header.length(), Length(6));
        let value = parser.read_value(&header).unwrap();
        // VM is the length over the element size
        assert_eq!(value.multiplicity(), 3);
        assert_eq!(value.uint16_slice().unwrap(), &[512, 256, 16]);
    }

    #[test]
    fn read_float_values() {
        // (0048,0001) ImagedVolumeWidth ; FL ; [0.5]
        let raw: &[u8] = &[
            0x48, 0x00, 0x01, 0x00, b'F', b'L', 0x04, 0x00, 0x00, 0x00, 0x00, 0x3F,
        ];
        let mut parser = decoder_for(raw);
        let header = parser.decode_header().unwrap();
        let value = parser.read_value(&header).unwrap();
        assert_eq!(value.float32().unwrap(), 0.5);
    }

    #[test]
    fn read_blob_value() {
        // (7FE0,0010) PixelData ; OB ; 4 bytes
        let raw: &[u8] = &[
            0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0xDE, 0xAD,
            0xBE, 0xEF,
        ];
        let mut parser = decoder_for(raw);
        let header = parser.decode_header().unwrap();
        let value = parser.read_value(&header).unwrap();
        assert_eq!(value.uint8_slice().unwrap(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn sequences_are_refused() {
        let header = DataElementHeader::new(Tag(0x0008, 0x1140), VR::SQ, Length::UNDEFINED);
        let mut parser = decoder_for(&[]);
        assert!(matches!(
            parser.read_value(&header),
            Err(Error::NonPrimitiveType { .. })
        ));
    }

    #[test]
    fn undefined_length_on_primitive_is_an_error() {
        let header = DataElementHeader::new(Tag(0x7FE0, 0x0010), VR::OB, Length::UNDEFINED);
        let mut parser = decoder_for(&[]);
        assert!(matches!(
            parser.read_value(&header),
            Err(Error::UndefinedValueLength { .. })
        ));
    }
}

//! This module provides the basic decoding of primitive binary values
//! from a data source. The file format is little-endian throughout,
//! so only the little-endian decoder is provided.

use byteordered::byteorder::{ByteOrder, LittleEndian};
use dcmio_core::Tag;
use std::io::{Read, Result};

/// A basic decoder of DICOM primitive values in little endian.
#[derive(Debug, Default, Clone)]
pub struct LittleEndianBasicDecoder;

macro_rules! impl_decode_into {
    ($name: ident, $name_into: ident, $typ: ty, $size: expr, $read: ident, $read_into: ident) => {
        /// Decode a single value from the given source.
        pub fn $name<S>(&self, source: &mut S) -> Result<$typ>
        where
            S: ?Sized + Read,
        {
            let mut buf = [0u8; $size];
            source.read_exact(&mut buf)?;
            Ok(LittleEndian::$read(&buf))
        }

        /// Decode a sequence of values from the given source
        /// into the given slice.
        pub fn $name_into<S>(&self, source: &mut S, target: &mut [$typ]) -> Result<()>
        where
            S: ?Sized + Read,
        {
            let mut buf = vec![0u8; target.len() * $size];
            source.read_exact(&mut buf)?;
            LittleEndian::$read_into(&buf, target);
            Ok(())
        }
    };
}

impl LittleEndianBasicDecoder {
    /// Decode an unsigned short value from the given source.
    pub fn decode_us<S>(&self, source: &mut S) -> Result<u16>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 2];
        source.read_exact(&mut buf)?;
        Ok(LittleEndian::read_u16(&buf))
    }

    /// Decode a sequence of unsigned short values from the given source
    /// into the given slice.
    pub fn decode_us_into<S>(&self, source: &mut S, target: &mut [u16]) -> Result<()>
    where
        S: ?Sized + Read,
    {
        let mut buf = vec![0u8; target.len() * 2];
        source.read_exact(&mut buf)?;
        LittleEndian::read_u16_into(&buf, target);
        Ok(())
    }

    impl_decode_into!(decode_ul, decode_ul_into, u32, 4, read_u32, read_u32_into);
    impl_decode_into!(decode_uv, decode_uv_into, u64, 8, read_u64, read_u64_into);
    impl_decode_into!(decode_ss, decode_ss_into, i16, 2, read_i16, read_i16_into);
    impl_decode_into!(decode_sl, decode_sl_into, i32, 4, read_i32, read_i32_into);
    impl_decode_into!(decode_sv, decode_sv_into, i64, 8, read_i64, read_i64_into);
    impl_decode_into!(decode_fl, decode_fl_into, f32, 4, read_f32, read_f32_into);
    impl_decode_into!(decode_fd, decode_fd_into, f64, 8, read_f64, read_f64_into);

    /// Decode a tag from the given source:
    /// two little-endian 16-bit words composing the 32-bit identifier.
    pub fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 4];
        source.read_exact(&mut buf)?;
        Ok(Tag(
            LittleEndian::read_u16(&buf[0..2]),
            LittleEndian::read_u16(&buf[2..4]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn decode_basic_values() {
        let dec = LittleEndianBasicDecoder;
        let raw: &[u8] = &[0x01, 0x02, 0x03, 0x04];
        assert_eq!(dec.decode_us(&mut Cursor::new(raw)).unwrap(), 0x0201);
        assert_eq!(dec.decode_ul(&mut Cursor::new(raw)).unwrap(), 0x0403_0201);

        let mut values = [0u16; 2];
        dec.decode_us_into(&mut Cursor::new(raw), &mut values)
            .unwrap();
        assert_eq!(values, [0x0201, 0x0403]);
    }

    #[test]
    fn decode_tag_composes_group_and_element() {
        let dec = LittleEndianBasicDecoder;
        let raw: &[u8] = &[0xE0, 0x7F, 0x10, 0x00];
        assert_eq!(
            dec.decode_tag(&mut Cursor::new(raw)).unwrap(),
            Tag(0x7FE0, 0x0010)
        );
    }
}

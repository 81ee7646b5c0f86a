//! Declaration and implementation of DICOM element values.
//!
//! A decoded value is either a [`PrimitiveValue`] or a nested item
//! sequence. Primitive values are held in one variant per value
//! representation category, so accessors do not need to guard on the
//! VR at every call site.

use crate::dataset::Sequence;
use crate::header::Length;
use itertools::Itertools;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// An enum representing a primitive value from a DICOM element.
/// The result of decoding an element's data value
/// may be one of the enumerated types
/// depending on its value representation category.
///
/// Multiple elements are contained in a [`smallvec`] vector,
/// conveniently aliased to the type [`C`].
#[derive(Debug, PartialEq, Clone)]
pub enum PrimitiveValue {
    /// A sequence of strings.
    /// Used for AE, AS, AT, CS, DA, DS, DT, IS, LO, PN, SH, TM and UI,
    /// which may be multi-valued.
    Strs(C<String>),

    /// A single string.
    /// Used for ST, LT, UR and UT, which are never multi-valued.
    Str(String),

    /// A raw byte buffer.
    /// Used for the binary blob representations
    /// OB, OD, OF, OL, OV, OW, UC and UN.
    U8(C<u8>),

    /// A sequence of signed 16-bit integers.
    /// Used for SS.
    I16(C<i16>),

    /// A sequence of unsigned 16-bit integers.
    /// Used for US.
    U16(C<u16>),

    /// A sequence of signed 32-bit integers.
    /// Used for SL.
    I32(C<i32>),

    /// A sequence of unsigned 32-bit integers.
    /// Used for UL.
    U32(C<u32>),

    /// A sequence of signed 64-bit integers.
    /// Used for SV.
    I64(C<i64>),

    /// A sequence of unsigned 64-bit integers.
    /// Used for UV.
    U64(C<u64>),

    /// A sequence of 32-bit floating point numbers.
    /// Used for FL.
    F32(C<f32>),

    /// A sequence of 64-bit floating point numbers.
    /// Used for FD.
    F64(C<f64>),
}

/// An enum representing an abstraction of a value's type.
/// Mainly used for error reporting on failed value casts.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValueType {
    /// A sequence of strings.
    Strs,
    /// A single string.
    Str,
    /// A raw byte buffer.
    U8,
    /// A sequence of signed 16-bit integers.
    I16,
    /// A sequence of unsigned 16-bit integers.
    U16,
    /// A sequence of signed 32-bit integers.
    I32,
    /// A sequence of unsigned 32-bit integers.
    U32,
    /// A sequence of signed 64-bit integers.
    I64,
    /// A sequence of unsigned 64-bit integers.
    U64,
    /// A sequence of 32-bit floating point numbers.
    F32,
    /// A sequence of 64-bit floating point numbers.
    F64,
    /// A nested item sequence.
    Item,
}

/// An error raised on an attempt of accessing a value
/// in an inappropriate format.
#[derive(Debug, Clone, PartialEq)]
pub struct CastValueError {
    /// The value format requested
    pub requested: &'static str,
    /// The value's actual type
    pub got: ValueType,
}

impl fmt::Display for CastValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "bad value cast: requested {} but value is {:?}",
            self.requested, self.got
        )
    }
}

impl std::error::Error for CastValueError {}

type Result<T> = std::result::Result<T, CastValueError>;

macro_rules! impl_primitive_getters {
    ($name_single: ident, $name_multi: ident, $variant: ident, $ret: ty) => {
        /// Get a single value of the requested type,
        /// the first one if the value is multi-valued.
        ///
        /// An error is returned if the variant is not compatible.
        pub fn $name_single(&self) -> Result<$ret> {
            match self {
                PrimitiveValue::$variant(c) if !c.is_empty() => Ok(c[0]),
                value => Err(CastValueError {
                    requested: stringify!($name_single),
                    got: value.value_type(),
                }),
            }
        }

        /// Get a sequence of values of the requested type without copying.
        ///
        /// An error is returned if the variant is not compatible.
        pub fn $name_multi(&self) -> Result<&[$ret]> {
            match self {
                PrimitiveValue::$variant(c) => Ok(c),
                value => Err(CastValueError {
                    requested: stringify!($name_multi),
                    got: value.value_type(),
                }),
            }
        }
    };
}

impl PrimitiveValue {
    /// Obtain the value's type abstraction.
    pub fn value_type(&self) -> ValueType {
        match self {
            PrimitiveValue::Strs(_) => ValueType::Strs,
            PrimitiveValue::Str(_) => ValueType::Str,
            PrimitiveValue::U8(_) => ValueType::U8,
            PrimitiveValue::I16(_) => ValueType::I16,
            PrimitiveValue::U16(_) => ValueType::U16,
            PrimitiveValue::I32(_) => ValueType::I32,
            PrimitiveValue::U32(_) => ValueType::U32,
            PrimitiveValue::I64(_) => ValueType::I64,
            PrimitiveValue::U64(_) => ValueType::U64,
            PrimitiveValue::F32(_) => ValueType::F32,
            PrimitiveValue::F64(_) => ValueType::F64,
        }
    }

    /// Obtain the number of individual values.
    /// A single string always counts as one,
    /// and a raw byte buffer counts as one value regardless of size.
    pub fn multiplicity(&self) -> u32 {
        use self::PrimitiveValue::*;
        match self {
            Str(_) => 1,
            U8(_) => 1,
            Strs(c) => c.len() as u32,
            I16(c) => c.len() as u32,
            U16(c) => c.len() as u32,
            I32(c) => c.len() as u32,
            U32(c) => c.len() as u32,
            I64(c) => c.len() as u32,
            U64(c) => c.len() as u32,
            F32(c) => c.len() as u32,
            F64(c) => c.len() as u32,
        }
    }

    /// Determine the size of the encoded value in bytes,
    /// as read from the source.
    pub fn calculate_byte_len(&self) -> usize {
        use self::PrimitiveValue::*;
        match self {
            Str(s) => s.len(),
            Strs(c) => c.iter().map(|s| s.len() + 1).sum::<usize>().saturating_sub(1),
            U8(c) => c.len(),
            I16(c) => c.len() * 2,
            U16(c) => c.len() * 2,
            I32(c) => c.len() * 4,
            U32(c) => c.len() * 4,
            I64(c) => c.len() * 8,
            U64(c) => c.len() * 8,
            F32(c) => c.len() * 4,
            F64(c) => c.len() * 8,
        }
    }

    /// Convert the primitive value into a string representation.
    ///
    /// String values are provided as is;
    /// multiple strings are joined together with a backslash (`'\\'`).
    /// All other variants have their values formatted
    /// and joined together with a backslash.
    pub fn to_str(&self) -> Cow<str> {
        use self::PrimitiveValue::*;
        match self {
            Str(value) => Cow::from(value.as_str()),
            Strs(values) => {
                if values.len() == 1 {
                    Cow::from(&values[0])
                } else {
                    Cow::from(values.iter().join("\\"))
                }
            }
            U8(values) => Cow::from(values.iter().map(|n| n.to_string()).join("\\")),
            I16(values) => Cow::from(values.iter().join("\\")),
            U16(values) => Cow::from(values.iter().join("\\")),
            I32(values) => Cow::from(values.iter().join("\\")),
            U32(values) => Cow::from(values.iter().join("\\")),
            I64(values) => Cow::from(values.iter().join("\\")),
            U64(values) => Cow::from(values.iter().join("\\")),
            F32(values) => Cow::from(values.iter().join("\\")),
            F64(values) => Cow::from(values.iter().join("\\")),
        }
    }

    /// Get a single string value,
    /// the first one if the value is multi-valued.
    ///
    /// An error is returned if the variant is not compatible.
    pub fn string(&self) -> Result<&str> {
        match self {
            PrimitiveValue::Str(s) => Ok(s),
            PrimitiveValue::Strs(c) if !c.is_empty() => Ok(&c[0]),
            value => Err(CastValueError {
                requested: "string",
                got: value.value_type(),
            }),
        }
    }

    /// Get the full sequence of string values.
    /// A single string is provided as a slice of one element.
    ///
    /// An error is returned if the variant is not compatible.
    pub fn strings(&self) -> Result<&[String]> {
        match self {
            PrimitiveValue::Strs(c) => Ok(c),
            PrimitiveValue::Str(s) => Ok(std::slice::from_ref(s)),
            value => Err(CastValueError {
                requested: "strings",
                got: value.value_type(),
            }),
        }
    }

    impl_primitive_getters!(uint8, uint8_slice, U8, u8);
    impl_primitive_getters!(int16, int16_slice, I16, i16);
    impl_primitive_getters!(uint16, uint16_slice, U16, u16);
    impl_primitive_getters!(int32, int32_slice, I32, i32);
    impl_primitive_getters!(uint32, uint32_slice, U32, u32);
    impl_primitive_getters!(int64, int64_slice, I64, i64);
    impl_primitive_getters!(uint64, uint64_slice, U64, u64);
    impl_primitive_getters!(float32, float32_slice, F32, f32);
    impl_primitive_getters!(float64, float64_slice, F64, f64);
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::Str(value.to_owned())
    }
}

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        PrimitiveValue::Str(value)
    }
}

impl From<Vec<u8>> for PrimitiveValue {
    fn from(value: Vec<u8>) -> Self {
        PrimitiveValue::U8(C::from_vec(value))
    }
}

/// A full DICOM element value,
/// which is either a primitive value
/// or a nested sequence of items.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    /// A primitive value.
    Primitive(PrimitiveValue),
    /// A nested sequence of data set items.
    Sequence(Sequence),
}

impl Value {
    /// Obtain the number of individual values.
    /// For a sequence, this is the number of items.
    pub fn multiplicity(&self) -> u32 {
        match self {
            Value::Primitive(v) => v.multiplicity(),
            Value::Sequence(items) => items.len() as u32,
        }
    }

    /// The size of the value as read from the source,
    /// undefined for sequences.
    pub fn size(&self) -> Length {
        match self {
            Value::Primitive(v) => Length(v.calculate_byte_len() as u32),
            Value::Sequence(_) => Length::UNDEFINED,
        }
    }

    /// Get a reference to the primitive value,
    /// if the value is primitive.
    pub fn primitive(&self) -> Result<&PrimitiveValue> {
        match self {
            Value::Primitive(v) => Ok(v),
            Value::Sequence(_) => Err(CastValueError {
                requested: "primitive",
                got: ValueType::Item,
            }),
        }
    }

    /// Get a reference to the nested item sequence,
    /// if the value is a sequence.
    pub fn sequence(&self) -> Result<&Sequence> {
        match self {
            Value::Sequence(items) => Ok(items),
            Value::Primitive(v) => Err(CastValueError {
                requested: "sequence",
                got: v.value_type(),
            }),
        }
    }

    /// Get a single string value,
    /// the first one if the value is multi-valued.
    pub fn string(&self) -> Result<&str> {
        self.primitive()?.string()
    }

    /// Get the full sequence of string values.
    pub fn strings(&self) -> Result<&[String]> {
        self.primitive()?.strings()
    }
}

macro_rules! impl_value_getters {
    ($name_single: ident, $name_multi: ident, $ret: ty) => {
        /// Get a single value of the requested type,
        /// the first one if the value is multi-valued.
        pub fn $name_single(&self) -> Result<$ret> {
            self.primitive()?.$name_single()
        }

        /// Get a sequence of values of the requested type without copying.
        pub fn $name_multi(&self) -> Result<&[$ret]> {
            self.primitive()?.$name_multi()
        }
    };
}

impl Value {
    impl_value_getters!(uint8, uint8_slice, u8);
    impl_value_getters!(uint16, uint16_slice, u16);
    impl_value_getters!(int16, int16_slice, i16);
    impl_value_getters!(uint32, uint32_slice, u32);
    impl_value_getters!(int32, int32_slice, i32);
    impl_value_getters!(uint64, uint64_slice, u64);
    impl_value_getters!(int64, int64_slice, i64);
    impl_value_getters!(float32, float32_slice, f32);
    impl_value_getters!(float64, float64_slice, f64);
}

impl From<PrimitiveValue> for Value {
    fn from(v: PrimitiveValue) -> Self {
        Value::Primitive(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn multiplicity_counts_values() {
        let v = PrimitiveValue::Strs(smallvec!["A".to_owned(), "B".to_owned(), "C".to_owned()]);
        assert_eq!(v.multiplicity(), 3);

        let v = PrimitiveValue::Str("A\\B".to_owned());
        assert_eq!(v.multiplicity(), 1);

        let v = PrimitiveValue::U16(smallvec![1, 2, 3, 4]);
        assert_eq!(v.multiplicity(), 4);

        let v = PrimitiveValue::U8(smallvec![0u8; 256]);
        assert_eq!(v.multiplicity(), 1);
    }

    #[test]
    fn to_str_joins_with_backslash() {
        let v = PrimitiveValue::Strs(smallvec![
            "DERIVED".to_owned(),
            "PRIMARY".to_owned(),
            "WHOLE BODY".to_owned(),
        ]);
        assert_eq!(v.to_str(), "DERIVED\\PRIMARY\\WHOLE BODY");

        let v = PrimitiveValue::U16(smallvec![256, 0, 16]);
        assert_eq!(v.to_str(), "256\\0\\16");
    }

    #[test]
    fn getters_check_the_variant() {
        let v = PrimitiveValue::F64(smallvec![0.5, 1.5]);
        assert_eq!(v.float64().unwrap(), 0.5);
        assert_eq!(v.float64_slice().unwrap(), &[0.5, 1.5]);
        let e = v.uint16().unwrap_err();
        assert_eq!(e.got, ValueType::F64);
    }

    #[test]
    fn empty_strings_have_multiplicity_one() {
        let v = PrimitiveValue::Strs(smallvec!["".to_owned()]);
        assert_eq!(v.multiplicity(), 1);
        assert_eq!(v.string().unwrap(), "");
    }
}

//! Basic types for interpreting DICOM data elements:
//! the attribute tag, the value length, the value representation,
//! and the element header forms read from a Part 10 stream.

use crate::dataset::Sequence;
use crate::value::{CastValueError, PrimitiveValue, Value};
use snafu::{Backtrace, Snafu};
use std::cmp::Ordering;
use std::fmt;
use std::str::{from_utf8, FromStr};

/// Error type for issues constructing a sequence item header.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SequenceItemHeaderError {
    /// Unexpected header tag.
    /// Only Item (FFFE,E000),
    /// Item Delimiter (FFFE,E00D),
    /// or Sequence Delimiter (FFFE,E0DD)
    /// are admitted.
    #[snafu(display("Unexpected item tag {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },
    /// Unexpected delimiter value length.
    /// Must be zero for item delimiters.
    #[snafu(display("Unexpected delimiter length {}", len))]
    UnexpectedDelimiterLength { len: Length, backtrace: Backtrace },
}

type Result<T, E = SequenceItemHeaderError> = std::result::Result<T, E>;

/// Trait for any DICOM entity (element or item) which may have a length.
pub trait HasLength {
    /// Retrieve the value data's length as specified by the data element or
    /// item header, in bytes.
    ///
    /// According to the standard, the concrete value size may be undefined,
    /// which can be the case for sequence elements and encapsulated pixel
    /// data.
    fn length(&self) -> Length;

    /// Check whether the value is empty (0 length).
    fn is_empty(&self) -> bool {
        self.length() == Length(0)
    }
}

/// A trait for a data type containing a DICOM header.
pub trait Header: HasLength {
    /// Retrieve the element's tag.
    fn tag(&self) -> Tag;

    /// Check whether this is the header of an item.
    fn is_item(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE000)
    }

    /// Check whether this is the header of an item delimiter.
    fn is_item_delimiter(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE00D)
    }

    /// Check whether this is the header of a sequence delimiter.
    fn is_sequence_delimiter(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE0DD)
    }
}

/// A data structure for a data element header, containing
/// a tag, value representation and specified length.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DataElementHeader {
    /// DICOM tag
    pub tag: Tag,
    /// Value Representation
    pub vr: VR,
    /// Element length
    pub len: Length,
}

impl HasLength for DataElementHeader {
    #[inline]
    fn length(&self) -> Length {
        self.len
    }
}

impl Header for DataElementHeader {
    #[inline]
    fn tag(&self) -> Tag {
        self.tag
    }
}

impl DataElementHeader {
    /// Create a new data element header with the given properties.
    /// This is just a trivial constructor.
    #[inline]
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, len: Length) -> DataElementHeader {
        DataElementHeader {
            tag: tag.into(),
            vr,
            len,
        }
    }

    /// Retrieve the element's value representation.
    #[inline]
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// Check whether the header describes a nested data set:
    /// if the value representation is SQ.
    #[inline]
    pub fn is_non_primitive(&self) -> bool {
        self.vr == VR::SQ
    }
}

/// Data type for describing a sequence item header.
/// If the header represents an item, it will also contain
/// the specified length.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SequenceItemHeader {
    /// The cursor contains an item.
    Item {
        /// the length of the item in bytes (can be 0xFFFFFFFF if undefined)
        len: Length,
    },
    /// The cursor read an item delimiter.
    /// The item ends here and should not be read any further.
    ItemDelimiter,
    /// The cursor read a sequence delimiter.
    /// The sequence ends here and should not be read any further.
    SequenceDelimiter,
}

impl SequenceItemHeader {
    /// Create a sequence item header using the raw properties read from the
    /// stream. An error is raised if the given tag does not relate to a
    /// sequence item, an item delimiter or a sequence delimiter.
    pub fn new<T: Into<Tag>>(tag: T, len: Length) -> Result<SequenceItemHeader> {
        match tag.into() {
            Tag(0xFFFE, 0xE000) => Ok(SequenceItemHeader::Item { len }),
            Tag(0xFFFE, 0xE00D) => {
                // delimiters should not have a positive length
                if len != Length(0) {
                    UnexpectedDelimiterLengthSnafu { len }.fail()
                } else {
                    Ok(SequenceItemHeader::ItemDelimiter)
                }
            }
            Tag(0xFFFE, 0xE0DD) => Ok(SequenceItemHeader::SequenceDelimiter),
            tag => UnexpectedTagSnafu { tag }.fail(),
        }
    }
}

impl HasLength for SequenceItemHeader {
    #[inline]
    fn length(&self) -> Length {
        match *self {
            SequenceItemHeader::Item { len } => len,
            SequenceItemHeader::ItemDelimiter | SequenceItemHeader::SequenceDelimiter => Length(0),
        }
    }
}

impl Header for SequenceItemHeader {
    #[inline]
    fn tag(&self) -> Tag {
        match *self {
            SequenceItemHeader::Item { .. } => Tag(0xFFFE, 0xE000),
            SequenceItemHeader::ItemDelimiter => Tag(0xFFFE, 0xE00D),
            SequenceItemHeader::SequenceDelimiter => Tag(0xFFFE, 0xE0DD),
        }
    }
}

/// A data type that represents and owns a DICOM data element:
/// a tag, a value representation, and the decoded value.
///
/// Once inserted into a locked data set, the element is immutable.
#[derive(Debug, PartialEq, Clone)]
pub struct DataElement {
    header: DataElementHeader,
    value: Value,
}

impl HasLength for DataElement {
    #[inline]
    fn length(&self) -> Length {
        self.header.length()
    }
}

impl Header for DataElement {
    #[inline]
    fn tag(&self) -> Tag {
        self.header.tag()
    }
}

impl DataElement {
    /// Create a data element from the given parts. This method will not check
    /// whether the value representation is compatible with the value.
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, value: Value) -> Self {
        let len = value.size();
        DataElement {
            header: DataElementHeader::new(tag, vr, len),
            value,
        }
    }

    /// Create a primitive data element from the given parts.
    pub fn primitive<T: Into<Tag>>(tag: T, vr: VR, value: PrimitiveValue) -> Self {
        DataElement::new(tag, vr, Value::Primitive(value))
    }

    /// Create a sequence data element from the given item list.
    pub fn sequence<T: Into<Tag>>(tag: T, items: Sequence) -> Self {
        DataElement::new(tag, VR::SQ, Value::Sequence(items))
    }

    /// Retrieve the element's header.
    pub fn header(&self) -> &DataElementHeader {
        &self.header
    }

    /// Retrieve the element's value representation.
    pub fn vr(&self) -> VR {
        self.header.vr()
    }

    /// Retrieve the DICOM value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Move the data element's value out of the element.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Get a single string value,
    /// the first one if the value is multi-valued.
    ///
    /// An error is returned if the value variant is not compatible.
    pub fn string(&self) -> Result<&str, CastValueError> {
        self.value.string()
    }

    /// Get the full sequence of string values.
    ///
    /// An error is returned if the value variant is not compatible.
    pub fn strings(&self) -> Result<&[String], CastValueError> {
        self.value.strings()
    }

    /// Get the nested item sequence of this element.
    ///
    /// An error is returned if the element's value is primitive.
    pub fn items(&self) -> Result<&Sequence, CastValueError> {
        self.value.sequence()
    }
}

macro_rules! impl_element_getters {
    ($name_single: ident, $name_multi: ident, $ret: ty) => {
        /// Get a single value of the requested type,
        /// the first one if the value is multi-valued.
        ///
        /// An error is returned if the value variant is not compatible.
        pub fn $name_single(&self) -> Result<$ret, CastValueError> {
            self.value.$name_single()
        }

        /// Get a sequence of values of the requested type without copying.
        ///
        /// An error is returned if the value variant is not compatible.
        pub fn $name_multi(&self) -> Result<&[$ret], CastValueError> {
            self.value.$name_multi()
        }
    };
}

impl DataElement {
    impl_element_getters!(uint8, uint8_slice, u8);
    impl_element_getters!(uint16, uint16_slice, u16);
    impl_element_getters!(int16, int16_slice, i16);
    impl_element_getters!(uint32, uint32_slice, u32);
    impl_element_getters!(int32, int32_slice, i32);
    impl_element_getters!(uint64, uint64_slice, u64);
    impl_element_getters!(int64, int64_slice, i64);
    impl_element_getters!(float32, float32_slice, f32);
    impl_element_getters!(float64, float64_slice, f64);
}

/// An enum type for a DICOM value representation.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Very Long
    OV,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Signed Very Long
    SV,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Unsigned Very Long
    UV,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OV => "OV",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            SV => "SV",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            UV => "UV",
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    /// The function returns two alphabetic characters in upper case.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_string().as_bytes();
        [bytes[0], bytes[1]]
    }

    /// Whether the explicit encoding of this VR uses a 16-bit length field.
    /// All other VRs carry 2 reserved bytes followed by a 32-bit length.
    pub fn is_short_header(self) -> bool {
        use VR::*;
        matches!(
            self,
            AE | AS | AT | CS | DA | DS | DT | FL | FD | IS | LO | LT | PN | SH | SL | SS | ST
                | TM | UI | UL | US
        )
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two UTF-8 encoded alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OV" => Ok(OV),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "SV" => Ok(SV),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "UV" => Ok(UV),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// The tag is a `(group, element)` pair of 16-bit numbers,
/// which composes the 32-bit identifier `(group << 16) | element`.
/// Both `(u16, u16)` and `[u16; 2]` can be efficiently converted
/// to this type.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialEq<[u16; 2]> for Tag {
    fn eq(&self, other: &[u16; 2]) -> bool {
        self.0 == other[0] && self.1 == other[1]
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// A type for representing data set content length, in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined
/// (unspecified) length, which would have to be determined
/// with a traversal based on the content's encoding.
///
/// This also means that numeric comparisons and arithmetic
/// do not function the same way as primitive number types:
/// two undefined lengths are not equal,
/// and comparing against an undefined length is always `false`.
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Create a new length value from its internal representation.
    /// This is equivalent to `Length(len)`.
    #[inline]
    pub fn new(len: u32) -> Self {
        Length(len)
    }

    /// Create a new length value with the given number of bytes.
    ///
    /// # Panic
    ///
    /// This function will panic if `len` represents an undefined length.
    #[inline]
    pub fn defined(len: u32) -> Self {
        assert_ne!(len, UNDEFINED_LEN);
        Length(len)
    }

    /// Check whether this length is undefined (unknown).
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    /// Returns `None` if it represents an undefined length.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }

    /// Check whether the length is equally specified as another length.
    /// Unlike the implemented `PartialEq`, two undefined lengths are
    /// considered equivalent by this method.
    #[inline]
    pub fn inner_eq(self, other: Length) -> bool {
        self.0 == other.0
    }
}

impl From<u32> for Length {
    #[inline]
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use smallvec::smallvec;

    #[test]
    fn tag_from_u16_pair() {
        let t = Tag::from((0x0010u16, 0x0020u16));
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
    }

    #[test]
    fn tag_ordering_is_ascending() {
        assert!(Tag(0x0008, 0x0060) < Tag(0x0008, 0x103E));
        assert!(Tag(0x0008, 0x103E) < Tag(0x0010, 0x0010));
        assert!(Tag(0x0028, 0x0010) < Tag(0x7FE0, 0x0010));
    }

    #[test]
    fn length_undefined_semantics() {
        assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
        assert!(Length::UNDEFINED.is_undefined());
        assert!(!(Length::UNDEFINED < Length(64)));
        assert!(!(Length::UNDEFINED > Length(64)));
        assert_eq!(Length(16).get(), Some(16));
        assert_eq!(Length::UNDEFINED.get(), None);
        assert!(Length::UNDEFINED.inner_eq(Length(0xFFFF_FFFF)));
    }

    #[test]
    fn vr_round_trip() {
        assert_eq!(VR::from_binary([b'O', b'B']), Some(VR::OB));
        assert_eq!(VR::from_binary([b'U', b'I']), Some(VR::UI));
        assert_eq!(VR::from_binary([b'z', b'z']), None);
        assert_eq!(VR::CS.to_bytes(), [b'C', b'S']);
        assert_eq!("SQ".parse(), Ok(VR::SQ));
    }

    #[test]
    fn vr_header_form() {
        assert!(VR::US.is_short_header());
        assert!(VR::UI.is_short_header());
        assert!(VR::LT.is_short_header());
        assert!(!VR::OB.is_short_header());
        assert!(!VR::UT.is_short_header());
        assert!(!VR::SQ.is_short_header());
        assert!(!VR::SV.is_short_header());
        assert!(!VR::UV.is_short_header());
    }

    #[test]
    fn item_header_validation() {
        let h = SequenceItemHeader::new(Tag(0xFFFE, 0xE000), Length(24)).unwrap();
        assert!(h.is_item());
        assert_eq!(h.length(), Length(24));

        let h = SequenceItemHeader::new(Tag(0xFFFE, 0xE00D), Length(0)).unwrap();
        assert!(h.is_item_delimiter());

        let h = SequenceItemHeader::new(Tag(0xFFFE, 0xE0DD), Length(0)).unwrap();
        assert!(h.is_sequence_delimiter());

        assert!(SequenceItemHeader::new(Tag(0x0008, 0x0060), Length(4)).is_err());
        assert!(SequenceItemHeader::new(Tag(0xFFFE, 0xE00D), Length(2)).is_err());
    }

    #[test]
    fn element_getters() {
        let element = DataElement::primitive(
            Tag(0x0028, 0x0010),
            VR::US,
            PrimitiveValue::U16(smallvec![64]),
        );
        assert_eq!(element.tag(), Tag(0x0028, 0x0010));
        assert_eq!(element.vr(), VR::US);
        assert_eq!(element.uint16().unwrap(), 64);
        assert_eq!(element.uint16_slice().unwrap(), &[64]);
        assert!(element.string().is_err());
    }
}

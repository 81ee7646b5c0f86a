//! Reading of whole data elements,
//! including the recursive descent into sequence items.

use crate::stateful::decode::{self, StatefulDecoder};
use dcmio_core::dataset::{DataSet, Sequence};
use dcmio_core::dictionary::tags;
use dcmio_core::header::{DataElementHeader, Length, SequenceItemHeader, Tag, VR};
use dcmio_core::DataElement;
use dcmio_encoding::decode::Decode;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{Read, Seek};
use tracing::debug;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not decode value of element {}", tag))]
    DecodeValue {
        tag: Tag,
        #[snafu(backtrace)]
        source: decode::Error,
    },

    #[snafu(display("Could not read item #{} of sequence {}", index, tag))]
    ReadItem {
        tag: Tag,
        index: usize,
        #[snafu(backtrace)]
        source: decode::Error,
    },

    #[snafu(display(
        "Unexpected item delimiter in the body of sequence {} at item #{}",
        tag,
        index
    ))]
    UnexpectedItemDelimiter {
        tag: Tag,
        index: usize,
        backtrace: Backtrace,
    },

    #[snafu(display("Could not insert element {} into the data set", tag))]
    InsertElement {
        tag: Tag,
        #[snafu(backtrace)]
        source: dcmio_core::dataset::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Read the value portion of a data element
/// whose header was already decoded,
/// and construct the full element.
///
/// Sequence elements trigger a recursive descent into their items;
/// all other value representations are read as primitive values.
pub fn read_element<D, S>(
    parser: &mut StatefulDecoder<D, S>,
    header: DataElementHeader,
) -> Result<DataElement>
where
    D: Decode,
    S: Read + Seek,
{
    debug!("read data element {} {}", header.tag, header.vr);
    if header.vr() == VR::SQ {
        let items = read_sequence(parser, header.tag, header.len)?;
        Ok(DataElement::sequence(header.tag, items))
    } else {
        let value = parser
            .read_value(&header)
            .context(DecodeValueSnafu { tag: header.tag })?;
        Ok(DataElement::primitive(header.tag, header.vr, value))
    }
}

/// Read the items of a sequence element.
///
/// A sequence of defined length consumes exactly that number of bytes
/// of nested items; a sequence of undefined length consumes items until
/// the Sequence Delimitation Item.
fn read_sequence<D, S>(parser: &mut StatefulDecoder<D, S>, tag: Tag, len: Length) -> Result<Sequence>
where
    D: Decode,
    S: Read + Seek,
{
    let mut items = Sequence::new();
    if len == Length(0) {
        items.lock();
        return Ok(items);
    }
    if len.is_undefined() {
        debug!("sequence {} has undefined length", tag);
    } else {
        debug!("sequence {} has defined length {}", tag, len);
    }

    let base = parser.position();
    let mut index = 0;
    loop {
        if let Some(len) = len.get() {
            if parser.position() - base >= u64::from(len) {
                break;
            }
        }
        let item_header = parser
            .decode_item_header()
            .context(ReadItemSnafu { tag, index })?;
        match item_header {
            SequenceItemHeader::SequenceDelimiter => {
                debug!("stop reading sequence {}, found its delimiter", tag);
                break;
            }
            SequenceItemHeader::ItemDelimiter => {
                return UnexpectedItemDelimiterSnafu { tag, index }.fail();
            }
            SequenceItemHeader::Item { len } => {
                let item = read_item(parser, tag, index, len)?;
                items.append(item).context(InsertElementSnafu { tag })?;
            }
        }
        index += 1;
    }
    items.lock();
    Ok(items)
}

/// Read the data set of a single sequence item.
///
/// Items of defined length are byte-counted only;
/// items of undefined length end at the Item Delimitation Item,
/// which requires peeking the next tag at each element boundary
/// and rewinding when it is not the delimiter.
fn read_item<D, S>(
    parser: &mut StatefulDecoder<D, S>,
    tag: Tag,
    index: usize,
    len: Length,
) -> Result<DataSet>
where
    D: Decode,
    S: Read + Seek,
{
    debug!("read item #{} of sequence {}, length {}", index, tag, len);
    let mut set = DataSet::new();
    if let Some(len) = len.get() {
        let base = parser.position();
        while parser.position() - base < u64::from(len) {
            let header = parser
                .decode_header()
                .context(ReadItemSnafu { tag, index })?;
            let element = read_element(parser, header)?;
            let elem_tag = element.header().tag;
            set.insert(element)
                .context(InsertElementSnafu { tag: elem_tag })?;
        }
    } else {
        loop {
            let next = parser.decode_tag().context(ReadItemSnafu { tag, index })?;
            if next == tags::ITEM_DELIMITER {
                // consume the delimiter's length field
                parser
                    .skip_bytes(4)
                    .context(ReadItemSnafu { tag, index })?;
                break;
            }
            parser.rewind(4).context(ReadItemSnafu { tag, index })?;
            let header = parser
                .decode_header()
                .context(ReadItemSnafu { tag, index })?;
            let element = read_element(parser, header)?;
            let elem_tag = element.header().tag;
            set.insert(element)
                .context(InsertElementSnafu { tag: elem_tag })?;
        }
    }
    set.lock();
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_core::header::Header;
    use dcmio_encoding::decode::{ExplicitVRLittleEndianDecoder, ImplicitVRLittleEndianDecoder};
    use std::io::Cursor;

    fn explicit_parser(
        data: &[u8],
    ) -> StatefulDecoder<ExplicitVRLittleEndianDecoder, Cursor<&[u8]>> {
        StatefulDecoder::new_with_position(
            Cursor::new(data),
            ExplicitVRLittleEndianDecoder::default(),
            0,
        )
    }

    // A sequence of undefined length with two items,
    // each of undefined length, ended by delimiters:
    //
    // (0008,1140) ReferencedImageSequence ; SQ ; undefined length
    //   (FFFE,E000) Item ; undefined length
    //     (0008,1155) ReferencedSOPInstanceUID ; UI ; "1.2.3.4\0"
    //   (FFFE,E00D) Item Delimitation Item
    //   (FFFE,E000) Item ; undefined length
    //     (0008,1155) ReferencedSOPInstanceUID ; UI ; "5.6.7.8\0"
    //   (FFFE,E00D) Item Delimitation Item
    // (FFFE,E0DD) Sequence Delimitation Item
    const RAW_SEQUENCE_UNDEFINED: &[u8] = &[
        0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
        0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, //
        0x08, 0x00, 0x55, 0x11, b'U', b'I', 0x08, 0x00, b'1', b'.', b'2', b'.', b'3', b'.', b'4',
        0x00, //
        0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, //
        0x08, 0x00, 0x55, 0x11, b'U', b'I', 0x08, 0x00, b'5', b'.', b'6', b'.', b'7', b'.', b'8',
        0x00, //
        0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00, //
    ];

    #[test]
    fn read_sequence_with_undefined_lengths() {
        let mut parser = explicit_parser(RAW_SEQUENCE_UNDEFINED);
        let header = parser.decode_header().unwrap();
        assert_eq!(header.vr(), VR::SQ);
        let element = read_element(&mut parser, header).unwrap();

        let items = element.items().unwrap();
        assert!(items.is_locked());
        assert_eq!(items.len(), 2);
        let item0 = items.item(0).unwrap();
        assert!(item0.is_locked());
        assert_eq!(
            item0
                .element(Tag(0x0008, 0x1155))
                .unwrap()
                .string()
                .unwrap(),
            "1.2.3.4\0"
        );
        let item1 = items.item(1).unwrap();
        assert_eq!(
            item1
                .element(Tag(0x0008, 0x1155))
                .unwrap()
                .string()
                .unwrap(),
            "5.6.7.8\0"
        );
        assert_eq!(parser.position(), RAW_SEQUENCE_UNDEFINED.len() as u64);
    }

    // The same sequence with defined lengths everywhere:
    // sequence length 40, each item of defined length 16.
    const RAW_SEQUENCE_DEFINED: &[u8] = &[
        0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0x00, 0x00, 0x30, 0x00, 0x00, 0x00, //
        0xFE, 0xFF, 0x00, 0xE0, 0x10, 0x00, 0x00, 0x00, //
        0x08, 0x00, 0x55, 0x11, b'U', b'I', 0x08, 0x00, b'1', b'.', b'2', b'.', b'3', b'.', b'4',
        0x00, //
        0xFE, 0xFF, 0x00, 0xE0, 0x10, 0x00, 0x00, 0x00, //
        0x08, 0x00, 0x55, 0x11, b'U', b'I', 0x08, 0x00, b'5', b'.', b'6', b'.', b'7', b'.', b'8',
        0x00, //
    ];

    #[test]
    fn read_sequence_with_defined_lengths() {
        let mut parser = explicit_parser(RAW_SEQUENCE_DEFINED);
        let header = parser.decode_header().unwrap();
        assert_eq!(header.len, Length(0x30));
        let element = read_element(&mut parser, header).unwrap();

        let items = element.items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items
                .item(1)
                .unwrap()
                .element(Tag(0x0008, 0x1155))
                .unwrap()
                .string()
                .unwrap(),
            "5.6.7.8\0"
        );
        assert_eq!(parser.position(), RAW_SEQUENCE_DEFINED.len() as u64);
    }

    // A sequence two levels deep, all with undefined lengths:
    //
    // (0008,9215) DerivationCodeSequence ; SQ
    //   (FFFE,E000) Item
    //     (0008,0060) Modality ; CS ; "MR"
    //     (0008,1140) ReferencedImageSequence ; SQ
    //       (FFFE,E000) Item
    //         (0008,1155) ReferencedSOPInstanceUID ; UI ; "1.2\0"
    //       (FFFE,E00D)
    //     (FFFE,E0DD)
    //   (FFFE,E00D)
    // (FFFE,E0DD)
    const RAW_SEQUENCE_NESTED: &[u8] = &[
        0x08, 0x00, 0x15, 0x92, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
        0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, //
        0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'M', b'R', //
        0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
        0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, //
        0x08, 0x00, 0x55, 0x11, b'U', b'I', 0x04, 0x00, b'1', b'.', b'2', 0x00, //
        0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00, //
    ];

    #[test]
    fn read_nested_sequences_two_levels_deep() {
        let mut parser = explicit_parser(RAW_SEQUENCE_NESTED);
        let header = parser.decode_header().unwrap();
        let element = read_element(&mut parser, header).unwrap();
        assert_eq!(element.tag(), Tag(0x0008, 0x9215));

        let outer = element.items().unwrap();
        assert_eq!(outer.len(), 1);
        let item = outer.item(0).unwrap();
        assert_eq!(
            item.element(Tag(0x0008, 0x0060)).unwrap().string().unwrap(),
            "MR"
        );
        let inner = item
            .element(Tag(0x0008, 0x1140))
            .unwrap()
            .items()
            .unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(
            inner
                .item(0)
                .unwrap()
                .element(Tag(0x0008, 0x1155))
                .unwrap()
                .string()
                .unwrap(),
            "1.2\0"
        );
        assert_eq!(parser.position(), RAW_SEQUENCE_NESTED.len() as u64);
    }

    #[test]
    fn read_empty_sequence() {
        // (0008,1140) with defined length 0
        const RAW: &[u8] = &[
            0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let mut parser = explicit_parser(RAW);
        let header = parser.decode_header().unwrap();
        let element = read_element(&mut parser, header).unwrap();
        let items = element.items().unwrap();
        assert!(items.is_empty());
        assert!(items.is_locked());
    }

    #[test]
    fn non_item_tag_in_sequence_body_fails() {
        // sequence of undefined length followed by a plain element header
        const RAW: &[u8] = &[
            0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
            0x08, 0x00, 0x60, 0x00, 0x02, 0x00, 0x00, 0x00, b'M', b'R',
        ];
        let mut parser = explicit_parser(RAW);
        let header = parser.decode_header().unwrap();
        let err = read_element(&mut parser, header).unwrap_err();
        assert!(matches!(err, Error::ReadItem { index: 0, .. }));
    }

    #[test]
    fn implicit_vr_sequences_read_through_the_dictionary() {
        // (0008,1140) ReferencedImageSequence in implicit VR,
        // undefined length, one item with a single UI element
        const RAW: &[u8] = &[
            0x08, 0x00, 0x40, 0x11, 0xFF, 0xFF, 0xFF, 0xFF, //
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, //
            0x08, 0x00, 0x55, 0x11, 0x04, 0x00, 0x00, 0x00, b'1', b'.', b'2', 0x00, //
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        ];
        let mut parser = StatefulDecoder::new_with_position(
            Cursor::new(RAW),
            ImplicitVRLittleEndianDecoder::default(),
            0,
        );
        let header = parser.decode_header().unwrap();
        assert_eq!(header.vr(), VR::SQ);
        let element = read_element(&mut parser, header).unwrap();
        let items = element.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items
                .item(0)
                .unwrap()
                .element(Tag(0x0008, 0x1155))
                .unwrap()
                .string()
                .unwrap(),
            "1.2\0"
        );
    }
}

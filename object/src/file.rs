//! Module containing the DICOM file handle and its reading process:
//! the preamble handshake, the file meta information group,
//! the main data set, and the offset tables over the pixel data.

use crate::pixeldata::{read_num_frames, BasicOffsetTable, Frame, PixelDescription};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use dcmio_core::dataset::DataSet;
use dcmio_core::dictionary::tags;
use dcmio_core::header::Header;
use dcmio_core::value::CastValueError;
use dcmio_core::{SequenceItemHeader, Tag};
use dcmio_encoding::decode::{
    Decode, ExplicitVRLittleEndianDecoder, ImplicitVRLittleEndianDecoder,
};
use dcmio_encoding::transfer_syntax;
use dcmio_parser::dataset::read::{self as dataset_read, read_element};
use dcmio_parser::stateful::decode::{self as stateful, StatefulDecoder};
use snafu::{ensure, Backtrace, IntoError, OptionExt, ResultExt, Snafu};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

const DICM_MAGIC_CODE: [u8; 4] = [b'D', b'I', b'C', b'M'];
const PREAMBLE_LENGTH: u64 = 128;

/// Module-level error type:
/// for everything which may go wrong in the file reading process.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not open file: {}", source))]
    OpenFile {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Could not read from file: {}", source))]
    ReadFile {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Could not move file cursor to position {}: {}", position, source))]
    SeekFile {
        position: u64,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The file is too short or the `DICM` prefix is missing.
    #[snafu(display("Not a DICOM file"))]
    NotADicomFile { backtrace: Backtrace },

    #[snafu(display("Could not decode element header: {}", source))]
    DecodeElement {
        #[snafu(backtrace)]
        source: stateful::Error,
    },

    #[snafu(display("Could not read data element: {}", source))]
    ParseElement {
        #[snafu(backtrace)]
        source: dataset_read::Error,
    },

    #[snafu(display("Could not insert element {} into the data set", tag))]
    InsertElement {
        tag: Tag,
        #[snafu(backtrace)]
        source: dcmio_core::dataset::Error,
    },

    #[snafu(display("Expected element {}, found {}", expected, got))]
    UnexpectedElement {
        expected: Tag,
        got: Tag,
        backtrace: Backtrace,
    },

    #[snafu(display("Unexpected tag {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },

    #[snafu(display("Encountered File Meta Information group in the main data set"))]
    UnexpectedFileMetaGroup { tag: Tag, backtrace: Backtrace },

    #[snafu(display("Missing required element {}", tag))]
    MissingElement { tag: Tag, backtrace: Backtrace },

    #[snafu(display("Could not retrieve value of element {}: {}", tag, source))]
    RetrieveValue {
        tag: Tag,
        source: CastValueError,
        backtrace: Backtrace,
    },

    #[snafu(display("Malformed Number of Frames value `{}`", value))]
    InvalidNumberOfFrames { value: String, backtrace: Backtrace },

    #[snafu(display(
        "Transfer syntax {} is not encapsulated and shall not contain an offset table",
        uid
    ))]
    NotEncapsulated { uid: String, backtrace: Backtrace },

    /// The transfer syntax is not known yet.
    /// The file meta group must be read first.
    #[snafu(display("The File Meta Information has not been read yet"))]
    NoFileMeta { backtrace: Backtrace },

    /// The offset of the pixel data element is not known yet.
    /// The metadata must be read first.
    #[snafu(display("Could not determine the offset of the Pixel Data element"))]
    NoPixelDataOffset { backtrace: Backtrace },

    /// The stored Basic Offset Table is empty and the data set
    /// carries no Extended Offset Table.
    #[snafu(display("The file has no offset table"))]
    NoOffsetTable { backtrace: Backtrace },

    #[snafu(display("The offset table is corrupted"))]
    BrokenOffsetTable { backtrace: Backtrace },

    #[snafu(display("Unexpected item of undefined length"))]
    UndefinedItemLength { backtrace: Backtrace },

    #[snafu(display("Found {} frame items, expected {}", got, expected))]
    WrongNumberOfFrameItems {
        got: usize,
        expected: u32,
        backtrace: Backtrace,
    },

    /// Frame numbers are 1-based.
    #[snafu(display("Frame number must be positive"))]
    FrameNumberZero { backtrace: Backtrace },

    #[snafu(display("Frame number {} is out of range ({} frames)", number, num_frames))]
    FrameNumberOutOfRange {
        number: u32,
        num_frames: u32,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A handle over a DICOM Part 10 file.
///
/// The handle tracks the source position state of the reading process:
/// the byte offset of the main data set (the end of the file meta
/// group), the transfer syntax declared by the file meta group, and
/// the byte offset of the pixel data element header once the metadata
/// has been read.
#[derive(Debug)]
pub struct DicomFile<S> {
    source: S,
    /// absolute offset of the start of the main data set,
    /// 0 while the file meta group has not been read
    offset: u64,
    /// owned copy of the Transfer Syntax UID, trimmed of padding
    transfer_syntax_uid: Option<String>,
    /// absolute offset of the pixel data element header
    pixel_data_offset: Option<u64>,
}

impl DicomFile<BufReader<File>> {
    /// Open the DICOM file at the given path for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).context(OpenFileSnafu)?;
        Ok(DicomFile::from_source(BufReader::new(file)))
    }
}

impl<S> DicomFile<S>
where
    S: Read + Seek,
{
    /// Create a DICOM file handle over an arbitrary byte source.
    pub fn from_source(source: S) -> Self {
        DicomFile {
            source,
            offset: 0,
            transfer_syntax_uid: None,
            pixel_data_offset: None,
        }
    }

    /// Retrieve the Transfer Syntax UID captured from the file meta group,
    /// if it was read already.
    pub fn transfer_syntax_uid(&self) -> Option<&str> {
        self.transfer_syntax_uid.as_deref()
    }

    /// Read the File Meta Information group.
    ///
    /// This consumes the 128-byte preamble, checks the `DICM` prefix,
    /// and reads the group 0x0002 data set, which is always encoded
    /// in Explicit VR Little Endian. The Transfer Syntax UID is
    /// captured on the file handle for the subsequent reading steps.
    pub fn read_file_meta(&mut self) -> Result<DataSet> {
        self.source
            .seek(SeekFrom::Start(0))
            .context(SeekFileSnafu { position: 0u64 })?;

        // file preamble, no validation
        let mut preamble = [0u8; PREAMBLE_LENGTH as usize];
        self.source
            .read_exact(&mut preamble)
            .map_err(map_short_read)?;

        // DICM prefix
        let mut magic = [0u8; 4];
        self.source.read_exact(&mut magic).map_err(map_short_read)?;
        ensure!(magic == DICM_MAGIC_CODE, NotADicomFileSnafu);

        let mut parser = StatefulDecoder::new_with_position(
            &mut self.source,
            ExplicitVRLittleEndianDecoder::default(),
            PREAMBLE_LENGTH + 4,
        );

        let mut file_meta = DataSet::new();

        // (0002,0000) File Meta Information Group Length:
        // its value is the byte count of the remaining group elements
        let header = parser.decode_header().context(DecodeElementSnafu)?;
        ensure!(
            header.tag() == tags::FILE_META_INFORMATION_GROUP_LENGTH,
            UnexpectedElementSnafu {
                expected: tags::FILE_META_INFORMATION_GROUP_LENGTH,
                got: header.tag(),
            }
        );
        let value = parser.read_value(&header).context(DecodeElementSnafu)?;
        let group_length = value.uint32().context(RetrieveValueSnafu {
            tag: tags::FILE_META_INFORMATION_GROUP_LENGTH,
        })?;
        let base = parser.position();

        // (0002,0001) File Meta Information Version
        let header = parser.decode_header().context(DecodeElementSnafu)?;
        ensure!(
            header.tag() == tags::FILE_META_INFORMATION_VERSION,
            UnexpectedElementSnafu {
                expected: tags::FILE_META_INFORMATION_VERSION,
                got: header.tag(),
            }
        );
        parser.read_value(&header).context(DecodeElementSnafu)?;

        while parser.position() - base < u64::from(group_length) {
            let header = parser.decode_header().context(DecodeElementSnafu)?;
            if header.tag().group() != 0x0002 {
                // the group ended early despite the declared group length;
                // the header is discarded and reading resumes at the
                // position recorded below
                debug!(
                    "stop reading file meta group, found element {}",
                    header.tag()
                );
                break;
            }
            let element = read_element(&mut parser, header).context(ParseElementSnafu)?;
            let tag = element.tag();
            file_meta
                .insert(element)
                .context(InsertElementSnafu { tag })?;
        }

        self.offset = parser.position();

        let ts_element = file_meta
            .get(tags::TRANSFER_SYNTAX_UID)
            .context(MissingElementSnafu {
                tag: tags::TRANSFER_SYNTAX_UID,
            })?;
        let uid = ts_element.string().context(RetrieveValueSnafu {
            tag: tags::TRANSFER_SYNTAX_UID,
        })?;
        self.transfer_syntax_uid = Some(transfer_syntax::trim_uid(uid).to_owned());

        file_meta.lock();
        Ok(file_meta)
    }

    /// Read the main data set of the file.
    ///
    /// Reading stops at the end of the file,
    /// at the Data Set Trailing Padding element,
    /// or at any of the pixel data elements,
    /// whose header offset is then recorded on the file handle
    /// for the frame reading operations.
    pub fn read_metadata(&mut self) -> Result<DataSet> {
        if self.offset == 0 {
            self.read_file_meta()?;
        }
        self.source
            .seek(SeekFrom::Start(self.offset))
            .context(SeekFileSnafu {
                position: self.offset,
            })?;

        let implicit = self
            .transfer_syntax_uid
            .as_deref()
            .map(transfer_syntax::is_implicit_vr)
            .unwrap_or(false);
        if implicit {
            self.read_metadata_with(ImplicitVRLittleEndianDecoder::default())
        } else {
            self.read_metadata_with(ExplicitVRLittleEndianDecoder::default())
        }
    }

    fn read_metadata_with<D: Decode>(&mut self, decoder: D) -> Result<DataSet> {
        let mut parser = StatefulDecoder::new_with_position(&mut self.source, decoder, self.offset);
        let mut dataset = DataSet::new();

        loop {
            if parser.is_at_end().context(DecodeElementSnafu)? {
                info!("stop reading data set, reached end of file");
                break;
            }

            let header_start = parser.position();
            let header = parser.decode_header().context(DecodeElementSnafu)?;
            let tag = header.tag();

            if tag == tags::DATA_SET_TRAILING_PADDING {
                debug!("stop reading data set, found the trailing padding");
                break;
            }
            if is_pixel_data_tag(tag) {
                // rewind over the just-read header so that the recorded
                // offset points at its first byte
                self.pixel_data_offset = Some(header_start);
                debug!("stop reading data set, found pixel data element {}", tag);
                break;
            }
            ensure!(
                tag.group() != 0x0002,
                UnexpectedFileMetaGroupSnafu { tag }
            );

            let element = read_element(&mut parser, header).context(ParseElementSnafu)?;
            dataset
                .insert(element)
                .context(InsertElementSnafu { tag })?;
        }

        dataset.lock();
        Ok(dataset)
    }

    /// Read the Basic Offset Table stored in an encapsulated
    /// pixel data element.
    ///
    /// If the stored table is empty, the Extended Offset Table
    /// element of the data set is consulted instead;
    /// with neither present, the operation fails with
    /// [`Error::NoOffsetTable`] and the table must be built
    /// with [`build_bot`](Self::build_bot).
    pub fn read_bot(&mut self, metadata: &DataSet) -> Result<BasicOffsetTable> {
        debug!("reading basic offset table");

        let uid = self.require_transfer_syntax()?;
        ensure!(
            transfer_syntax::is_encapsulated(&uid),
            NotEncapsulatedSnafu { uid }
        );

        let num_frames = read_num_frames(metadata)?;
        let pixel_data_offset = self.pixel_data_offset.context(NoPixelDataOffsetSnafu)?;
        let mut parser = self.parser_at(pixel_data_offset)?;

        let header = parser.decode_header().context(DecodeElementSnafu)?;
        ensure!(
            is_pixel_data_tag(header.tag()),
            UnexpectedTagSnafu { tag: header.tag() }
        );

        // the header of the BOT item; it must be present,
        // but its value is optional
        let item_len = decode_frame_item_header(&mut parser)?;
        if item_len > 0 {
            info!("read basic offset table value");
            let mut offsets32 = Vec::with_capacity(num_frames as usize);
            parser
                .read_u32_to_vec(4 * num_frames, &mut offsets32)
                .context(DecodeElementSnafu)?;
            let item_word = (u32::from(tags::ITEM.group()) << 16) | u32::from(tags::ITEM.element());
            ensure!(
                offsets32.iter().all(|&offset| offset != item_word),
                BrokenOffsetTableSnafu
            );
            return Ok(BasicOffsetTable::new(
                offsets32.into_iter().map(u64::from).collect(),
            ));
        }

        info!("basic offset table is empty");
        // fall back to the Extended Offset Table attribute
        match metadata.get(tags::EXTENDED_OFFSET_TABLE) {
            Some(eot_element) => {
                info!("found extended offset table");
                let blob = eot_element.uint8_slice().context(RetrieveValueSnafu {
                    tag: tags::EXTENDED_OFFSET_TABLE,
                })?;
                ensure!(
                    blob.len() >= num_frames as usize * 8,
                    BrokenOffsetTableSnafu
                );
                let offsets = blob
                    .chunks_exact(8)
                    .take(num_frames as usize)
                    .map(LittleEndian::read_u64)
                    .collect();
                Ok(BasicOffsetTable::new(offsets))
            }
            None => NoOffsetTableSnafu.fail(),
        }
    }

    /// Build a Basic Offset Table by scanning the pixel data element.
    ///
    /// For an encapsulated transfer syntax, the BOT item's value is
    /// skipped and the sibling frame items are walked up to the
    /// sequence delimiter, recording each item's position relative to
    /// the end of the BOT value. For a native transfer syntax, the
    /// offsets are computed from the pixel descriptor.
    pub fn build_bot(&mut self, metadata: &DataSet) -> Result<BasicOffsetTable> {
        debug!("building basic offset table");

        let uid = self.require_transfer_syntax()?;
        let num_frames = read_num_frames(metadata)?;
        let pixel_data_offset = self.pixel_data_offset.context(NoPixelDataOffsetSnafu)?;
        let mut parser = self.parser_at(pixel_data_offset)?;

        let header = parser.decode_header().context(DecodeElementSnafu)?;
        ensure!(
            is_pixel_data_tag(header.tag()),
            UnexpectedTagSnafu { tag: header.tag() }
        );

        if !transfer_syntax::is_encapsulated(&uid) {
            let desc = PixelDescription::from_metadata(metadata)?;
            let frame_len = desc.frame_byte_length() as u64;
            let offsets = (0..u64::from(num_frames)).map(|i| i * frame_len).collect();
            return Ok(BasicOffsetTable::new(offsets));
        }

        // skip the value of the BOT item, which may be zero-length
        let bot_len = decode_frame_item_header(&mut parser)?;
        parser.skip_bytes(bot_len).context(DecodeElementSnafu)?;

        let mut offsets = Vec::with_capacity(num_frames as usize);
        let mut relative_offset = 0u64;
        loop {
            let item = parser.decode_item_header().context(DecodeElementSnafu)?;
            match item {
                SequenceItemHeader::SequenceDelimiter => break,
                SequenceItemHeader::ItemDelimiter => {
                    return UnexpectedTagSnafu {
                        tag: tags::ITEM_DELIMITER,
                    }
                    .fail();
                }
                SequenceItemHeader::Item { len } => {
                    let len = len.get().context(UndefinedItemLengthSnafu)?;
                    offsets.push(relative_offset);
                    relative_offset += 8 + u64::from(len);
                    parser.skip_bytes(len).context(DecodeElementSnafu)?;
                }
            }
        }
        ensure!(
            offsets.len() == num_frames as usize,
            WrongNumberOfFrameItemsSnafu {
                got: offsets.len(),
                expected: num_frames,
            }
        );

        Ok(BasicOffsetTable::new(offsets))
    }

    /// Read a single frame of the pixel data element.
    ///
    /// `number` is 1-based. For an encapsulated transfer syntax the
    /// returned buffer holds the still-compressed frame item value;
    /// decompression is up to the caller, guided by the frame's
    /// transfer syntax UID.
    pub fn read_frame(
        &mut self,
        metadata: &DataSet,
        bot: &BasicOffsetTable,
        number: u32,
    ) -> Result<Frame> {
        debug!("read frame item #{}", number);
        ensure!(number != 0, FrameNumberZeroSnafu);
        let num_frames = bot.num_frames();
        let frame_offset = bot.frame_offset(number).context(FrameNumberOutOfRangeSnafu {
            number,
            num_frames,
        })?;

        let uid = self.require_transfer_syntax()?;
        let encapsulated = transfer_syntax::is_encapsulated(&uid);
        let pixel_data_offset = self.pixel_data_offset.context(NoPixelDataOffsetSnafu)?;

        // the distance from the pixel data element header
        // to the first byte of the first frame item
        let first_frame_offset: u64 = if encapsulated {
            12 + 8 + 4 * u64::from(num_frames)
        } else {
            10
        };
        let total_offset = pixel_data_offset + first_frame_offset + frame_offset;

        let desc = PixelDescription::from_metadata(metadata)?;
        let mut parser = self.parser_at(total_offset)?;

        let length = if encapsulated {
            decode_frame_item_header(&mut parser)?
        } else {
            desc.frame_byte_length()
        };

        let mut data = Vec::with_capacity(length as usize);
        parser
            .read_to_vec(length, &mut data)
            .context(DecodeElementSnafu)?;

        Ok(Frame::new(number, data, &desc, uid))
    }

    fn require_transfer_syntax(&self) -> Result<String> {
        self.transfer_syntax_uid.clone().context(NoFileMetaSnafu)
    }

    fn parser_at(
        &mut self,
        position: u64,
    ) -> Result<StatefulDecoder<ExplicitVRLittleEndianDecoder, &mut S>> {
        self.source
            .seek(SeekFrom::Start(position))
            .context(SeekFileSnafu { position })?;
        Ok(StatefulDecoder::new_with_position(
            &mut self.source,
            ExplicitVRLittleEndianDecoder::default(),
            position,
        ))
    }
}

/// Whether the tag identifies one of the three pixel data elements.
fn is_pixel_data_tag(tag: Tag) -> bool {
    tag == tags::PIXEL_DATA || tag == tags::FLOAT_PIXEL_DATA || tag == tags::DOUBLE_FLOAT_PIXEL_DATA
}

/// Decode an item header which must be a plain item
/// with a defined length, and return that length.
fn decode_frame_item_header<D, S>(parser: &mut StatefulDecoder<D, S>) -> Result<u32>
where
    D: Decode,
    S: Read + Seek,
{
    let item = parser.decode_item_header().context(DecodeElementSnafu)?;
    match item {
        SequenceItemHeader::Item { len } => len.get().context(UndefinedItemLengthSnafu),
        other => UnexpectedTagSnafu { tag: other.tag() }.fail(),
    }
}

fn map_short_read(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        NotADicomFileSnafu.build()
    } else {
        ReadFileSnafu.into_error(e)
    }
}

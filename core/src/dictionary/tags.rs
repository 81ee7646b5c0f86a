//! Tag constants and the standard attribute table.
//!
//! The table is a compact cut of the standard data dictionary:
//! the file meta group, the common patient/study/series/instance
//! attributes, the image pixel module, and the pixel data variants.
//! Unlisted attributes decode with VR `UN` in implicit mode.

use super::DictionaryEntryRef;
use crate::header::{Tag, VR};

/// Item bracket (FFFE,E000)
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/// Item Delimitation Item (FFFE,E00D)
pub const ITEM_DELIMITER: Tag = Tag(0xFFFE, 0xE00D);
/// Sequence Delimitation Item (FFFE,E0DD)
pub const SEQUENCE_DELIMITER: Tag = Tag(0xFFFE, 0xE0DD);

/// File Meta Information Group Length (0002,0000)
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// File Meta Information Version (0002,0001)
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// Media Storage SOP Class UID (0002,0002)
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// Media Storage SOP Instance UID (0002,0003)
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// Transfer Syntax UID (0002,0010)
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Implementation Class UID (0002,0012)
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);

/// Specific Character Set (0008,0005)
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// SOP Class UID (0008,0016)
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// SOP Instance UID (0008,0018)
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// Modality (0008,0060)
pub const MODALITY: Tag = Tag(0x0008, 0x0060);

/// Patient's Name (0010,0010)
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);

/// Samples per Pixel (0028,0002)
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
/// Photometric Interpretation (0028,0004)
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/// Planar Configuration (0028,0006)
pub const PLANAR_CONFIGURATION: Tag = Tag(0x0028, 0x0006);
/// Number of Frames (0028,0008)
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
/// Rows (0028,0010)
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns (0028,0011)
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// Bits Allocated (0028,0100)
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// Bits Stored (0028,0101)
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
/// High Bit (0028,0102)
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/// Pixel Representation (0028,0103)
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);

/// Extended Offset Table (7FE0,0001)
pub const EXTENDED_OFFSET_TABLE: Tag = Tag(0x7FE0, 0x0001);
/// Float Pixel Data (7FE0,0008)
pub const FLOAT_PIXEL_DATA: Tag = Tag(0x7FE0, 0x0008);
/// Double Float Pixel Data (7FE0,0009)
pub const DOUBLE_FLOAT_PIXEL_DATA: Tag = Tag(0x7FE0, 0x0009);
/// Pixel Data (7FE0,0010)
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Data Set Trailing Padding (FFFC,FFFC)
pub const DATA_SET_TRAILING_PADDING: Tag = Tag(0xFFFC, 0xFFFC);

/// The full attribute table known to this dictionary.
pub static ENTRIES: &[DictionaryEntryRef<'static>] = &[
    DictionaryEntryRef { tag: Tag(0x0002, 0x0000), alias: "FileMetaInformationGroupLength", vr: VR::UL },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0001), alias: "FileMetaInformationVersion", vr: VR::OB },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0002), alias: "MediaStorageSOPClassUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0003), alias: "MediaStorageSOPInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0010), alias: "TransferSyntaxUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0012), alias: "ImplementationClassUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0013), alias: "ImplementationVersionName", vr: VR::SH },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0016), alias: "SourceApplicationEntityTitle", vr: VR::AE },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0100), alias: "PrivateInformationCreatorUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0002, 0x0102), alias: "PrivateInformation", vr: VR::OB },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0005), alias: "SpecificCharacterSet", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0008), alias: "ImageType", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0016), alias: "SOPClassUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0018), alias: "SOPInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0020), alias: "StudyDate", vr: VR::DA },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0021), alias: "SeriesDate", vr: VR::DA },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0022), alias: "AcquisitionDate", vr: VR::DA },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0023), alias: "ContentDate", vr: VR::DA },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0030), alias: "StudyTime", vr: VR::TM },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0031), alias: "SeriesTime", vr: VR::TM },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0032), alias: "AcquisitionTime", vr: VR::TM },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0033), alias: "ContentTime", vr: VR::TM },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0050), alias: "AccessionNumber", vr: VR::SH },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0060), alias: "Modality", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0070), alias: "Manufacturer", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0080), alias: "InstitutionName", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0008, 0x0090), alias: "ReferringPhysicianName", vr: VR::PN },
    DictionaryEntryRef { tag: Tag(0x0008, 0x1030), alias: "StudyDescription", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0008, 0x103E), alias: "SeriesDescription", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0008, 0x1090), alias: "ManufacturerModelName", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0008, 0x1140), alias: "ReferencedImageSequence", vr: VR::SQ },
    DictionaryEntryRef { tag: Tag(0x0008, 0x1155), alias: "ReferencedSOPInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0008, 0x9215), alias: "DerivationCodeSequence", vr: VR::SQ },
    DictionaryEntryRef { tag: Tag(0x0010, 0x0010), alias: "PatientName", vr: VR::PN },
    DictionaryEntryRef { tag: Tag(0x0010, 0x0020), alias: "PatientID", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0010, 0x0030), alias: "PatientBirthDate", vr: VR::DA },
    DictionaryEntryRef { tag: Tag(0x0010, 0x0040), alias: "PatientSex", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0018, 0x0015), alias: "BodyPartExamined", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0018, 0x0050), alias: "SliceThickness", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0018, 0x0060), alias: "KVP", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0018, 0x1020), alias: "SoftwareVersions", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0018, 0x1164), alias: "ImagerPixelSpacing", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0020, 0x000D), alias: "StudyInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0020, 0x000E), alias: "SeriesInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0020, 0x0010), alias: "StudyID", vr: VR::SH },
    DictionaryEntryRef { tag: Tag(0x0020, 0x0011), alias: "SeriesNumber", vr: VR::IS },
    DictionaryEntryRef { tag: Tag(0x0020, 0x0013), alias: "InstanceNumber", vr: VR::IS },
    DictionaryEntryRef { tag: Tag(0x0020, 0x0052), alias: "FrameOfReferenceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0020, 0x9221), alias: "DimensionOrganizationSequence", vr: VR::SQ },
    DictionaryEntryRef { tag: Tag(0x0020, 0x9311), alias: "DimensionOrganizationUID", vr: VR::UI },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0002), alias: "SamplesPerPixel", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0004), alias: "PhotometricInterpretation", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0006), alias: "PlanarConfiguration", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0008), alias: "NumberOfFrames", vr: VR::IS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0009), alias: "FrameIncrementPointer", vr: VR::AT },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0010), alias: "Rows", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0011), alias: "Columns", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0030), alias: "PixelSpacing", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0100), alias: "BitsAllocated", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0101), alias: "BitsStored", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0102), alias: "HighBit", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0103), alias: "PixelRepresentation", vr: VR::US },
    DictionaryEntryRef { tag: Tag(0x0028, 0x0301), alias: "BurnedInAnnotation", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x1050), alias: "WindowCenter", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x1051), alias: "WindowWidth", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x1052), alias: "RescaleIntercept", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x1053), alias: "RescaleSlope", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x2110), alias: "LossyImageCompression", vr: VR::CS },
    DictionaryEntryRef { tag: Tag(0x0028, 0x2112), alias: "LossyImageCompressionRatio", vr: VR::DS },
    DictionaryEntryRef { tag: Tag(0x0040, 0x0512), alias: "ContainerIdentifier", vr: VR::LO },
    DictionaryEntryRef { tag: Tag(0x0048, 0x0001), alias: "ImagedVolumeWidth", vr: VR::FL },
    DictionaryEntryRef { tag: Tag(0x0048, 0x0002), alias: "ImagedVolumeHeight", vr: VR::FL },
    DictionaryEntryRef { tag: Tag(0x0048, 0x0003), alias: "ImagedVolumeDepth", vr: VR::FL },
    DictionaryEntryRef { tag: Tag(0x0048, 0x0006), alias: "TotalPixelMatrixColumns", vr: VR::UL },
    DictionaryEntryRef { tag: Tag(0x0048, 0x0007), alias: "TotalPixelMatrixRows", vr: VR::UL },
    DictionaryEntryRef { tag: Tag(0x5200, 0x9229), alias: "SharedFunctionalGroupsSequence", vr: VR::SQ },
    DictionaryEntryRef { tag: Tag(0x5200, 0x9230), alias: "PerFrameFunctionalGroupsSequence", vr: VR::SQ },
    DictionaryEntryRef { tag: Tag(0x7FE0, 0x0001), alias: "ExtendedOffsetTable", vr: VR::OV },
    DictionaryEntryRef { tag: Tag(0x7FE0, 0x0002), alias: "ExtendedOffsetTableLengths", vr: VR::OV },
    DictionaryEntryRef { tag: Tag(0x7FE0, 0x0008), alias: "FloatPixelData", vr: VR::OF },
    DictionaryEntryRef { tag: Tag(0x7FE0, 0x0009), alias: "DoubleFloatPixelData", vr: VR::OD },
    DictionaryEntryRef { tag: Tag(0x7FE0, 0x0010), alias: "PixelData", vr: VR::OW },
    DictionaryEntryRef { tag: Tag(0xFFFC, 0xFFFC), alias: "DataSetTrailingPadding", vr: VR::OB },
];

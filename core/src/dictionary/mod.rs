//! The DICOM data dictionary: a read-only lookup collaborator
//! mapping attribute tags to their standard value representation
//! (for implicit-VR decoding) and to a human-readable keyword
//! (for diagnostics).

pub mod tags;

use crate::header::{Tag, VR};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Type trait for a dictionary of DICOM attributes.
/// Attribute dictionaries provide the means to resolve a tag into its
/// standard value representation and keyword, and a keyword back into
/// a tag.
pub trait DataDictionary: fmt::Debug {
    /// Fetch the standard value representation of the attribute,
    /// or `None` if the tag is unknown to the dictionary.
    fn vr_of(&self, tag: Tag) -> Option<VR>;

    /// Fetch the attribute keyword (e.g. "PatientName"),
    /// or `None` if the tag is unknown to the dictionary.
    fn keyword_of(&self, tag: Tag) -> Option<&'static str>;

    /// Fetch an attribute tag by its keyword
    /// (case sensitive, no spaces).
    fn by_name(&self, name: &str) -> Option<Tag>;
}

/// A data type for a dictionary entry with a string slice for its keyword.
#[derive(Debug, PartialEq, Clone)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag
    pub tag: Tag,
    /// The keyword of the attribute, with no spaces, in UpperCamelCase
    pub alias: &'a str,
    /// The _typical_ value representation of the attribute
    pub vr: VR,
}

/// The data struct containing the standard dictionary index.
#[derive(Debug)]
pub struct StandardDictionaryRegistry {
    /// mapping: keyword → entry
    by_name: HashMap<&'static str, &'static DictionaryEntryRef<'static>>,
    /// mapping: tag → entry
    by_tag: HashMap<Tag, &'static DictionaryEntryRef<'static>>,
}

impl StandardDictionaryRegistry {
    fn new() -> StandardDictionaryRegistry {
        StandardDictionaryRegistry {
            by_name: HashMap::with_capacity(tags::ENTRIES.len()),
            by_tag: HashMap::with_capacity(tags::ENTRIES.len()),
        }
    }

    fn index(&mut self, entry: &'static DictionaryEntryRef<'static>) -> &mut Self {
        self.by_name.insert(entry.alias, entry);
        self.by_tag.insert(entry.tag, entry);
        self
    }
}

lazy_static! {
    static ref DICT: StandardDictionaryRegistry = init_dictionary();
}

fn init_dictionary() -> StandardDictionaryRegistry {
    let mut d = StandardDictionaryRegistry::new();
    for entry in tags::ENTRIES {
        d.index(entry);
    }
    d
}

/// Retrieve a singleton instance of the standard dictionary registry.
pub fn registry() -> &'static StandardDictionaryRegistry {
    &DICT
}

/// A data dictionary which consults the library's
/// global DICOM attribute registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    fn vr_of(&self, tag: Tag) -> Option<VR> {
        registry().by_tag.get(&tag).map(|e| e.vr)
    }

    fn keyword_of(&self, tag: Tag) -> Option<&'static str> {
        registry().by_tag.get(&tag).map(|e| e.alias)
    }

    fn by_name(&self, name: &str) -> Option<Tag> {
        registry().by_name.get(name).map(|e| e.tag)
    }
}

impl fmt::Display for StandardDataDictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard DICOM Data Dictionary")
    }
}

/// Check whether the given tag may identify a data element.
/// The item-bracket group 0xFFFE is reserved for item and delimiter
/// headers, and the zero tag never identifies an attribute.
pub fn is_valid_tag(tag: Tag) -> bool {
    tag.group() != 0xFFFE && tag != Tag(0x0000, 0x0000)
}

/// Check whether the two characters spell a recognised
/// value representation.
pub fn is_valid_vr(vr: &str) -> bool {
    VR::from_str(vr).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // tests for just a few attributes to make sure that the entries
    // were well installed into the registry
    #[test]
    fn smoke_test() {
        let dict = StandardDataDictionary;

        assert_eq!(dict.vr_of(Tag(0x0010, 0x0010)), Some(VR::PN));
        assert_eq!(dict.keyword_of(Tag(0x0010, 0x0010)), Some("PatientName"));
        assert_eq!(dict.by_name("PatientName"), Some(Tag(0x0010, 0x0010)));

        assert_eq!(dict.vr_of(tags::MODALITY), Some(VR::CS));
        assert_eq!(dict.vr_of(tags::NUMBER_OF_FRAMES), Some(VR::IS));

        // Pixel Data resolves to OW for implicit decoding
        assert_eq!(dict.vr_of(tags::PIXEL_DATA), Some(VR::OW));

        assert_eq!(dict.vr_of(Tag(0x0009, 0x1001)), None);
        assert_eq!(dict.keyword_of(Tag(0x0009, 0x1001)), None);
    }

    #[test]
    fn tag_validity() {
        assert!(is_valid_tag(Tag(0x0008, 0x0060)));
        assert!(is_valid_tag(Tag(0x7FE0, 0x0010)));
        assert!(is_valid_tag(tags::DATA_SET_TRAILING_PADDING));
        assert!(!is_valid_tag(Tag(0xFFFE, 0xE000)));
        assert!(!is_valid_tag(Tag(0xFFFE, 0xE0DD)));
        assert!(!is_valid_tag(Tag(0x0000, 0x0000)));
    }

    #[test]
    fn vr_validity() {
        assert!(is_valid_vr("OB"));
        assert!(is_valid_vr("SQ"));
        assert!(is_valid_vr("UV"));
        assert!(!is_valid_vr("XX"));
        assert!(!is_valid_vr("ob"));
    }
}

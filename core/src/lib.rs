//! This crate contains the core types and data model
//! for reading DICOM Part 10 content:
//! attribute tags, value representations, element headers,
//! decoded element values, data sets and item sequences,
//! and the standard attribute dictionary.
//!
//! The crates `dcmio-encoding`, `dcmio-parser` and `dcmio-object`
//! build the actual file reading process on top of these types.

pub mod dataset;
pub mod dictionary;
pub mod header;
pub mod value;

pub use crate::dataset::{DataSet, Sequence};
pub use crate::dictionary::{DataDictionary, StandardDataDictionary};
pub use crate::header::{DataElement, DataElementHeader, Length, SequenceItemHeader, Tag, VR};
pub use crate::value::{PrimitiveValue, Value};

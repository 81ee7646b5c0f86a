//! This crate implements the value reading layer of the DICOM
//! Part 10 reading process: a stateful, position-tracking decoder
//! which turns element headers into decoded primitive values,
//! and the recursive reader which assembles data elements,
//! nested sequences and their items into data sets.

pub mod dataset;
pub mod stateful;

pub use crate::dataset::read::read_element;
pub use crate::stateful::decode::StatefulDecoder;

//! Reading of whole data elements and nested data sets.

pub mod read;

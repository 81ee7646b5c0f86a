//! This crate implements the top level of the DICOM Part 10 reading
//! process: the file handle with its preamble handshake, the file
//! meta information and main data set readers, and random access to
//! the frames of the pixel data element through basic offset tables.
//!
//! # Example
//!
//! ```no_run
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use dcmio_object::DicomFile;
//!
//! let mut file = DicomFile::open("image.dcm")?;
//! let file_meta = file.read_file_meta()?;
//! let metadata = file.read_metadata()?;
//! let bot = file.read_bot(&metadata).or_else(|_| file.build_bot(&metadata))?;
//! let frame = file.read_frame(&metadata, &bot, 1)?;
//! println!("frame 1: {} bytes", frame.length());
//! # Ok(())
//! # }
//! ```

pub mod dump;
pub mod file;
pub mod pixeldata;

pub use crate::file::{DicomFile, Error, Result};
pub use crate::pixeldata::{BasicOffsetTable, Frame};
pub use dcmio_core::dictionary::StandardDataDictionary;

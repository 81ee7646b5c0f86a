//! A CLI tool for inspecting the contents of a DICOM file:
//! dumps the File Meta Information group followed by the main
//! data set, one line per element.
//!
//! Usage:
//!
//! ```none
//! dcm-dump [-v] <file.dcm>
//! ```

use clap::Parser;
use dcmio_object::{dump, DicomFile, StandardDataDictionary};
use snafu::{prelude::*, Whatever};
use std::io::{stdout, ErrorKind, Write};
use std::path::PathBuf;
use tracing::{info, Level};

/// Dump the File Meta Information and Data Set of a DICOM file
#[derive(Debug, Parser)]
#[command(name = "dcm-dump", version)]
struct App {
    /// path to the DICOM file to read
    file: PathBuf,
    /// verbose mode
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    run().unwrap_or_else(|e| {
        eprintln!("[ERROR] {}", snafu::Report::from_error(e));
        std::process::exit(1);
    });
}

fn run() -> Result<(), Whatever> {
    let App { file, verbose } = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if verbose { Level::INFO } else { Level::ERROR })
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")?;

    info!("Read file '{}'", file.display());
    let mut file = DicomFile::open(&file)
        .with_whatever_context(|_| format!("Reading file '{}' failed", file.display()))?;

    info!("Read File Meta Information");
    let file_meta = file
        .read_file_meta()
        .whatever_context("Could not read File Meta Information")?;

    info!("Read metadata");
    let metadata = file
        .read_metadata()
        .whatever_context("Could not read Data Set")?;

    let mut to = stdout();
    match dump::dump_file(&mut to, &file_meta, &metadata, &StandardDataDictionary) {
        // a closed pipe on the receiving end is not an error
        Err(ref e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
    .whatever_context("Could not write dump output")?;
    to.flush().ok();

    Ok(())
}

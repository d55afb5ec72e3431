//! `;`-delimited export of product rows.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use winestock_core::ProductRecord;

pub const DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no product records to export")]
    Empty,

    #[error("failed to write export row: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes a header row (the `ProductRecord` field names, in order) followed
/// by one row per record.
///
/// # Errors
///
/// Returns [`ExportError::Empty`] when `records` is empty; nothing is written
/// in that case.
pub fn write_records<W: Write>(writer: W, records: &[ProductRecord]) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes `records` to `path`, creating parent directories and replacing
/// any existing file.
///
/// # Errors
///
/// [`ExportError::Empty`] for no records, [`ExportError::Io`] if the file
/// cannot be created, [`ExportError::Csv`] if a row fails to serialize.
pub fn write_records_to_path(path: &Path, records: &[ProductRecord]) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    write_records(file, records)
}

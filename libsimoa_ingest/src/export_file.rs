use std::fs::File;
use std::path::Path;

use super::error::ExportFileError;

/// The column projection applied at the ingestion boundary, in canonical
/// order. Every other column in the export is dropped.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Sample Barcode",
    "Location",
    "Sample Type",
    "Batch Name",
    "AEB",
    "Concentration",
    "Flags",
];

/// Number of preamble rows the instrument writes ahead of the header row.
pub const DEFAULT_HEADER_ROWS: usize = 5;

/// A raw row-oriented table projected to the required columns.
///
/// Headers follow REQUIRED_COLUMNS order and every row carries exactly one
/// field per header. Values are untyped strings; normalization happens
/// downstream.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read an instrument export into a RawTable.
///
/// A missing file or an extension we cannot read yields `Ok(None)`, never an
/// error; an unreadable source is a normal outcome for the caller to handle
/// as "no data produced". The first `header_rows` preamble rows are discarded,
/// the next row is taken as the header, and the remaining rows are projected
/// to the required columns.
pub fn read_export(path: &Path, header_rows: usize) -> Result<Option<RawTable>, ExportFileError> {
    if !path.exists() {
        log::warn!("Export file {path:?} does not exist; no data produced.");
        return Ok(None);
    }
    let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => b',',
        Some("tsv") | Some("txt") => b'\t',
        other => {
            log::warn!("Export file format {other:?} is not supported; no data produced.");
            return Ok(None);
        }
    };

    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(file);

    let mut records = reader.records().skip(header_rows);
    let header_record = match records.next() {
        Some(record) => record?,
        None => return Err(ExportFileError::MissingHeader(header_rows)),
    };
    let header: Vec<&str> = header_record.iter().collect();

    // Source-column index of each required column
    let mut indices = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        match header.iter().position(|h| *h == name) {
            Some(index) => indices.push(index),
            None => return Err(ExportFileError::MissingColumn(name.to_string())),
        }
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        let record = record?;
        // Exports often close the data block with rows of bare delimiters
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push(
            indices
                .iter()
                .map(|&index| record.get(index).unwrap_or("").to_string())
                .collect(),
        );
    }

    Ok(Some(RawTable {
        headers: REQUIRED_COLUMNS.iter().map(|name| name.to_string()).collect(),
        rows,
    }))
}

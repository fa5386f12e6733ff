//! Reading worksheets from delimited text exports.
//!
//! Each CSV/TSV file is one worksheet titled after its file stem. The first
//! record holds the column headers; short rows are padded with empty cells.

use std::{fs::File, io::Read, path::Path};

use crate::{error::Error, worksheet::Worksheet};

/// Reads one worksheet file. `.tsv` files are tab-separated, anything else is
/// read as comma-separated.
pub fn read_worksheet(path: &Path) -> Result<Worksheet, Error> {
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };
    read_worksheet_from_reader(title, File::open(path)?, delimiter)
}

/// Reads a worksheet from any byte source, decoding UTF-8 or BOM-marked UTF-16.
pub fn read_worksheet_from_reader<R: Read>(
    title: impl Into<String>,
    reader: R,
    delimiter: u8,
) -> Result<Worksheet, Error> {
    let decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding_rs::UTF_8))
        .bom_override(true)
        .build(reader);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(decoder);

    let headers = rdr
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Worksheet::new(title, headers, rows))
}

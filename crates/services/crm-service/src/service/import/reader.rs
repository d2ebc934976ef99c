//! Decoding and splitting of uploaded import files.

use csv::ReaderBuilder;
use encoding_rs::{Encoding, ISO_8859_15, UTF_8, WINDOWS_1252};

use common::{AppError, AppResult};
use domain::ImportEncoding;

/// Records of a file, header included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportFile {
    pub records: Vec<Vec<String>>,
}

impl ImportFile {
    /// Number of lines read, header and blank rows included
    pub fn total_rows(&self) -> usize {
        self.records.len()
    }

    /// Rows after the header that hold at least one value.
    pub fn data_rows(&self) -> impl Iterator<Item = &[String]> {
        self.records
            .iter()
            .skip(1)
            .map(Vec::as_slice)
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
    }
}

fn encoding_for(encoding: ImportEncoding) -> &'static Encoding {
    match encoding {
        ImportEncoding::Utf8 => UTF_8,
        ImportEncoding::Iso8859_15 => ISO_8859_15,
        ImportEncoding::Cp1252 => WINDOWS_1252,
    }
}

/// Decode the whole file, failing on the first malformed sequence.
pub fn decode(bytes: &[u8], encoding: ImportEncoding) -> AppResult<String> {
    encoding_for(encoding)
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.trim_start_matches('\u{feff}').to_string())
        .ok_or_else(|| AppError::validation("check that the file encoding is correct"))
}

/// Decode and split a delimited file.
pub fn read_file(bytes: &[u8], encoding: ImportEncoding, separator: u8) -> AppResult<ImportFile> {
    let text = decode(bytes, encoding)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator)
        .from_reader(text.as_bytes());

    let records = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| AppError::validation(format!("invalid csv file: {}", e)))
        })
        .collect::<AppResult<Vec<Vec<String>>>>()?;

    Ok(ImportFile { records })
}

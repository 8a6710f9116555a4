//! Delimiter-joined text export, written with the `csv` crate.
//!
//! Cells are written exactly as they are. A cell containing the delimiter or a line break
//! is not quoted, so such values shift columns when the file is read back. Exported bytes
//! stay identical to what the console has always produced.

use super::{ReportError, TabularModel};
use csv::{QuoteStyle, Terminator, WriterBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Single ASCII byte between cells.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Encodes `model` with the default `,` delimiter.
pub fn encode_csv(model: &TabularModel) -> Result<Vec<u8>, ReportError> {
    encode_csv_with(model, &CsvOptions::default())
}

/// Header line, then one line per row, joined by `\n` with no trailing newline.
pub fn encode_csv_with(model: &TabularModel, options: &CsvOptions) -> Result<Vec<u8>, ReportError> {
    if matches!(options.delimiter, b'\n' | b'\r') || !options.delimiter.is_ascii() {
        return Err(ReportError::Encoding(format!(
            "{:?} cannot be used as delimiter",
            options.delimiter as char
        )));
    }
    model.check_shape()?;

    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(model.headers())
        .map_err(|e| ReportError::Encoding(format!("Failed to write CSV headers: {e}")))?;
    for row in model.rows() {
        writer
            .write_record(row)
            .map_err(|e| ReportError::Encoding(format!("Failed to write CSV row: {e}")))?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Encoding(format!("Failed to get CSV output: {e}")))?;
    // Every record ends with a terminator; the file does not
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(bytes)
}

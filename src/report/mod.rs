//! # Reports
//!
//! Exports are built in two steps. The current store snapshot is first flattened into a
//! [`TabularModel`] (headers plus rows of text). Encoders then turn that model into bytes:
//!
//! - [`encode_csv`]: delimiter-joined lines, cells written as-is
//! - [`encode_paginated_document`]: a paginated PDF table
//!
//! Both encoders are pure. Anything time-dependent, such as a "Generated on" line, is
//! passed in by the caller.

pub mod csv;
pub mod document;
pub mod tabular;

pub use self::csv::{encode_csv, encode_csv_with, CsvOptions};
pub use document::{encode_paginated_document, encode_paginated_document_with, PageLayout};
pub use tabular::TabularModel;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReportError {
    /// A row does not have one cell per header.
    #[error("Row {row} has {actual} cells, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Encoding error: {0}")]
    Encoding(String),
}

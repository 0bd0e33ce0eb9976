//! CSV import result types

use serde::{Deserialize, Serialize};

/// Failures for one CSV data row
///
/// `row` is 1-based and counts the header line, so the first data row is 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    pub row: usize,
    pub error_messages: Vec<String>,
}

impl ImportRowError {
    pub fn new(row: usize, error_messages: Vec<String>) -> Self {
        Self {
            row,
            error_messages,
        }
    }

    pub fn single(row: usize, message: impl Into<String>) -> Self {
        Self::new(row, vec![message.into()])
    }
}

/// Body of `POST /reservations/load-csv`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvUploadResponse {
    /// Failed rows, ascending by row number. Empty when every row was stored.
    pub errors: Vec<ImportRowError>,
}

//! CSV Import Pipeline
//!
//! Turns an uploaded CSV buffer into reservations. Every data row is handled
//! on its own: a bad row adds an entry to the report and never aborts the
//! batch. Rows sharing an import id run in file order on one task, so a later
//! row is a duplicate only once an earlier one has been stored.

use std::collections::HashMap;
use std::time::Instant;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    CsvUploadResponse, ImportRowError, Numeric, ReservationInput, normalize_enum_text,
};
use thiserror::Error;
use tokio::task::JoinSet;

use super::ReservationService;
use super::reservation_service::import_id_conflict;

pub const COL_ID: &str = "ID";
pub const COL_FULL_NAME: &str = "Full Name";
pub const COL_EMAIL: &str = "Email";
pub const COL_GUESTS: &str = "Number of Guests";
pub const COL_STATUS: &str = "Status";
pub const COL_CODE: &str = "Reservation Code";
pub const COL_DATE: &str = "Date";
pub const COL_AMOUNT: &str = "Amount";
pub const COL_DISCOUNT: &str = "Discount";
pub const COL_TOTAL: &str = "Total";
pub const COL_PAYMENT_TYPE: &str = "Payment Type";

/// Columns every data row must fill
pub const EXPECTED_COLUMNS: [&str; 11] = [
    COL_ID,
    COL_FULL_NAME,
    COL_EMAIL,
    COL_GUESTS,
    COL_STATUS,
    COL_CODE,
    COL_DATE,
    COL_AMOUNT,
    COL_DISCOUNT,
    COL_TOTAL,
    COL_PAYMENT_TYPE,
];

pub const MSG_INCOMPLETE: &str = "Datos incompletos";
pub const MSG_PROCESSING: &str = "Ha ocurrido un error al procesar";

/// Whole-file failures; row problems never end up here
#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("El archivo no es texto UTF-8 válido")]
    InvalidEncoding,

    #[error("No se pudo leer la cabecera del CSV: {0}")]
    Header(String),
}

impl From<CsvImportError> for AppError {
    fn from(err: CsvImportError) -> Self {
        AppError::with_message(ErrorCode::InvalidFormat, err.to_string())
    }
}

/// One non-blank data row
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based line number counting the header
    pub row: usize,
    /// Column name → trimmed cell, or the reader's error for this record
    pub cells: Result<HashMap<String, String>, String>,
}

impl CsvRow {
    fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .as_ref()
            .ok()?
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Every expected column present and non-empty
    pub fn is_complete(&self) -> bool {
        EXPECTED_COLUMNS.iter().all(|c| self.cell(c).is_some())
    }

    pub fn import_id(&self) -> Option<&str> {
        self.cell(COL_ID)
    }

    /// Map columns onto the reservation candidate
    pub fn to_input(&self) -> ReservationInput {
        let text = |c: &str| self.cell(c).map(str::to_string);
        let number = |c: &str| self.cell(c).map(Numeric::from_cell);
        let enum_text = |c: &str| self.cell(c).map(normalize_enum_text);

        ReservationInput {
            code: number(COL_CODE),
            full_name: text(COL_FULL_NAME),
            email: text(COL_EMAIL),
            number_of_guests: number(COL_GUESTS),
            status: enum_text(COL_STATUS),
            date: text(COL_DATE),
            amount: number(COL_AMOUNT),
            discount: number(COL_DISCOUNT),
            total_amount: number(COL_TOTAL),
            payment_type: enum_text(COL_PAYMENT_TYPE),
            csv_id: text(COL_ID),
        }
    }
}

/// Split a CSV buffer into keyed rows, skipping blank lines
pub fn parse_rows(buffer: &[u8]) -> Result<Vec<CsvRow>, CsvImportError> {
    let text = std::str::from_utf8(buffer).map_err(|_| CsvImportError::InvalidEncoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CsvImportError::Header(e.to_string()))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(CsvImportError::Header("cabecera vacía".into()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let cells = match result {
            Ok(record) => {
                if record.iter().all(str::is_empty) {
                    continue;
                }
                Ok(headers
                    .iter()
                    .zip(record.iter())
                    .filter(|(name, _)| !name.is_empty())
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect())
            }
            Err(e) => Err(e.to_string()),
        };
        rows.push(CsvRow {
            row: rows.len() + 2,
            cells,
        });
    }
    Ok(rows)
}

/// Import every row of `buffer`, returning the per-row error report
pub async fn import_csv(
    service: &ReservationService,
    buffer: &[u8],
) -> Result<CsvUploadResponse, AppError> {
    let started = Instant::now();
    let rows = parse_rows(buffer)?;
    let total_rows = rows.len();

    let mut errors = Vec::new();
    let mut groups: Vec<Vec<CsvRow>> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();

    for row in rows {
        if let Err(e) = &row.cells {
            errors.push(ImportRowError::single(row.row, format!("{MSG_PROCESSING}: {e}")));
            continue;
        }
        if !row.is_complete() {
            errors.push(ImportRowError::single(row.row, MSG_INCOMPLETE));
            continue;
        }
        match row.import_id().map(str::to_string) {
            Some(id) => match group_of.get(&id) {
                Some(&index) => groups[index].push(row),
                None => {
                    group_of.insert(id, groups.len());
                    groups.push(vec![row]);
                }
            },
            None => groups.push(vec![row]),
        }
    }

    let mut tasks = JoinSet::new();
    let mut task_rows = HashMap::new();
    for group in groups {
        let lines: Vec<usize> = group.iter().map(|r| r.row).collect();
        let svc = service.clone();
        let handle = tasks.spawn(async move {
            let mut failed = Vec::new();
            for row in group {
                failed.extend(process_row(&svc, row).await);
            }
            failed
        });
        task_rows.insert(handle.id(), lines);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, failed)) => errors.extend(failed),
            Err(e) => {
                let lines = task_rows.remove(&e.id()).unwrap_or_default();
                tracing::error!(rows = ?lines, error = %e, "CSV row task failed");
                errors.extend(
                    lines
                        .into_iter()
                        .map(|line| ImportRowError::single(line, format!("{MSG_PROCESSING}: {e}"))),
                );
            }
        }
    }

    errors.sort_by_key(|e| e.row);

    tracing::info!(
        rows = total_rows,
        failed_rows = errors.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "CSV import finished"
    );

    Ok(CsvUploadResponse { errors })
}

/// Store one complete row; `None` when it was imported
async fn process_row(service: &ReservationService, row: CsvRow) -> Option<ImportRowError> {
    if let Some(id) = row.import_id() {
        match service.find_by_import_id(id).await {
            Ok(Some(_)) => {
                return Some(ImportRowError::single(row.row, import_id_conflict(id).message));
            }
            Ok(None) => {}
            Err(e) => return Some(processing_error(row.row, &e)),
        }
    }

    let data = match row.to_input().validate_into() {
        Ok(data) => data,
        Err(violations) => {
            return Some(ImportRowError::new(
                row.row,
                violations.into_iter().map(|v| v.message).collect(),
            ));
        }
    };

    match service.create_validated(data).await {
        Ok(_) => None,
        Err(e) if e.is(ErrorCode::ReservationImportIdExists) => {
            Some(ImportRowError::single(row.row, e.message))
        }
        Err(e) => Some(processing_error(row.row, &e)),
    }
}

fn processing_error(row: usize, err: &AppError) -> ImportRowError {
    tracing::warn!(row, code = %err.code, error = %err.message, "CSV row failed");
    ImportRowError::single(row, format!("{MSG_PROCESSING}: {}", err.message))
}

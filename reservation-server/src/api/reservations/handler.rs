//! Reservation API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::import_csv;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{CsvUploadResponse, Reservation, ReservationInput, ReservationOptions};

/// Content types accepted for CSV uploads
const CSV_CONTENT_TYPES: &[&str] = &["text/csv", "application/vnd.ms-excel"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Email fragment filter
    pub email: Option<String>,
}

/// GET /reservations - list, optionally filtered by `?email=`
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let service = state.reservations();
    let reservations = match query.email.as_deref() {
        Some(fragment) => service.search(fragment).await?,
        None => service.list().await?,
    };
    Ok(Json(reservations))
}

/// GET /reservations/options - enumeration members and form defaults
pub async fn options() -> Json<ReservationOptions> {
    Json(ReservationOptions::current())
}

/// GET /reservations/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let id = parse_id(&id)?;
    Ok(Json(state.reservations().get(id).await?))
}

/// POST /reservations
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ReservationInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let Json(input) = payload.map_err(json_error)?;
    let reservation = state.reservations().create(input).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// PUT /reservations/:id - full replacement of the mutable fields
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ReservationInput>, JsonRejection>,
) -> AppResult<Json<Reservation>> {
    let id = parse_id(&id)?;
    let Json(input) = payload.map_err(json_error)?;
    Ok(Json(state.reservations().update(id, input).await?))
}

/// DELETE /reservations/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.reservations().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /reservations/load-csv - multipart field `file`
pub async fn load_csv(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<CsvUploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(str::to_string);
            let filename = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            upload = Some((content_type, filename, data));
            break;
        }
    }

    let (content_type, filename, data) =
        upload.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;

    if !is_csv_content_type(content_type.as_deref()) {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat)
            .with_detail("contentType", content_type.unwrap_or_default()));
    }
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    tracing::info!(
        filename = filename.as_deref().unwrap_or("-"),
        bytes = data.len(),
        "CSV upload received"
    );

    let report = import_csv(&state.reservations(), &data).await?;
    Ok(Json(report))
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::invalid_request(format!("Id de reserva inválido: {raw}")))
}

fn is_csv_content_type(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return false;
    };
    let essence = ct.split(';').next().unwrap_or_default().trim();
    CSV_CONTENT_TYPES
        .iter()
        .any(|accepted| essence.eq_ignore_ascii_case(accepted))
}

fn json_error(rejection: JsonRejection) -> AppError {
    AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::new(ErrorCode::FileTooLarge);
    }
    AppError::invalid_request(format!("Solicitud multipart inválida: {}", err.body_text()))
}

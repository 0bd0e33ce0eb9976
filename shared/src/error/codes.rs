//! Unified error codes for the reservation manager
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Reservation errors
//! - 2xxx: Upload errors
//! - 9xxx: System errors

use serde::Serialize;
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the browser UI can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Reservation ====================
    /// Reservation id does not exist
    ReservationNotFound = 1001,
    /// Business code already held by another reservation
    ReservationCodeExists = 1002,
    /// Import identifier already held by another reservation
    ReservationImportIdExists = 1003,

    // ==================== 2xxx: Upload ====================
    /// File too large
    FileTooLarge = 2001,
    /// Unsupported file format
    UnsupportedFileFormat = 2002,
    /// No file provided in request
    NoFileProvided = 2003,
    /// Empty file provided
    EmptyFile = 2004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default user-facing message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operación completada",
            ErrorCode::Unknown => "Ha ocurrido un error desconocido",
            ErrorCode::ValidationFailed => "Datos inválidos",
            ErrorCode::NotFound => "Recurso no encontrado",
            ErrorCode::AlreadyExists => "El recurso ya existe",
            ErrorCode::InvalidRequest => "Solicitud inválida",
            ErrorCode::InvalidFormat => "Formato inválido",

            // Reservation
            ErrorCode::ReservationNotFound => "No se encontro la reserva",
            ErrorCode::ReservationCodeExists => "Ya existe una reserva con ese codigo",
            ErrorCode::ReservationImportIdExists => "Ya existe una reserva relacionada a ese id",

            // Upload
            ErrorCode::FileTooLarge => "El archivo es demasiado grande",
            ErrorCode::UnsupportedFileFormat => "El archivo debe ser un CSV",
            ErrorCode::NoFileProvided => "No se recibio ningun archivo",
            ErrorCode::EmptyFile => "El archivo esta vacio",

            // System
            ErrorCode::InternalError => "Error interno del servidor",
            ErrorCode::DatabaseError => "Error de base de datos",
            ErrorCode::ConfigError => "Error de configuración",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

//! Unified error system for the reservation manager
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API error body
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Reservation errors
//! - 2xxx: Upload errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::ReservationNotFound);
//!
//! let err = AppError::validation("Formato de email inválido")
//!     .with_detail("field", "email");
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult};

//! Shared types for the reservation manager
//!
//! Domain models, validation rules and the error/response types used by
//! the server and mirrored by the browser UI.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

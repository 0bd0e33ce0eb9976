//! Data models
//!
//! Shared between the reservation server and the browser UI (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod import;
pub mod reservation;
pub mod reservation_input;

// Re-exports
pub use import::*;
pub use reservation::*;
pub use reservation_input::*;

//! Reservation Server
//!
//! CRUD over reservations, bulk CSV import with a per-row error report,
//! and an embedded browser UI.
//!
//! # Module structure
//!
//! ```text
//! reservation-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── db/            # SQLite pool, migrations, repository
//! ├── services/      # reservation service, CSV import, money
//! ├── api/           # HTTP routes, handlers, embedded UI
//! ├── middleware/    # request logging
//! └── utils/         # logger, error re-exports
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerError, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::init_logger_with_file;


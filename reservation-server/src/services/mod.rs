//! Business services

pub mod csv_import;
pub mod money;
pub mod reservation_service;

pub use csv_import::import_csv;
pub use reservation_service::ReservationService;

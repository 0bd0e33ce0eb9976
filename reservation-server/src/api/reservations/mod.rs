//! Reservation API module

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router(max_upload_bytes: usize) -> Router<ServerState> {
    Router::new().nest("/reservations", routes(max_upload_bytes))
}

fn routes(max_upload_bytes: usize) -> Router<ServerState> {
    let upload_routes = Router::new()
        .route("/load-csv", post(handler::load_csv))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/options", get(handler::options))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .merge(upload_routes)
}

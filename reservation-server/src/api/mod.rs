//! HTTP API
//!
//! Routes are registered in [`build_router`]; [`build_app`] adds the
//! middleware stack shared by the server and the integration tests.

pub mod health;
pub mod reservations;
pub mod ui;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::middleware;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router(max_upload_bytes: usize) -> Router<ServerState> {
    Router::new()
        .merge(reservations::router(max_upload_bytes))
        .merge(health::router())
        .merge(ui::router())
}

/// Build the application with every middleware layer
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router(state.config.max_upload_bytes)
        // CORS
        .layer(CorsLayer::permissive())
        // Gzip responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Request tracing spans
        .layer(TraceLayer::new_for_http())
        // Copy x-request-id onto the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Assign x-request-id; outermost so every inner layer sees it
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}

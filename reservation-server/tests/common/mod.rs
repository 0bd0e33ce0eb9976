//! Test harness: in-memory database behind the full middleware stack

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use reservation_server::db::DbService;
use reservation_server::{Config, ServerState, api};
use serde_json::Value;
use tower::ServiceExt;

pub const CSV_HEADER: &str = "ID,Full Name,Email,Number of Guests,Status,Reservation Code,Date,Amount,Discount,Total,Payment Type";

const BOUNDARY: &str = "reservation-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::with_pool(Config::with_overrides(":memory:", 0), db.pool);
        let app = api::build_app(&state).with_state(state.clone());
        Self { app, state }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        (status, body_json(res).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", uri, body)).await
    }

    pub async fn upload(&self, content_type: &str, content: &str) -> (StatusCode, Value) {
        self.send(multipart_request("file", content_type, content))
            .await
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn multipart_request(field: &str, content_type: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"reservations.csv\"\r\n\
         Content-Type: {content_type}\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::post("/reservations/load-csv")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(res: Response<Body>) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn csv(rows: &[&str]) -> String {
    let mut out = String::from(CSV_HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out
}

pub fn reservation_json(code: i64, email: &str) -> Value {
    serde_json::json!({
        "code": code,
        "fullName": "Sofía Torres",
        "email": email,
        "numberOfGuests": 4,
        "status": "PAID",
        "date": "2024-09-01",
        "amount": 220,
        "discount": 20,
        "paymentType": "CARD"
    })
}

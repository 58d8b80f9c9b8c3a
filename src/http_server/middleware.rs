//! Request logging middleware
//!
//! One `REQUEST_COMPLETE` line per request, tagged with a fresh request id
//! that is also returned in the `x-request-id` header.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};

/// Response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log method, path, status and latency of every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let elapsed = started.elapsed().as_millis().to_string();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    log_event_with_fields(
        Event::RequestComplete,
        &[
            ("elapsed_ms", elapsed.as_str()),
            ("method", method.as_str()),
            ("path", path.as_str()),
            ("request_id", request_id.as_str()),
            ("status", status.as_str()),
        ],
    );

    response
}

//! Response relay.
//!
//! # Responsibilities
//! - Reflect the upstream status verbatim with sanitized headers and raw body
//! - Serialize frameability verdicts for the inspection endpoints
//! - Map input errors to 400 and upstream failures to 500
//!
//! # Design Decisions
//! - Exactly one response per request; nothing is streamed or partially written
//! - Inspection failures still carry `frameable: false` so callers can treat
//!   them like a non-frameable verdict
//! - Error bodies carry a message only, never internal detail beyond the
//!   transport error text

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::header_set::HeaderSet;
use crate::http::payload::InputError;
use crate::security::headers::{apply_cors, sanitize, CorsMode};
use crate::security::FrameVerdict;
use crate::upstream::{UpstreamError, UpstreamResponse};

/// Relay a fetched resource to the caller.
pub fn relay_upstream(upstream: UpstreamResponse, cors: CorsMode) -> Response {
    let headers = sanitize(upstream.headers, cors);
    let mut response = Response::new(Body::from(upstream.body.unwrap_or_default()));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers.into_header_map();
    response
}

/// 400 for the proxy routes (plain text).
pub fn proxy_input_error(err: &InputError) -> Response {
    (StatusCode::BAD_REQUEST, err.to_string()).into_response()
}

/// 500 for the proxy routes (plain text).
pub fn proxy_failure(err: &UpstreamError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Proxy Error: {}", err),
    )
        .into_response()
}

/// 200 with the verdict as JSON.
pub fn relay_verdict(verdict: &FrameVerdict, cors: bool) -> Response {
    with_cors(Json(verdict).into_response(), cors)
}

/// 400 `{error}` for the inspection routes.
pub fn inspect_input_error(err: &InputError, cors: bool) -> Response {
    let body = json!({ "error": err.to_string() });
    with_cors((StatusCode::BAD_REQUEST, Json(body)).into_response(), cors)
}

/// 500 `{error, frameable: false[, customHeaders: {}]}` for the inspection routes.
pub fn inspect_failure(err: &UpstreamError, custom_headers: bool, cors: bool) -> Response {
    let mut body = json!({
        "error": err.to_string(),
        "frameable": false,
    });
    if custom_headers {
        body["customHeaders"] = json!({});
    }
    with_cors((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response(), cors)
}

fn with_cors(mut response: Response, cors: bool) -> Response {
    if !cors {
        return response;
    }
    let mut extra = HeaderSet::new();
    apply_cors(&mut extra);
    let headers = response.headers_mut();
    for (name, value) in extra.into_header_map() {
        if let Some(name) = name {
            headers.insert(name, value);
        }
    }
    headers
        .entry(header::VARY)
        .or_insert(HeaderValue::from_static("origin"));
    response
}

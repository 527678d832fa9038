//! Response header sanitization.
//!
//! # Responsibilities
//! - Strip the headers that stop a browser from framing the resource
//! - Optionally grant unrestricted cross-origin access
//! - Drop hop-by-hop headers that do not survive re-framing of the body
//!
//! # Design Decisions
//! - Matching is case-insensitive; every other header passes through untouched
//! - Content-Type is kept so relayed payloads render as the origin intended

use axum::http::HeaderValue;

use crate::http::header_set::HeaderSet;

pub const X_FRAME_OPTIONS: &str = "x-frame-options";
pub const CONTENT_SECURITY_POLICY: &str = "content-security-policy";
pub const CONTENT_SECURITY_POLICY_REPORT_ONLY: &str = "content-security-policy-report-only";

/// Headers that block iframe embedding.
pub const FRAME_BLOCKING_HEADERS: &[&str] = &[
    X_FRAME_OPTIONS,
    CONTENT_SECURITY_POLICY,
    CONTENT_SECURITY_POLICY_REPORT_ONLY,
];

/// Connection-scoped headers plus content-length, which the server recomputes
/// for the buffered body.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Whether the sanitizer adds the permissive CORS header trio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsMode {
    Omit,
    AllowAll,
}

impl From<bool> for CorsMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            CorsMode::AllowAll
        } else {
            CorsMode::Omit
        }
    }
}

/// Remove every frame-blocking header. Returns the number of entries removed.
pub fn strip_frame_blocking(headers: &mut HeaderSet) -> usize {
    FRAME_BLOCKING_HEADERS
        .iter()
        .map(|name| headers.remove(name))
        .sum()
}

/// Add (or overwrite) the allow-all CORS headers.
pub fn apply_cors(headers: &mut HeaderSet) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert("access-control-allow-headers", HeaderValue::from_static("*"));
}

/// Produce the outbound header set for a relayed upstream response.
pub fn sanitize(mut headers: HeaderSet, cors: CorsMode) -> HeaderSet {
    let stripped = strip_frame_blocking(&mut headers);
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
    if cors == CorsMode::AllowAll {
        apply_cors(&mut headers);
    }
    if stripped > 0 {
        tracing::debug!(stripped, "Removed frame-blocking headers");
    }
    headers
}

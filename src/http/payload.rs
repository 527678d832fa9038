//! Inspection request parsing and input validation.
//!
//! # Responsibilities
//! - Decode the JSON body of `/check` and `/broken`
//! - Enforce presence of `url`, and shape rules when the profile is strict
//! - Collect custom header names when the profile checks them
//!
//! # Design Decisions
//! - Every rejection is an `InputError` (400) raised before any fetch
//! - An empty body reads as `{}` so it reports the missing URL
//! - Lax profiles ignore a mistyped `customHeaders` instead of rejecting it
//! - Non-string entries in `customHeaders` are kept as their JSON text and
//!   never match a header

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::config::EndpointProfile;
use crate::routing::has_http_scheme;

/// Shortest URL accepted by strict validation (`http://a.b`).
pub const MIN_URL_LENGTH: usize = 10;

/// Caller input rejected before contacting the target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("URL is required")]
    MissingUrl,

    #[error("URL must be a valid http:// or https:// URL")]
    InvalidUrl,

    #[error("customHeaders must be an array")]
    CustomHeadersNotArray,

    #[error("Request body must be a JSON object")]
    MalformedBody,
}

/// A validated inspection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectRequest {
    pub url: String,
    /// Names to look up; `None` when not supplied or checking is off.
    pub custom_headers: Option<Vec<String>>,
}

pub fn parse_inspect_request(body: &[u8], profile: &EndpointProfile) -> Result<InspectRequest, InputError> {
    let fields = decode_object(body)?;

    let url = match fields.get("url") {
        None | Some(Value::Null) => return Err(InputError::MissingUrl),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(InputError::MissingUrl),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(InputError::InvalidUrl),
    };
    if profile.strict_validation {
        validate_url(&url)?;
    }

    let custom_headers = match fields.get("customHeaders") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(collect_names(items)),
        Some(_) if profile.strict_validation => return Err(InputError::CustomHeadersNotArray),
        Some(_) => None,
    };

    Ok(InspectRequest {
        url,
        custom_headers: custom_headers.filter(|_| profile.custom_headers.is_enabled()),
    })
}

/// Strict URL shape check: long enough, `http(s)://` prefix, parseable with a host.
pub fn validate_url(url: &str) -> Result<(), InputError> {
    if url.len() < MIN_URL_LENGTH || !has_http_scheme(url) {
        return Err(InputError::InvalidUrl);
    }
    match Url::parse(url) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(InputError::InvalidUrl),
    }
}

fn decode_object(body: &[u8]) -> Result<Map<String, Value>, InputError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        _ => Err(InputError::MalformedBody),
    }
}

fn collect_names(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        })
        .collect()
}

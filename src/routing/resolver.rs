//! Target resolution.
//!
//! # Responsibilities
//! - Accept a plain `http(s)://` target verbatim (legacy wildcard form)
//! - Decode the compact form (unpadded URL-safe base64 of the target URL)
//! - Fall back to the raw input when decoding fails or yields a non-URL
//!
//! # Design Decisions
//! - Resolution never fails; bad targets surface when the fetch is attempted
//! - Padding is restored before decoding so both padded and unpadded input work

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

/// A resolved upstream target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Absolute URL to fetch (or the raw input on fallback).
    pub url: String,
    /// How the URL was obtained.
    pub source: TargetSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    /// Input already started with a scheme.
    Plain,
    /// Input was the compact encoding of a URL.
    Encoded,
    /// Neither; the raw input is used as-is.
    Fallback,
}

pub fn has_http_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Resolve a raw path segment into the URL to fetch.
pub fn resolve_target(raw: &str) -> Target {
    if has_http_scheme(raw) {
        return Target {
            url: raw.to_string(),
            source: TargetSource::Plain,
        };
    }

    match decode_compact(raw) {
        Some(decoded) if has_http_scheme(&decoded) => Target {
            url: decoded,
            source: TargetSource::Encoded,
        },
        _ => {
            tracing::debug!(raw = %raw, "Target is neither a URL nor an encoded URL, using as-is");
            Target {
                url: raw.to_string(),
                source: TargetSource::Fallback,
            }
        }
    }
}

/// Reverse the `-`/`_` substitution, restore padding and decode as UTF-8.
fn decode_compact(raw: &str) -> Option<String> {
    let mut standard: String = raw
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    let bytes = STANDARD.decode(standard.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Produce the compact encoding of a URL.
pub fn encode_target(url: &str) -> String {
    URL_SAFE_NO_PAD.encode(url.as_bytes())
}

//! Upstream response and error definitions.

use axum::http::StatusCode;
use bytes::Bytes;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

use crate::config::EndpointProfile;
use crate::http::header_set::HeaderSet;

/// Response received from the target, after redirects.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// Status of the last response in the redirect chain, passed through as-is.
    pub status: StatusCode,
    pub headers: HeaderSet,
    /// Raw body bytes; `None` for HEAD requests.
    pub body: Option<Bytes>,
}

/// Per-request policy derived from an endpoint profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub spoof_user_agent: bool,
    pub timeout: Option<Duration>,
}

impl From<&EndpointProfile> for FetchOptions {
    fn from(profile: &EndpointProfile) -> Self {
        Self {
            spoof_user_agent: profile.spoof_user_agent,
            timeout: profile.timeout(),
        }
    }
}

/// Errors that can occur while contacting the target.
///
/// The message carries the transport error and its full source chain, as it
/// is shown to the caller verbatim.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Outbound client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Build(String),

    /// Request could not be formed (e.g. the target is not a URL).
    #[error("{0}")]
    InvalidRequest(String),

    /// Deadline elapsed before a response arrived.
    #[error("{0}")]
    Timeout(String),

    /// DNS, connect, TLS or protocol failure.
    #[error("{0}")]
    Transport(String),

    /// Response headers arrived but reading the body failed.
    #[error("{0}")]
    Body(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_builder() {
            UpstreamError::InvalidRequest(message)
        } else if err.is_timeout() {
            UpstreamError::Timeout(message)
        } else if err.is_body() || err.is_decode() {
            UpstreamError::Body(message)
        } else {
            UpstreamError::Transport(message)
        }
    }
}

/// Render an error followed by each of its sources, `: ` separated.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

//! Endpoint handlers.
//!
//! Each endpoint is the same pipeline (resolve → fetch → sanitize/analyze →
//! relay) with its `EndpointProfile` deciding which steps are active.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::EndpointProfile;
use crate::http::payload::{parse_inspect_request, validate_url, InputError};
use crate::http::request::request_id;
use crate::http::response::{
    inspect_failure, inspect_input_error, proxy_failure, proxy_input_error, relay_upstream,
    relay_verdict,
};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{resolve_target, TargetSource};
use crate::security::{inspect, CorsMode};
use crate::upstream::FetchOptions;

/// Endpoint label used in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Proxy,
    Check,
    Broken,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Proxy => "proxy",
            Endpoint::Check => "check",
            Endpoint::Broken => "broken",
        }
    }
}

/// `GET /`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": &*state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "proxy": "GET /proxy/{encodedUrl}",
            "proxyLegacy": "GET /proxy/{url}",
            "check": "POST /check",
            "broken": "POST /broken",
        }
    }))
}

/// `GET /proxy` and `GET /proxy/` with nothing to fetch.
pub async fn proxy_without_target() -> Response {
    let start = Instant::now();
    let response = proxy_input_error(&InputError::MissingUrl);
    metrics::record_request(Endpoint::Proxy.as_str(), response.status().as_u16(), start);
    response
}

/// `GET /proxy/{*target}`: fetch the target and relay it without frame blockers.
pub async fn proxy(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let profile = &state.endpoints.proxy;
    let response = proxy_pipeline(&state, profile, &raw, query.as_deref(), &request_id).await;
    metrics::record_request(Endpoint::Proxy.as_str(), response.status().as_u16(), start);
    response
}

async fn proxy_pipeline(
    state: &AppState,
    profile: &EndpointProfile,
    raw: &str,
    query: Option<&str>,
    request_id: &str,
) -> Response {
    if raw.trim().is_empty() {
        return proxy_input_error(&InputError::MissingUrl);
    }

    let target = resolve_target(raw);
    let url = match (target.source, query) {
        // the wildcard form loses the target's own query string to the router
        (TargetSource::Plain, Some(q)) if !q.is_empty() => format!("{}?{}", target.url, q),
        _ => target.url,
    };

    if profile.strict_validation {
        if let Err(e) = validate_url(&url) {
            tracing::debug!(request_id = %request_id, url = %url, "Rejected proxy target");
            return proxy_input_error(&e);
        }
    }

    tracing::debug!(
        request_id = %request_id,
        source = ?target.source,
        url = %url,
        "Proxying target"
    );

    match state.client.get(&url, FetchOptions::from(profile)).await {
        Ok(upstream) => relay_upstream(upstream, CorsMode::from(profile.cors)),
        Err(e) => {
            tracing::warn!(request_id = %request_id, url = %url, error = %e, "Proxy fetch failed");
            metrics::record_upstream_error(Endpoint::Proxy.as_str());
            proxy_failure(&e)
        }
    }
}

/// `POST /check`
pub async fn check(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    inspection(&state, Endpoint::Check, &state.endpoints.check, &headers, &body).await
}

/// `POST /broken`
pub async fn broken(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    inspection(&state, Endpoint::Broken, &state.endpoints.broken, &headers, &body).await
}

async fn inspection(
    state: &AppState,
    endpoint: Endpoint,
    profile: &EndpointProfile,
    headers: &HeaderMap,
    body: &[u8],
) -> Response {
    let start = Instant::now();
    let request_id = request_id(headers);
    let custom_enabled = profile.custom_headers.is_enabled();

    let response = match parse_inspect_request(body, profile) {
        Err(e) => {
            tracing::debug!(request_id = %request_id, endpoint = endpoint.as_str(), error = %e, "Rejected inspection request");
            inspect_input_error(&e, profile.cors)
        }
        Ok(req) => match state.client.head(&req.url, FetchOptions::from(profile)).await {
            Ok(upstream) => {
                let verdict = inspect(
                    &upstream.headers,
                    req.custom_headers.as_deref(),
                    profile.custom_headers,
                );
                tracing::info!(
                    request_id = %request_id,
                    endpoint = endpoint.as_str(),
                    url = %req.url,
                    upstream_status = %upstream.status,
                    frameable = verdict.frameable,
                    "Inspected target"
                );
                metrics::record_verdict(verdict.frameable);
                relay_verdict(&verdict, profile.cors)
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    endpoint = endpoint.as_str(),
                    url = %req.url,
                    error = %e,
                    "Inspection fetch failed"
                );
                metrics::record_upstream_error(endpoint.as_str());
                inspect_failure(&e, custom_enabled, profile.cors)
            }
        },
    };

    metrics::record_request(endpoint.as_str(), response.status().as_u16(), start);
    response
}

//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Issue exactly one HEAD or GET per inbound request, never retried
//! - Follow at most `max_redirects` hops, then surface the last response
//! - Attach the browser user agent and deadline chosen by the endpoint profile
//!
//! # Design Decisions
//! - Every status code is a successful fetch; only transport failures are errors
//! - Bodies are captured as raw bytes so binary payloads survive unchanged
//! - Dropping the returned future aborts the fetch (caller disconnects)

use axum::http::{header::USER_AGENT, HeaderValue, Method};
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};

use crate::config::UpstreamConfig;
use crate::http::header_set::HeaderSet;
use crate::upstream::types::{FetchOptions, UpstreamError, UpstreamResponse};

/// Shared outbound client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    user_agent: HeaderValue,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| UpstreamError::Build(format!("invalid user agent: {}", e)))?;

        let mut builder = reqwest::Client::builder()
            .redirect(redirect_policy(config.max_redirects))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::Build(e.to_string()))?;

        Ok(Self { client, user_agent })
    }

    /// Fetch headers only.
    pub async fn head(&self, url: &str, options: FetchOptions) -> Result<UpstreamResponse, UpstreamError> {
        self.fetch(Method::HEAD, url, options).await
    }

    /// Fetch headers and the full body.
    pub async fn get(&self, url: &str, options: FetchOptions) -> Result<UpstreamResponse, UpstreamError> {
        self.fetch(Method::GET, url, options).await
    }

    async fn fetch(
        &self,
        method: Method,
        url: &str,
        options: FetchOptions,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let start = Instant::now();
        let mut request = self.client.request(method.clone(), url);
        if options.spoof_user_agent {
            request = request.header(USER_AGENT, self.user_agent.clone());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                let err = UpstreamError::from(e);
                tracing::warn!(
                    method = %method,
                    url = %url,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %err,
                    "Upstream fetch failed"
                );
                return Err(err);
            }
        };

        let status = response.status();
        let headers = HeaderSet::from(response.headers());
        let final_url = response.url().to_string();

        let body = if method == Method::HEAD {
            None
        } else {
            Some(response.bytes().await?)
        };

        tracing::debug!(
            method = %method,
            url = %url,
            final_url = %final_url,
            status = %status,
            bytes = body.as_ref().map(|b| b.len()).unwrap_or(0),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream fetch complete"
        );

        Ok(UpstreamResponse { status, headers, body })
    }
}

/// Follow up to `max` hops; past that, stop and hand back the redirect itself.
fn redirect_policy(max: usize) -> Policy {
    Policy::custom(move |attempt| {
        // previous() holds every URL already requested, the first one included
        if attempt.previous().len() > max {
            tracing::debug!(url = %attempt.url(), max, "Redirect limit reached, returning last response");
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

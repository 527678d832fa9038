//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, request deadline).
    pub server: ServerConfig,

    /// Outbound client policy shared by every endpoint.
    pub upstream: UpstreamConfig,

    /// Per-endpoint pipeline profiles.
    pub endpoints: EndpointsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Total time allowed for one inbound request, upstream fetch included.
    pub request_timeout_secs: u64,

    /// Mount a permissive CORS layer over the relay's own routes.
    pub cors_enabled: bool,

    /// Name reported by the health endpoint.
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 60,
            cors_enabled: true,
            service_name: "Frame Relay".to_string(),
        }
    }
}

/// Outbound HTTP client policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Redirect hops followed before the last response is surfaced as-is.
    pub max_redirects: usize,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User agent sent by profiles with `spoof_user_agent` set.
    pub user_agent: String,

    /// Honour HTTP_PROXY / HTTPS_PROXY from the environment.
    pub use_system_proxy: bool,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            max_redirects: 5,
            connect_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_system_proxy: true,
        }
    }
}

/// How caller-supplied custom header names are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomHeaderMode {
    /// No custom header checking; the `customHeaders` field is omitted.
    Off,
    /// Only names following the `X-` convention are looked up, others are `false`.
    Strict,
    /// Every name is looked up regardless of naming.
    Unconstrained,
}

impl CustomHeaderMode {
    pub fn is_enabled(self) -> bool {
        self != CustomHeaderMode::Off
    }
}

/// Feature flags composing one endpoint out of the shared pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointProfile {
    /// Reject malformed input with 400 before any fetch.
    pub strict_validation: bool,

    /// Add the permissive cross-origin header trio to responses.
    pub cors: bool,

    /// Custom header checking mode (inspection endpoints only).
    pub custom_headers: CustomHeaderMode,

    /// Send the configured browser user agent instead of the client default.
    pub spoof_user_agent: bool,

    /// Upstream request deadline in seconds; `None` relies on transport defaults.
    pub timeout_secs: Option<u64>,
}

impl EndpointProfile {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Profile used by the `/proxy` routes.
    pub fn proxy() -> Self {
        Self {
            strict_validation: false,
            cors: true,
            custom_headers: CustomHeaderMode::Off,
            spoof_user_agent: true,
            timeout_secs: Some(30),
        }
    }

    /// Profile used by `/check`.
    pub fn check() -> Self {
        Self {
            strict_validation: true,
            cors: true,
            custom_headers: CustomHeaderMode::Strict,
            spoof_user_agent: true,
            timeout_secs: Some(5),
        }
    }

    /// Profile used by `/broken`: client defaults, no validation beyond presence.
    pub fn broken() -> Self {
        Self {
            strict_validation: false,
            cors: false,
            custom_headers: CustomHeaderMode::Off,
            spoof_user_agent: false,
            timeout_secs: Some(5),
        }
    }
}

/// One `[endpoints.*]` table as written; unset keys keep the endpoint's own default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    pub strict_validation: Option<bool>,
    pub cors: Option<bool>,
    pub custom_headers: Option<CustomHeaderMode>,
    pub spoof_user_agent: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl ProfileOverrides {
    pub fn apply(self, base: EndpointProfile) -> EndpointProfile {
        EndpointProfile {
            strict_validation: self.strict_validation.unwrap_or(base.strict_validation),
            cors: self.cors.unwrap_or(base.cors),
            custom_headers: self.custom_headers.unwrap_or(base.custom_headers),
            spoof_user_agent: self.spoof_user_agent.unwrap_or(base.spoof_user_agent),
            timeout_secs: self.timeout_secs.or(base.timeout_secs),
        }
    }
}

/// The `[endpoints]` section before merging onto the built-in profiles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EndpointsFile {
    pub proxy: ProfileOverrides,
    pub check: ProfileOverrides,
    pub broken: ProfileOverrides,
}

/// Profiles for each mounted endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(from = "EndpointsFile")]
pub struct EndpointsConfig {
    pub proxy: EndpointProfile,
    pub check: EndpointProfile,
    pub broken: EndpointProfile,
}

impl From<EndpointsFile> for EndpointsConfig {
    fn from(file: EndpointsFile) -> Self {
        Self {
            proxy: file.proxy.apply(EndpointProfile::proxy()),
            check: file.check.apply(EndpointProfile::check()),
            broken: file.broken.apply(EndpointProfile::broken()),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            proxy: EndpointProfile::proxy(),
            check: EndpointProfile::check(),
            broken: EndpointProfile::broken(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (trace, debug, info, warn, error or a full directive).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "frame_relay=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

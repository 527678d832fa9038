//! Frameability analysis.
//!
//! A resource is frameable when it carries no `X-Frame-Options` header and
//! its `Content-Security-Policy` (if any) has no `frame-ancestors` directive.
//! The analysis is a pure function of the response headers.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::CustomHeaderMode;
use crate::http::header_set::HeaderSet;
use crate::security::headers::{CONTENT_SECURITY_POLICY, X_FRAME_OPTIONS};

const FRAME_ANCESTORS: &str = "frame-ancestors";

/// Outcome of inspecting a target's security headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameVerdict {
    pub frameable: bool,
    pub x_frame_options: Option<String>,
    pub csp: Option<String>,
    /// Presence of each requested header; omitted when checking is off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_headers: Option<BTreeMap<String, bool>>,
}

/// Compute the verdict from the two frame-relevant headers.
pub fn analyze(headers: &HeaderSet) -> FrameVerdict {
    let x_frame_options = headers.get(X_FRAME_OPTIONS);
    let csp = headers.get(CONTENT_SECURITY_POLICY);

    let frameable = x_frame_options.is_none()
        && csp.as_deref().map_or(true, |policy| !has_frame_ancestors(policy));

    FrameVerdict {
        frameable,
        x_frame_options,
        csp,
        custom_headers: None,
    }
}

/// Analyze and, when `mode` is enabled and names were supplied, record
/// presence of each custom header.
pub fn inspect(headers: &HeaderSet, custom: Option<&[String]>, mode: CustomHeaderMode) -> FrameVerdict {
    let mut verdict = analyze(headers);
    if let Some(names) = custom.filter(|_| mode.is_enabled()) {
        verdict.custom_headers = Some(check_custom_headers(headers, names, mode));
    }
    verdict
}

/// Presence lookup for each caller-supplied name.
///
/// In strict mode names not following the `X-` convention are recorded as
/// absent without being looked up.
pub fn check_custom_headers(
    headers: &HeaderSet,
    names: &[String],
    mode: CustomHeaderMode,
) -> BTreeMap<String, bool> {
    names
        .iter()
        .map(|name| {
            let present = match mode {
                CustomHeaderMode::Off => false,
                CustomHeaderMode::Strict => is_extension_header_name(name) && headers.contains(name),
                CustomHeaderMode::Unconstrained => headers.contains(name),
            };
            (name.clone(), present)
        })
        .collect()
}

/// `X-` followed by at least one letter, digit or hyphen, nothing else.
pub fn is_extension_header_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 2
        && bytes[..2].eq_ignore_ascii_case(b"x-")
        && bytes[2..].iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

// Directive names are case-insensitive in CSP.
fn has_frame_ancestors(policy: &str) -> bool {
    policy.to_ascii_lowercase().contains(FRAME_ANCESTORS)
}

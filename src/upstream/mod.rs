//! Upstream fetch subsystem.
//!
//! # Data Flow
//! ```text
//! resolved target URL + FetchOptions (from the endpoint profile)
//!     → client.rs (HEAD or GET, bounded redirects, optional deadline)
//!     → UpstreamResponse { status, headers, body } | UpstreamError
//! ```

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{error_chain, FetchOptions, UpstreamError, UpstreamResponse};

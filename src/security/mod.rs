//! Security header subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream response headers:
//!     → headers.rs (strip frame blockers, optional CORS trio) → relayed response
//!     → frameability.rs (verdict + custom header presence)    → JSON report
//! ```
//!
//! # Design Decisions
//! - Both sides share one list of frame-relevant header names
//! - Pure functions over `HeaderSet`; nothing here touches the network

pub mod frameability;
pub mod headers;

pub use frameability::{analyze, inspect, FrameVerdict};
pub use headers::{sanitize, CorsMode};

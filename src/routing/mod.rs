//! Target routing subsystem.
//!
//! # Data Flow
//! ```text
//! /proxy/{*target} path segment
//!     → resolver.rs (plain URL, compact decode, or raw fallback)
//!     → Target (absolute URL handed to the upstream client)
//! ```
//!
//! # Design Decisions
//! - No allow-list: the caller-supplied target is trusted
//! - Empty targets are rejected by the handler before resolution

pub mod resolver;

pub use resolver::{encode_target, has_http_scheme, resolve_target, Target, TargetSource};

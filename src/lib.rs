//! Frame Relay Library
//!
//! Single-hop HTTP relay that fetches a caller-chosen resource, strips the
//! headers that stop it from being framed, and relays it back; plus
//! inspection endpoints reporting whether a target would be frameable.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (endpoint profile picks pipeline steps)
//!         → payload.rs (inspection input validation)
//!         → routing / upstream / security subsystems
//!     → response.rs (relay or JSON verdict)
//!     → Send to client
//! ```

pub mod handlers;
pub mod header_set;
pub mod payload;
pub mod request;
pub mod response;
pub mod server;

pub use header_set::HeaderSet;
pub use payload::InputError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};

//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, shared state)
//!     → request.rs (request ID for log correlation)
//!     → handlers.rs (extract input, call orchestrator / score query)
//!     → response.rs (JSON bodies, error → status mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};

//! Math quiz relay library.
//!
//! Signs and submits quiz contract calls to a MultiversX gateway, waits for
//! them to settle and decodes the contract's fixed-width results.

pub mod codec;
pub mod config;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod orchestrator;
pub mod query;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use orchestrator::{SessionConfig, SubmissionOrchestrator};

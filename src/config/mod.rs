//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Contract address and signing key are NOT part of this file; they are
//!   supplied at runtime through `/set_config` (see `orchestrator::session`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::RelayConfig;
pub use schema::{
    FinalityConfig, FinalityStrategy, GatewayConfig, ListenerConfig, ObservabilityConfig,
    QueryConfig, ScoringConfig, TimeoutConfig,
};

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the quiz relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ledger gateway settings.
    pub gateway: GatewayConfig,

    /// How submissions wait for finality.
    pub finality: FinalityConfig,

    /// Contract query tool settings.
    pub query: QueryConfig,

    /// Answer counting policy.
    pub scoring: ScoringConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5003").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5003".to_string(),
        }
    }
}

/// Ledger gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway (proxy) base URL.
    pub url: String,

    /// Chain identifier signed into every transaction ("D" for devnet).
    pub chain_id: String,

    /// Human-readable part of bech32 addresses.
    pub address_hrp: String,

    /// Gas limit for contract calls.
    pub gas_limit: u64,

    /// Gas price in the smallest denomination.
    pub gas_price: u64,

    /// Transaction version.
    pub tx_version: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "https://devnet-gateway.multiversx.com".to_string(),
            chain_id: "D".to_string(),
            address_hrp: "erd".to_string(),
            gas_limit: 5_000_000,
            gas_price: 1_000_000_000,
            tx_version: 1,
            request_timeout_secs: 10,
        }
    }
}

/// Strategy used while a submitted transaction settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalityStrategy {
    /// Poll the transaction status until it is final or the budget runs out.
    Poll,
    /// Sleep for the whole budget, then fetch.
    Fixed,
}

/// Finality wait configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FinalityConfig {
    pub strategy: FinalityStrategy,

    /// Total time allowed for a transaction to become final, in seconds.
    pub budget_secs: u64,

    /// Delay between status polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for FinalityConfig {
    fn default() -> Self {
        Self {
            strategy: FinalityStrategy::Poll,
            budget_secs: 30,
            poll_interval_ms: 3000,
        }
    }
}

/// Contract query tool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Program and leading arguments, e.g. `["mxpy"]`.
    pub command: Vec<String>,

    /// View function returning a user's accumulated score.
    pub function: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            command: vec!["mxpy".to_string()],
            function: "test_results".to_string(),
        }
    }
}

/// Answer counting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Report 0 correct answers instead of an error when counting fails.
    pub lenient_correct_count: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lenient_correct_count: true,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    ///
    /// Submissions block for the finality budget, so this must exceed it.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 90 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

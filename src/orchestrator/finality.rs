//! Waiting for a submitted transaction to settle.
//!
//! # Strategies
//! - `StatusPoll`: check the transaction status every interval, bounded by
//!   both an attempt count and the total budget; `FinalityTimeout` when
//!   neither produced a final status
//! - `FixedDelay`: sleep for the whole budget and assume finality
//!
//! The pipeline invokes the configured strategy exactly once per submission.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::config::{FinalityConfig, FinalityStrategy};
use crate::ledger::client::Gateway;
use crate::ledger::types::TransactionStatus;
use crate::orchestrator::{OrchestratorError, OrchestratorResult};

/// Blocks a submission until its transaction is final.
#[async_trait]
pub trait FinalityWait: Send + Sync {
    async fn wait(&self, gateway: &dyn Gateway, tx_hash: &str) -> OrchestratorResult<()>;
}

/// Build the strategy selected in configuration.
pub fn from_config(config: &FinalityConfig) -> Arc<dyn FinalityWait> {
    let budget = Duration::from_secs(config.budget_secs);
    match config.strategy {
        FinalityStrategy::Poll => Arc::new(StatusPoll::new(
            budget,
            Duration::from_millis(config.poll_interval_ms),
        )),
        FinalityStrategy::Fixed => Arc::new(FixedDelay(budget)),
    }
}

/// Sleep for a constant duration without consulting the gateway.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl FinalityWait for FixedDelay {
    async fn wait(&self, _gateway: &dyn Gateway, tx_hash: &str) -> OrchestratorResult<()> {
        tracing::debug!(tx_hash, delay = ?self.0, "Waiting fixed delay for finality");
        sleep(self.0).await;
        Ok(())
    }
}

/// Poll the transaction status until final.
#[derive(Debug, Clone, Copy)]
pub struct StatusPoll {
    budget: Duration,
    interval: Duration,
}

impl StatusPoll {
    pub fn new(budget: Duration, interval: Duration) -> Self {
        Self { budget, interval }
    }

    /// Number of status checks that fit in the budget (at least one).
    pub fn max_attempts(&self) -> u32 {
        let interval = self.interval.as_millis().max(1);
        let attempts = self.budget.as_millis().div_ceil(interval);
        attempts.clamp(1, u32::MAX as u128) as u32
    }
}

#[async_trait]
impl FinalityWait for StatusPoll {
    async fn wait(&self, gateway: &dyn Gateway, tx_hash: &str) -> OrchestratorResult<()> {
        let max_attempts = self.max_attempts();
        let mut attempts = 0u32;

        let result = timeout(self.budget, async {
            loop {
                sleep(self.interval).await;
                attempts += 1;

                match gateway.transaction_status(tx_hash).await {
                    Ok(TransactionStatus::Success) => return Ok(()),
                    Ok(TransactionStatus::Failed(status)) => {
                        return Err(OrchestratorError::TransactionFailed {
                            tx_hash: tx_hash.to_string(),
                            status,
                        })
                    }
                    Ok(TransactionStatus::Pending) => {
                        tracing::debug!(tx_hash, attempt = attempts, "Transaction pending");
                    }
                    // A freshly broadcast transaction may not be indexed yet
                    Err(e) => {
                        tracing::debug!(tx_hash, attempt = attempts, error = %e, "Status unavailable");
                    }
                }

                if attempts >= max_attempts {
                    return Err(OrchestratorError::FinalityTimeout {
                        tx_hash: tx_hash.to_string(),
                        attempts,
                        budget_secs: self.budget.as_secs(),
                    });
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(OrchestratorError::FinalityTimeout {
                tx_hash: tx_hash.to_string(),
                attempts,
                budget_secs: self.budget.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::StubGateway;
    use std::time::Instant;

    #[test]
    fn test_max_attempts() {
        let poll = StatusPoll::new(Duration::from_secs(30), Duration::from_secs(3));
        assert_eq!(poll.max_attempts(), 10);

        let poll = StatusPoll::new(Duration::from_millis(100), Duration::from_millis(30));
        assert_eq!(poll.max_attempts(), 4);

        let poll = StatusPoll::new(Duration::from_millis(10), Duration::from_secs(1));
        assert_eq!(poll.max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_from_config() {
        let mut config = FinalityConfig::default();
        assert_eq!(config.strategy, FinalityStrategy::Poll);
        config.budget_secs = 1;
        config.poll_interval_ms = 10;

        let gateway = StubGateway::default().with_statuses(&["pending", "success"]);
        from_config(&config).wait(&gateway, "tx1").await.unwrap();
        assert_eq!(gateway.count("status"), 2);

        config.strategy = FinalityStrategy::Fixed;
        config.budget_secs = 0;
        let gateway = StubGateway::default().with_statuses(&["fail"]);
        from_config(&config).wait(&gateway, "tx1").await.unwrap();
        assert_eq!(gateway.count("status"), 0);
    }

    #[tokio::test]
    async fn test_poll_until_success() {
        let gateway = StubGateway::default().with_statuses(&["pending", "pending", "success"]);
        let poll = StatusPoll::new(Duration::from_secs(5), Duration::from_millis(10));

        poll.wait(&gateway, "tx1").await.unwrap();
        assert_eq!(gateway.count("status"), 3);
    }

    #[tokio::test]
    async fn test_poll_reports_failed_transaction() {
        let gateway = StubGateway::default().with_statuses(&["pending", "fail"]);
        let poll = StatusPoll::new(Duration::from_secs(5), Duration::from_millis(10));

        let err = poll.wait(&gateway, "tx1").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::TransactionFailed { ref status, .. } if status == "fail"));
    }

    #[tokio::test]
    async fn test_poll_times_out() {
        let gateway = StubGateway::default().with_statuses(&["pending"]);
        let poll = StatusPoll::new(Duration::from_millis(200), Duration::from_millis(50));

        let err = poll.wait(&gateway, "tx1").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::FinalityTimeout { .. }));
        assert!(gateway.count("status") <= 4);
    }

    #[tokio::test]
    async fn test_fixed_delay_does_not_poll() {
        let gateway = StubGateway::default();
        let started = Instant::now();

        FixedDelay(Duration::from_millis(50)).wait(&gateway, "tx1").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(gateway.count("status"), 0);
    }
}

//! The submission pipeline: build, sign, send, await finality, fetch, decode.

use std::sync::Arc;
use std::time::Instant;

use crate::codec::{count_success_markers, decode_operations, last_segment, AnswerSet, Operation};
use crate::config::GatewayConfig;
use crate::ledger::client::Gateway;
use crate::ledger::transaction::{ContractCall, TxBuilder};
use crate::ledger::types::{validate_address, TransactionRecord};
use crate::observability::metrics;
use crate::orchestrator::finality::FinalityWait;
use crate::orchestrator::session::SessionConfig;
use crate::orchestrator::{OrchestratorError, OrchestratorResult, Stage};

/// Which contract endpoint a submission invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Generate,
    SubmitAnswers,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Generate => "generate",
            RequestKind::SubmitAnswers => "submit_answers",
        }
    }
}

impl From<&ContractCall> for RequestKind {
    fn from(call: &ContractCall) -> Self {
        match call {
            ContractCall::GenerateTest => RequestKind::Generate,
            ContractCall::SubmitTest(_) => RequestKind::SubmitAnswers,
        }
    }
}

/// Decoded contract output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Operations(Vec<Operation>),
    CorrectCount(usize),
}

/// Outcome of one completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub transaction_id: String,
    /// Final `@` segment of the first result entry.
    pub raw_payload: String,
    pub decoded: Decoded,
}

impl SubmissionResult {
    pub fn operations(&self) -> Option<&[Operation]> {
        match &self.decoded {
            Decoded::Operations(ops) => Some(ops),
            Decoded::CorrectCount(_) => None,
        }
    }

    pub fn correct_count(&self) -> Option<usize> {
        match self.decoded {
            Decoded::CorrectCount(n) => Some(n),
            Decoded::Operations(_) => None,
        }
    }
}

/// Drives generate and submit-answers requests against the gateway.
#[derive(Clone)]
pub struct SubmissionOrchestrator {
    gateway: Arc<dyn Gateway>,
    finality: Arc<dyn FinalityWait>,
    builder: TxBuilder,
    address_hrp: String,
}

impl SubmissionOrchestrator {
    pub fn new(gateway: Arc<dyn Gateway>, finality: Arc<dyn FinalityWait>, config: &GatewayConfig) -> Self {
        Self {
            gateway,
            finality,
            builder: TxBuilder::new(config),
            address_hrp: config.address_hrp.clone(),
        }
    }

    /// Invoke `generate_test` and decode the generated operations.
    pub async fn generate(&self, session: &SessionConfig, sender: &str) -> OrchestratorResult<SubmissionResult> {
        self.submit(session, sender, ContractCall::GenerateTest).await
    }

    /// Invoke `submit_test` and count correct answers.
    pub async fn submit_answers(
        &self,
        session: &SessionConfig,
        sender: &str,
        answers: AnswerSet,
    ) -> OrchestratorResult<SubmissionResult> {
        self.submit(session, sender, ContractCall::SubmitTest(answers)).await
    }

    /// Decode the operations of an earlier `generate_test` transaction.
    pub async fn fetch_operations(&self, tx_hash: &str) -> OrchestratorResult<Vec<Operation>> {
        let record = self.fetch(tx_hash).await?;
        operations_from_record(tx_hash, &record)
    }

    /// Count correct answers in an earlier `submit_test` transaction.
    pub async fn correct_count(&self, tx_hash: &str) -> OrchestratorResult<usize> {
        let record = self.fetch(tx_hash).await?;
        correct_count_from_record(tx_hash, &record)
    }

    async fn fetch(&self, tx_hash: &str) -> OrchestratorResult<TransactionRecord> {
        self.gateway
            .fetch_transaction(tx_hash)
            .await
            .map_err(|source| OrchestratorError::FetchFailed {
                tx_hash: tx_hash.to_string(),
                source,
            })
    }

    async fn submit(
        &self,
        session: &SessionConfig,
        sender: &str,
        call: ContractCall,
    ) -> OrchestratorResult<SubmissionResult> {
        let kind = RequestKind::from(&call);
        let result = self.run(session, sender, call).await;

        match &result {
            Ok(submission) => {
                tracing::info!(
                    kind = kind.as_str(),
                    tx_hash = %submission.transaction_id,
                    stage = %Stage::Decoded,
                    "Submission decoded"
                );
                metrics::record_submission(kind.as_str(), "decoded");
            }
            Err(e) => {
                tracing::warn!(kind = kind.as_str(), stage = %Stage::Failed, error = %e, "Submission failed");
                metrics::record_submission(kind.as_str(), "failed");
            }
        }
        result
    }

    async fn run(
        &self,
        session: &SessionConfig,
        sender: &str,
        call: ContractCall,
    ) -> OrchestratorResult<SubmissionResult> {
        let kind = RequestKind::from(&call);
        validate_address(sender, &self.address_hrp)
            .map_err(|_| OrchestratorError::InvalidSender(sender.to_string()))?;

        if sender != session.signer().address() {
            tracing::warn!(
                sender,
                signer = session.signer().address(),
                "Sender differs from the configured signing identity"
            );
        }

        tracing::debug!(kind = kind.as_str(), stage = %Stage::Submitting, "Building transaction");
        let nonce = self.gateway.account_nonce(sender).await?;
        let tx = self.builder.build(sender, session.contract_address(), nonce, &call);
        let tx = self.builder.sign(tx, session.signer())?;
        let tx_hash = self.gateway.send_transaction(&tx).await?;

        tracing::info!(
            kind = kind.as_str(),
            tx_hash = %tx_hash,
            nonce,
            stage = %Stage::AwaitingFinality,
            "Transaction sent"
        );
        let started = Instant::now();
        self.finality.wait(self.gateway.as_ref(), &tx_hash).await?;
        metrics::record_finality_wait(started.elapsed());

        tracing::debug!(tx_hash = %tx_hash, stage = %Stage::Fetching, "Fetching results");
        let record = self.fetch(&tx_hash).await?;
        let (raw_payload, decoded) = decode_record(kind, &tx_hash, &record)?;

        Ok(SubmissionResult {
            transaction_id: tx_hash,
            raw_payload,
            decoded,
        })
    }
}

/// Final `@` segment of the first result entry.
fn first_payload<'a>(tx_hash: &str, record: &'a TransactionRecord) -> OrchestratorResult<&'a str> {
    record
        .smart_contract_results
        .first()
        .map(|first| last_segment(first.data_or_empty()))
        .ok_or_else(|| OrchestratorError::NoResultsFound {
            tx_hash: tx_hash.to_string(),
        })
}

/// Decode generated operations from the first result entry.
pub fn operations_from_record(tx_hash: &str, record: &TransactionRecord) -> OrchestratorResult<Vec<Operation>> {
    Ok(decode_operations(first_payload(tx_hash, record)?)?)
}

/// Count success markers over the full data of every result entry.
pub fn correct_count_from_record(tx_hash: &str, record: &TransactionRecord) -> OrchestratorResult<usize> {
    first_payload(tx_hash, record)?;
    Ok(count_success_markers(
        record
            .smart_contract_results
            .iter()
            .filter_map(|r| r.data.as_deref()),
    ))
}

/// Route a fetched record to the decoder matching `kind`.
pub fn decode_record(
    kind: RequestKind,
    tx_hash: &str,
    record: &TransactionRecord,
) -> OrchestratorResult<(String, Decoded)> {
    let payload = first_payload(tx_hash, record)?.to_string();
    let decoded = match kind {
        RequestKind::Generate => Decoded::Operations(operations_from_record(tx_hash, record)?),
        RequestKind::SubmitAnswers => Decoded::CorrectCount(correct_count_from_record(tx_hash, record)?),
    };
    Ok((payload, decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SUCCESS_MARKER_HEX;
    use crate::ledger::types::ContractResult;
    use crate::ledger::wallet::pem_for_secret;
    use crate::orchestrator::test_support::StubGateway;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    const CONTRACT: &str = "erd1qqqqqqqqqqqqqpgqhe8t5jewej70zupmh44jurgn29psua5l2jps3ntjj3";
    const SENDER: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";
    const GENERATED: &str = "@6f6b@03202b20040009202f20020005202d200100";

    #[derive(Default)]
    struct CountingWait {
        calls: AtomicU32,
    }

    #[async_trait]
    impl FinalityWait for CountingWait {
        async fn wait(&self, _gateway: &dyn Gateway, _tx_hash: &str) -> OrchestratorResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn session() -> SessionConfig {
        SessionConfig::configure(CONTRACT, &pem_for_secret([11u8; 32], SENDER), "erd").unwrap()
    }

    fn orchestrator(gateway: Arc<StubGateway>, wait: Arc<CountingWait>) -> SubmissionOrchestrator {
        SubmissionOrchestrator::new(gateway, wait, &GatewayConfig::default())
    }

    fn feedback(words: &[&str]) -> String {
        let slots: String = words
            .iter()
            .map(|w| {
                let mut bytes = w.as_bytes().to_vec();
                bytes.resize(12, 0);
                hex::encode(bytes)
            })
            .collect();
        format!("@6f6b@{}", slots)
    }

    #[tokio::test]
    async fn test_generate_full_pass() {
        let gateway = Arc::new(StubGateway::default().with_results(&[GENERATED]));
        let wait = Arc::new(CountingWait::default());
        let orch = orchestrator(gateway.clone(), wait.clone());

        let result = orch.generate(&session(), SENDER).await.unwrap();

        assert_eq!(result.transaction_id, "txhash-0");
        assert_eq!(result.raw_payload, "03202b20040009202f20020005202d200100");
        let ops = result.operations().unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[1].expression(), "9 / 2");

        assert_eq!(gateway.calls(), vec!["nonce", "send", "fetch"]);
        assert_eq!(wait.calls.load(Ordering::SeqCst), 1);

        let sent = gateway.sent();
        assert_eq!(sent[0].nonce, 42);
        assert_eq!(sent[0].receiver, CONTRACT);
        assert_eq!(sent[0].sender, SENDER);
        assert_eq!(sent[0].call_data().as_deref(), Some("generate_test"));
        assert!(sent[0].signature.is_some());
    }

    #[tokio::test]
    async fn test_submit_answers_counts_markers() {
        let data = feedback(&["Correct", "Incorrect", "Correct", "Incorrect", "Incorrect"]);
        let gateway = Arc::new(StubGateway::default().with_results(&[data.as_str(), "@6f6b"]));
        let wait = Arc::new(CountingWait::default());
        let orch = orchestrator(gateway.clone(), wait.clone());

        let answers = AnswerSet::new([7, -1, 3, 0, 12]);
        let result = orch.submit_answers(&session(), SENDER, answers).await.unwrap();

        assert_eq!(result.correct_count(), Some(2));
        assert_eq!(wait.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            gateway.sent()[0].call_data().as_deref(),
            Some("submit_test@07ff03000c00")
        );
    }

    #[tokio::test]
    async fn test_no_results_fails_without_decoding() {
        let gateway = Arc::new(StubGateway::default());
        let wait = Arc::new(CountingWait::default());
        let orch = orchestrator(gateway.clone(), wait.clone());

        let err = orch.generate(&session(), SENDER).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NoResultsFound { ref tx_hash } if tx_hash == "txhash-0"));
        assert_eq!(wait.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.count("fetch"), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_retried() {
        let gateway = Arc::new(StubGateway::default().failing_fetch());
        let wait = Arc::new(CountingWait::default());
        let orch = orchestrator(gateway.clone(), wait.clone());

        let err = orch.generate(&session(), SENDER).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::FetchFailed { .. }));
        assert!(err.to_string().contains("txhash-0"));
        assert_eq!(gateway.count("fetch"), 1);
        assert_eq!(wait.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_sender_stops_before_gateway() {
        let gateway = Arc::new(StubGateway::default());
        let wait = Arc::new(CountingWait::default());
        let orch = orchestrator(gateway.clone(), wait.clone());

        let err = orch.generate(&session(), "not-an-address").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidSender(_)));
        assert!(gateway.calls().is_empty());
        assert_eq!(wait.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_operations_matches_generate() {
        let gateway = Arc::new(StubGateway::default().with_results(&[GENERATED]));
        let orch = orchestrator(gateway, Arc::new(CountingWait::default()));

        let generated = orch.generate(&session(), SENDER).await.unwrap();
        let fetched = orch.fetch_operations(&generated.transaction_id).await.unwrap();
        assert_eq!(generated.operations().unwrap(), fetched.as_slice());
    }

    #[tokio::test]
    async fn test_correct_count_distinguishes_failure_from_zero() {
        let orch = orchestrator(
            Arc::new(StubGateway::default().with_results(&[feedback(&["Incorrect"; 5]).as_str()])),
            Arc::new(CountingWait::default()),
        );
        assert_eq!(orch.correct_count("tx").await.unwrap(), 0);

        let orch = orchestrator(
            Arc::new(StubGateway::default().failing_fetch()),
            Arc::new(CountingWait::default()),
        );
        assert!(orch.correct_count("tx").await.is_err());
    }

    #[test]
    fn test_decode_record_routes_by_kind() {
        let record = TransactionRecord {
            smart_contract_results: vec![
                ContractResult {
                    data: Some(format!("@6f6b@{}", SUCCESS_MARKER_HEX)),
                },
                ContractResult { data: None },
                ContractResult {
                    data: Some(SUCCESS_MARKER_HEX.to_string()),
                },
            ],
            ..TransactionRecord::default()
        };

        let (payload, decoded) = decode_record(RequestKind::SubmitAnswers, "tx", &record).unwrap();
        assert_eq!(payload, SUCCESS_MARKER_HEX);
        assert_eq!(decoded, Decoded::CorrectCount(2));

        let (_, decoded) = decode_record(RequestKind::Generate, "tx", &record).unwrap();
        assert!(matches!(decoded, Decoded::Operations(ref ops) if ops.len() == 2));
    }
}

//! Subprocess invocation of the contract-query tool.

use std::process::Stdio;
use tokio::process::Command;

use crate::config::{GatewayConfig, QueryConfig};
use crate::query::QueryError;

/// Runs `<command...> contract query <contract> --function=<fn> --proxy=<url> --arguments=<user>`.
#[derive(Debug, Clone)]
pub struct ScoreQuery {
    command: Vec<String>,
    function: String,
    gateway_url: String,
}

impl ScoreQuery {
    pub fn new(query: &QueryConfig, gateway: &GatewayConfig) -> Self {
        Self {
            command: query.command.clone(),
            function: query.function.clone(),
            gateway_url: gateway.url.clone(),
        }
    }

    /// Arguments passed after the configured command prefix.
    fn arguments(&self, contract_address: &str, user_address: &str) -> Vec<String> {
        vec![
            "contract".to_string(),
            "query".to_string(),
            contract_address.to_string(),
            format!("--function={}", self.function),
            format!("--proxy={}", self.gateway_url),
            format!("--arguments={}", user_address),
        ]
    }

    /// Query the accumulated score of `user_address`.
    pub async fn final_score(&self, contract_address: &str, user_address: &str) -> Result<u64, QueryError> {
        let (program, prefix) = self
            .command
            .split_first()
            .ok_or_else(|| QueryError::Spawn(std::io::Error::other("empty query command")))?;

        tracing::debug!(
            program = %program,
            contract = %contract_address,
            user = %user_address,
            "Running contract query"
        );

        let output = Command::new(program)
            .args(prefix)
            .args(self.arguments(contract_address, user_address))
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(code = ?output.status.code(), stderr = %stderr, "Contract query failed");
            return Err(QueryError::SubprocessFailure {
                code: output.status.code(),
                stderr,
            });
        }

        parse_score_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse tool output such as `["0c"]` into an integer.
///
/// Brackets, quotes and whitespace are stripped and the first
/// comma-separated value is read as hex. An empty quoted value is the
/// ledger's encoding of zero; output with no value at all is an error.
pub fn parse_score_output(stdout: &str) -> Result<u64, QueryError> {
    let raw = stdout.trim();
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '[' | ']' | '"')).collect();
    let first = cleaned.split(',').next().unwrap_or("").trim();

    if first.is_empty() {
        if raw.contains('"') {
            return Ok(0);
        }
        return Err(QueryError::ParseFailure {
            value: raw.to_string(),
            reason: "no value in output".to_string(),
        });
    }

    let digits = first
        .strip_prefix("0x")
        .or_else(|| first.strip_prefix("0X"))
        .unwrap_or(first);
    u64::from_str_radix(digits, 16).map_err(|e| QueryError::ParseFailure {
        value: first.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_with(command: &[&str]) -> ScoreQuery {
        let query = QueryConfig {
            command: command.iter().map(|s| s.to_string()).collect(),
            ..QueryConfig::default()
        };
        ScoreQuery::new(&query, &GatewayConfig::default())
    }

    #[test]
    fn test_parse_score_output() {
        assert_eq!(parse_score_output("[\"0c\"]\n").unwrap(), 12);
        assert_eq!(parse_score_output("[\n  \"14\"\n]").unwrap(), 20);
        assert_eq!(parse_score_output("0x1f").unwrap(), 31);
        assert_eq!(parse_score_output("[\"\"]").unwrap(), 0);
        assert_eq!(parse_score_output("[\"08\", \"01\"]").unwrap(), 8);
    }

    #[test]
    fn test_parse_score_failures() {
        assert!(matches!(parse_score_output(""), Err(QueryError::ParseFailure { .. })));
        assert!(matches!(parse_score_output("[]"), Err(QueryError::ParseFailure { .. })));
        let err = parse_score_output("[\"zz\"]").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse hex value: zz"));
    }

    #[test]
    fn test_arguments() {
        let query = query_with(&["mxpy"]);
        let args = query.arguments("erd1contract", "erd1user");
        assert_eq!(
            args,
            vec![
                "contract",
                "query",
                "erd1contract",
                "--function=test_results",
                "--proxy=https://devnet-gateway.multiversx.com",
                "--arguments=erd1user",
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_final_score_from_subprocess() {
        let query = query_with(&["sh", "-c", "echo '[\"0c\"]'"]);
        assert_eq!(query.final_score("erd1contract", "erd1user").await.unwrap(), 12);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_subprocess_failure_captures_stderr() {
        let query = query_with(&["sh", "-c", "echo 'unknown contract' >&2; exit 3"]);
        let err = query.final_score("erd1contract", "erd1user").await.unwrap_err();
        match err {
            QueryError::SubprocessFailure { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "unknown contract");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let query = query_with(&["definitely-not-a-real-query-tool"]);
        let err = query.final_score("erd1contract", "erd1user").await.unwrap_err();
        assert!(matches!(err, QueryError::Spawn(_)));
    }
}

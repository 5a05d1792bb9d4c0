//! Serde models for the Horizon REST API
//!
//! Only the fields the tools read are modeled; Horizon responses carry
//! many more, which serde ignores.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One asset balance on an account
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub balance: String,
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
}

impl Balance {
    /// Whether this is the native XLM balance
    pub fn is_native(&self) -> bool {
        self.asset_type == "native"
    }
}

/// A signer attached to an account
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSigner {
    pub key: String,
    pub weight: u32,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Account operation thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    pub low_threshold: u32,
    pub med_threshold: u32,
    pub high_threshold: u32,
}

/// A Horizon account record
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    /// Sequence numbers exceed 2^53, so Horizon sends them as strings
    pub sequence: String,
    pub subentry_count: u32,
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub signers: Vec<AccountSigner>,
    #[serde(default)]
    pub thresholds: Option<Thresholds>,
}

/// A transaction as returned by Horizon
#[derive(Debug, Clone, Deserialize)]
pub struct TxRecord {
    pub hash: String,
    pub ledger: u64,
    pub created_at: DateTime<Utc>,
    pub source_account: String,
    pub fee_charged: String,
    pub operation_count: u32,
    pub successful: bool,
    #[serde(default)]
    pub memo: Option<String>,
}

/// An operation within a transaction
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
}

/// A ledger header record
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRecord {
    pub sequence: u64,
    pub closed_at: DateTime<Utc>,
    #[serde(default)]
    pub successful_transaction_count: u32,
}

/// The `/fee_stats` response
#[derive(Debug, Clone, Deserialize)]
pub struct FeeStats {
    pub last_ledger_base_fee: String,
}

/// A successful `POST /transactions` response
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub hash: String,
    pub ledger: u64,
    pub successful: bool,
    pub fee_charged: String,
    #[serde(default)]
    pub operation_count: u32,
}

/// A HAL collection page
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedded<T> {
    pub records: Vec<T>,
}

/// An RFC 7807 problem document from Horizon
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub extras: Option<ProblemExtras>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemExtras {
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Option<Vec<String>>,
}

impl ProblemBody {
    /// One-line description suitable for error messages
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(title.clone());
        }
        if let Some(detail) = &self.detail {
            parts.push(detail.clone());
        }
        if let Some(codes) = self
            .extras
            .as_ref()
            .and_then(|e| e.result_codes.as_ref())
        {
            if let Some(tx) = &codes.transaction {
                parts.push(format!("tx: {}", tx));
            }
            if let Some(ops) = &codes.operations {
                parts.push(format!("ops: {}", ops.join(", ")));
            }
        }
        if parts.is_empty() {
            "unknown Horizon error".to_string()
        } else {
            parts.join(" - ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_record_deserializes() {
        let json = r#"{
            "account_id": "GABC",
            "sequence": "123456789012345678",
            "subentry_count": 1,
            "balances": [
                {"balance": "100.5000000", "asset_type": "native"},
                {"balance": "42.0000000", "asset_type": "credit_alphanum4",
                 "asset_code": "OGC", "asset_issuer": "GISSUER"}
            ],
            "signers": [{"key": "GABC", "weight": 1, "type": "ed25519_public_key"}],
            "thresholds": {"low_threshold": 0, "med_threshold": 0, "high_threshold": 0}
        }"#;
        let account: AccountRecord = serde_json::from_str(json).unwrap();
        assert_eq!(account.sequence, "123456789012345678");
        assert_eq!(account.balances.len(), 2);
        assert!(account.balances[0].is_native());
        assert_eq!(account.balances[1].asset_code.as_deref(), Some("OGC"));
    }

    #[test]
    fn test_page_of_transactions_deserializes() {
        let json = r#"{
            "_embedded": {
                "records": [{
                    "hash": "abc123",
                    "ledger": 500,
                    "created_at": "2026-08-01T12:00:00Z",
                    "source_account": "GABC",
                    "fee_charged": "100",
                    "operation_count": 3,
                    "successful": true
                }]
            }
        }"#;
        let page: Page<TxRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(page.embedded.records.len(), 1);
        assert_eq!(page.embedded.records[0].operation_count, 3);
    }

    #[test]
    fn test_operation_record_renames_type() {
        let json = r#"{
            "id": "1",
            "type": "payment",
            "created_at": "2026-08-01T12:00:00Z",
            "from": "GAAA",
            "to": "GBBB",
            "amount": "10.0000000",
            "asset_code": "OGC"
        }"#;
        let op: OperationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(op.kind, "payment");
        assert_eq!(op.amount.as_deref(), Some("10.0000000"));
    }

    #[test]
    fn test_problem_summary_includes_result_codes() {
        let json = r#"{
            "title": "Transaction Failed",
            "detail": "The transaction failed",
            "extras": {"result_codes": {"transaction": "tx_failed",
                                        "operations": ["op_underfunded"]}}
        }"#;
        let problem: ProblemBody = serde_json::from_str(json).unwrap();
        let summary = problem.summary();
        assert!(summary.contains("tx_failed"));
        assert!(summary.contains("op_underfunded"));
    }

    #[test]
    fn test_problem_summary_empty_body() {
        let problem: ProblemBody = serde_json::from_str("{}").unwrap();
        assert_eq!(problem.summary(), "unknown Horizon error");
    }
}

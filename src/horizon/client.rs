//! Thin HTTP client for the Horizon REST API

use super::types::{
    AccountRecord, FeeStats, LedgerRecord, OperationRecord, Page, ProblemBody, SubmitResponse,
    TxRecord,
};
use crate::types::ToolError;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Friendbot endpoint for funding testnet accounts
pub const FRIENDBOT_URL: &str = "https://friendbot.stellar.org";

/// Client for a single Horizon instance
#[derive(Debug, Clone)]
pub struct HorizonClient {
    http: Client,
    base_url: String,
}

impl HorizonClient {
    /// Build a client with the given request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ToolError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::Http {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ToolError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let detail = match response.json::<ProblemBody>().await {
            Ok(problem) => problem.summary(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };

        if status == StatusCode::BAD_REQUEST {
            // 400 on submission means the network rejected the envelope
            return Err(ToolError::SubmitRejected { detail });
        }
        Err(ToolError::Horizon {
            status: status.as_u16(),
            detail,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ToolError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "horizon request");
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    /// Fetch an account by ID
    pub async fn account(&self, account_id: &str) -> Result<AccountRecord, ToolError> {
        self.get_json(&format!("/accounts/{}", account_id)).await
    }

    /// Fetch recent transactions for an account, newest first when `desc`
    pub async fn transactions_for_account(
        &self,
        account_id: &str,
        limit: u32,
        desc: bool,
    ) -> Result<Vec<TxRecord>, ToolError> {
        let order = if desc { "desc" } else { "asc" };
        let page: Page<TxRecord> = self
            .get_json(&format!(
                "/accounts/{}/transactions?limit={}&order={}",
                account_id, limit, order
            ))
            .await?;
        Ok(page.embedded.records)
    }

    /// Fetch the operations of a transaction
    pub async fn operations_for_transaction(
        &self,
        hash: &str,
    ) -> Result<Vec<OperationRecord>, ToolError> {
        let page: Page<OperationRecord> = self
            .get_json(&format!("/transactions/{}/operations?limit=200", hash))
            .await?;
        Ok(page.embedded.records)
    }

    /// Fetch recent payment operations for an account
    pub async fn payments_for_account(
        &self,
        account_id: &str,
        limit: u32,
    ) -> Result<Vec<OperationRecord>, ToolError> {
        let page: Page<OperationRecord> = self
            .get_json(&format!(
                "/accounts/{}/payments?limit={}&order=desc",
                account_id, limit
            ))
            .await?;
        Ok(page.embedded.records)
    }

    /// Fetch the most recently closed ledger
    pub async fn latest_ledger(&self) -> Result<LedgerRecord, ToolError> {
        let page: Page<LedgerRecord> = self.get_json("/ledgers?order=desc&limit=1").await?;
        page.embedded
            .records
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::Http {
                message: "Horizon returned no ledgers".to_string(),
            })
    }

    /// Fetch the network's current base fee in stroops
    pub async fn base_fee(&self) -> Result<u32, ToolError> {
        let stats: FeeStats = self.get_json("/fee_stats").await?;
        stats
            .last_ledger_base_fee
            .parse()
            .map_err(|_| ToolError::Http {
                message: format!("unparseable base fee: {}", stats.last_ledger_base_fee),
            })
    }

    /// Submit a signed, base64-encoded transaction envelope
    pub async fn submit_envelope(&self, xdr: &str) -> Result<SubmitResponse, ToolError> {
        let url = format!("{}/transactions", self.base_url);
        tracing::debug!(%url, "submitting transaction envelope");
        let response = self.http.post(&url).form(&[("tx", xdr)]).send().await?;
        Self::decode(response).await
    }

    /// Ask friendbot to fund a testnet account
    pub async fn fund_testnet_account(&self, account_id: &str) -> Result<(), ToolError> {
        let url = format!("{}/?addr={}", FRIENDBOT_URL, account_id);
        tracing::debug!(%url, "requesting friendbot funding");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ProblemBody>().await {
                Ok(problem) => problem.summary(),
                Err(_) => "friendbot request failed".to_string(),
            };
            return Err(ToolError::Horizon {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(())
    }
}

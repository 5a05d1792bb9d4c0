//! Transparency reporting over Horizon history
//!
//! Reports summarize token issuance and movement for a time window:
//! current stats cover the last 24 hours, monthly and annual reports cover
//! calendar windows and are written to the configured reports directory as
//! JSON (and HTML for monthly reports).

use crate::config::Config;
use crate::format::html::render_transparency_html;
use crate::horizon::{HorizonClient, OperationRecord};
use crate::types::ToolError;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

/// Payments above this many tokens are listed individually
const LARGE_TX_THRESHOLD: i64 = 1000;

/// At most this many large transactions appear in a report
const LARGE_TX_LIMIT: usize = 20;

/// How many recent issuer transactions a report examines
const HISTORY_LIMIT: u32 = 200;

/// Token supply figures
#[derive(Debug, Clone, Serialize)]
pub struct SupplyInfo {
    pub token_code: String,
    /// Supply declared in configuration
    pub declared_supply: Decimal,
    /// Tokens observed leaving the issuer in recent history
    pub observed_issued: Decimal,
    /// XLM the issuer holds for fees and reserves
    pub issuer_xlm_balance: Decimal,
}

/// One payment large enough to list individually
#[derive(Debug, Clone, Serialize)]
pub struct LargeTransaction {
    pub created_at: DateTime<Utc>,
    pub to: String,
    pub amount: Decimal,
}

/// Aggregate token activity over a time window
#[derive(Debug, Clone, Serialize)]
pub struct ActivityAnalysis {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub transaction_count: usize,
    pub payment_count: usize,
    pub total_volume: Decimal,
    pub average_payment: Decimal,
    pub smallest_payment: Decimal,
    pub largest_payment: Decimal,
    pub unique_recipients: usize,
    pub large_transactions: Vec<LargeTransaction>,
}

/// A complete transparency report, ready to serialize
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub period: String,
    pub network: String,
    pub token_code: String,
    pub issuer: String,
    pub supply: SupplyInfo,
    pub activity: ActivityAnalysis,
}

/// Files written for a report
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub html: Option<PathBuf>,
}

/// UTC window covering one calendar month
pub fn month_window(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), ToolError> {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ToolError::Report {
            message: format!("invalid month: {}-{:02}", year, month),
        })?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ToolError::Report {
            message: format!("invalid month: {}-{:02}", next_year, next_month),
        })?;
    Ok((start, end))
}

/// The month before the given one, rolling December back a year
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn parse_horizon_amount(amount: &str) -> Decimal {
    Decimal::from_str(amount).unwrap_or(Decimal::ZERO)
}

/// Summarize payment operations of one asset within a window
fn summarize_payments(
    operations: &[OperationRecord],
    token_code: &str,
    issuer: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    transaction_count: usize,
) -> ActivityAnalysis {
    let mut total_volume = Decimal::ZERO;
    let mut recipients = std::collections::HashSet::new();
    let mut large = Vec::new();
    let mut payment_count = 0;
    let mut smallest: Option<Decimal> = None;
    let mut largest = Decimal::ZERO;

    let threshold = Decimal::from(LARGE_TX_THRESHOLD);
    for op in operations {
        if op.kind != "payment"
            || op.asset_code.as_deref() != Some(token_code)
            || op.asset_issuer.as_deref() != Some(issuer)
        {
            continue;
        }
        let amount = op
            .amount
            .as_deref()
            .map(parse_horizon_amount)
            .unwrap_or(Decimal::ZERO);
        payment_count += 1;
        total_volume += amount;
        smallest = Some(smallest.map_or(amount, |s| s.min(amount)));
        largest = largest.max(amount);
        if let Some(to) = &op.to {
            recipients.insert(to.clone());
        }
        if amount > threshold {
            large.push(LargeTransaction {
                created_at: op.created_at,
                to: op.to.clone().unwrap_or_default(),
                amount,
            });
        }
    }

    large.sort_by(|a, b| b.amount.cmp(&a.amount));
    large.truncate(LARGE_TX_LIMIT);

    let average_payment = if payment_count > 0 {
        (total_volume / Decimal::from(payment_count)).round_dp(7)
    } else {
        Decimal::ZERO
    };

    ActivityAnalysis {
        window_start,
        window_end,
        transaction_count,
        payment_count,
        total_volume,
        average_payment,
        smallest_payment: smallest.unwrap_or(Decimal::ZERO),
        largest_payment: largest,
        unique_recipients: recipients.len(),
        large_transactions: large,
    }
}

/// Builds transparency reports from Horizon history
pub struct TransparencyReporter {
    client: HorizonClient,
    config: Config,
}

impl TransparencyReporter {
    pub fn new(client: HorizonClient, config: Config) -> Self {
        Self { client, config }
    }

    fn issuer(&self) -> Result<&str, ToolError> {
        if self.config.issuer_public_key.is_empty() {
            return Err(ToolError::config(
                "issuer public key must be configured for reports",
            ));
        }
        Ok(&self.config.issuer_public_key)
    }

    /// Current supply figures for the configured token
    pub async fn supply_info(&self) -> Result<SupplyInfo, ToolError> {
        let issuer = self.issuer()?;
        let account = self.client.account(issuer).await?;

        let issuer_xlm_balance = account
            .balances
            .iter()
            .find(|b| b.is_native())
            .map(|b| parse_horizon_amount(&b.balance))
            .unwrap_or(Decimal::ZERO);

        let payments = self.client.payments_for_account(issuer, HISTORY_LIMIT).await?;
        let observed_issued = payments
            .iter()
            .filter(|op| {
                op.kind == "payment"
                    && op.from.as_deref() == Some(issuer)
                    && op.asset_code.as_deref() == Some(self.config.token_code.as_str())
            })
            .map(|op| {
                op.amount
                    .as_deref()
                    .map(parse_horizon_amount)
                    .unwrap_or(Decimal::ZERO)
            })
            .sum();

        Ok(SupplyInfo {
            token_code: self.config.token_code.clone(),
            declared_supply: Decimal::from_str(&self.config.total_supply)
                .unwrap_or(Decimal::ZERO),
            observed_issued,
            issuer_xlm_balance,
        })
    }

    /// Analyze token activity inside a time window
    ///
    /// Walks recent issuer transactions newest-first and fetches the
    /// operations of those inside the window. A transaction whose
    /// operations cannot be fetched is skipped with a warning rather than
    /// failing the whole report.
    pub async fn analyze_activity(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<ActivityAnalysis, ToolError> {
        let issuer = self.issuer()?;
        let transactions = self
            .client
            .transactions_for_account(issuer, HISTORY_LIMIT, true)
            .await?;

        let mut operations = Vec::new();
        let mut transaction_count = 0;
        for tx in transactions {
            if tx.created_at < window_start {
                break; // newest-first, everything after this is older
            }
            if tx.created_at >= window_end || !tx.successful {
                continue;
            }
            transaction_count += 1;
            match self.client.operations_for_transaction(&tx.hash).await {
                Ok(ops) => operations.extend(ops),
                Err(e) => {
                    tracing::warn!(hash = %tx.hash, error = %e, "skipping transaction");
                }
            }
        }

        Ok(summarize_payments(
            &operations,
            &self.config.token_code,
            issuer,
            window_start,
            window_end,
            transaction_count,
        ))
    }

    async fn build_report(
        &self,
        period: String,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<ReportData, ToolError> {
        let supply = self.supply_info().await?;
        let activity = self.analyze_activity(window_start, window_end).await?;
        Ok(ReportData {
            generated_at: Utc::now(),
            period,
            network: self.config.network.to_string(),
            token_code: self.config.token_code.clone(),
            issuer: self.config.issuer_public_key.clone(),
            supply,
            activity,
        })
    }

    fn reports_dir(&self) -> Result<PathBuf, ToolError> {
        let dir = PathBuf::from(&self.config.reports_dir);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn write_json(&self, data: &ReportData, filename: &str) -> Result<PathBuf, ToolError> {
        let path = self.reports_dir()?.join(filename);
        std::fs::write(&path, serde_json::to_string_pretty(data)? + "\n")?;
        Ok(path)
    }

    /// Stats for the last 24 hours, not written to disk
    pub async fn current_stats(&self) -> Result<ReportData, ToolError> {
        let end = Utc::now();
        let start = end - chrono::Duration::hours(24);
        self.build_report("last 24 hours".to_string(), start, end)
            .await
    }

    /// Write the monthly transparency report as JSON and HTML
    pub async fn monthly_report(&self, year: i32, month: u32) -> Result<ReportPaths, ToolError> {
        let (start, end) = month_window(year, month)?;
        let data = self
            .build_report(format!("{}-{:02}", year, month), start, end)
            .await?;

        let json = self.write_json(&data, &format!("ogc_transparency_{}-{:02}.json", year, month))?;
        let html_path = self
            .reports_dir()?
            .join(format!("ogc_transparency_{}-{:02}.html", year, month));
        std::fs::write(&html_path, render_transparency_html(&data))?;

        Ok(ReportPaths {
            json,
            html: Some(html_path),
        })
    }

    /// Write the report for the month before the current one
    pub async fn previous_month_report(&self) -> Result<ReportPaths, ToolError> {
        let now = Utc::now();
        let (year, month) = previous_month(now.year(), now.month());
        self.monthly_report(year, month).await
    }

    /// Write an annual summary as JSON
    pub async fn annual_summary(&self, year: i32) -> Result<ReportPaths, ToolError> {
        let (start, _) = month_window(year, 1)?;
        let (_, end) = month_window(year, 12)?;
        let data = self.build_report(year.to_string(), start, end).await?;
        let json = self.write_json(&data, &format!("ogc_annual_summary_{}.json", year))?;
        Ok(ReportPaths { json, html: None })
    }
}

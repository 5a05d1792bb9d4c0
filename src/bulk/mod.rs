//! Bulk payment pipeline: validate, batch, submit, summarize
//!
//! Payments are read from CSV, validated, split into batches of at most
//! 100 operations, and handed to the [`Ledger`] seam one transaction per
//! batch. A failed batch is recorded and processing continues; only a
//! ledger that cannot submit at all aborts the run.

use crate::config::Config;
use crate::io::PaymentReader;
use crate::ledger::Ledger;
use crate::types::{
    BatchOutcome, BatchPlan, FeeEstimate, PaymentRecord, RunSummary, ToolError,
    MAX_OPS_PER_TX, MEMO_TEXT_MAX_BYTES,
};
use crate::validate::{self, truncate_to_bytes};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use std::path::Path;
use std::time::{Duration, Instant};

/// Per-run options layered over the configuration
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Payments per transaction, capped at the 100-operation limit
    pub batch_size: Option<usize>,
    /// Pause between batch submissions
    pub delay: Option<Duration>,
    /// Custom memo prefix for batch transactions
    pub memo: Option<String>,
    /// Simulate instead of submitting
    pub dry_run: bool,
}

/// Result of validating a payment file without processing it
#[derive(Debug, Clone, Default)]
pub struct FileValidation {
    /// Data rows in the file
    pub total_rows: usize,
    /// Rows that passed validation
    pub valid_rows: usize,
    /// Rows that failed validation
    pub invalid_rows: usize,
    /// Sum of amounts across valid rows
    pub total_amount: Decimal,
    /// Row-level errors, prefixed with their row number
    pub errors: Vec<String>,
    /// Row-level warnings, prefixed with their row number
    pub warnings: Vec<String>,
}

impl FileValidation {
    /// Whether every row in the file is usable
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.total_rows > 0
    }
}

/// Drives a bulk payment run against a [`Ledger`]
pub struct BulkPaymentProcessor<L: Ledger> {
    config: Config,
    ledger: L,
}

impl<L: Ledger> BulkPaymentProcessor<L> {
    pub fn new(config: Config, ledger: L) -> Self {
        Self { config, ledger }
    }

    /// Validate every row of a payment CSV without touching the network
    ///
    /// Collects all errors and warnings rather than stopping at the first,
    /// so the report shows everything that needs fixing.
    pub fn validate_file(&self, path: &Path) -> Result<FileValidation, ToolError> {
        if !path.exists() {
            return Err(ToolError::file_not_found(path));
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let address_col = column("address");
        let amount_col = column("amount");
        let memo_col = column("memo");

        let (address_col, amount_col) = match (address_col, amount_col) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ToolError::validation(
                    "CSV must have 'address' and 'amount' columns",
                ))
            }
        };

        let mut result = FileValidation::default();
        for (i, record) in reader.records().enumerate() {
            let row = i as u64 + 2;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    result.total_rows += 1;
                    result.invalid_rows += 1;
                    result.errors.push(format!("Row {}: {}", row, e));
                    continue;
                }
            };
            result.total_rows += 1;

            let address = record.get(address_col);
            let amount = record.get(amount_col);
            let memo = memo_col.and_then(|c| record.get(c));
            let check = validate::validate_row(address, amount, memo);

            for warning in &check.warnings {
                result.warnings.push(format!("Row {}: {}", row, warning));
            }
            if check.is_valid() {
                result.valid_rows += 1;
                if let Ok(amount) = validate::parse_amount(amount.unwrap_or_default()) {
                    result.total_amount += amount;
                }
            } else {
                result.invalid_rows += 1;
                for error in &check.errors {
                    result.errors.push(format!("Row {}: {}", row, error));
                }
            }
        }

        if result.total_rows == 0 {
            return Err(ToolError::validation("CSV file contains no payment rows"));
        }

        Ok(result)
    }

    /// Load the valid payments from a file, collecting per-row errors
    pub fn load_file(
        &self,
        path: &Path,
    ) -> Result<(Vec<PaymentRecord>, Vec<String>), ToolError> {
        let mut payments = Vec::new();
        let mut errors = Vec::new();
        for record in PaymentReader::open(path)? {
            match record {
                Ok(payment) => payments.push(payment),
                Err(e) => errors.push(e.to_string()),
            }
        }
        Ok((payments, errors))
    }

    /// Batch size a run will actually use: the requested size if given,
    /// else the configured one, clamped to the operation limit
    pub fn effective_batch_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.batch_size)
            .clamp(1, MAX_OPS_PER_TX)
    }

    /// Estimate network fees for a run, using a 2x congestion margin
    pub fn estimate_fees(&self, payment_count: usize, batch_size: usize) -> FeeEstimate {
        let batch_size = batch_size.clamp(1, MAX_OPS_PER_TX);
        let transaction_count = payment_count.div_ceil(batch_size);
        let fee_per_op = Decimal::new(i64::from(self.config.base_fee), 7);
        let fee_per_tx = fee_per_op * Decimal::from(batch_size) * Decimal::TWO;
        // Every transaction is budgeted at full size, even a partial last batch
        let total_fee = fee_per_tx * Decimal::from(transaction_count);
        FeeEstimate {
            payment_count,
            transaction_count,
            fee_per_tx,
            total_fee,
            max_operations_per_tx: batch_size,
        }
    }

    /// Split payments into batches of at most `batch_size` operations
    pub fn prepare_batches(
        &self,
        payments: Vec<PaymentRecord>,
        batch_size: usize,
    ) -> Vec<Vec<PaymentRecord>> {
        let batch_size = batch_size.clamp(1, MAX_OPS_PER_TX);
        payments
            .chunks(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// Build the transaction memo for one batch
    ///
    /// The `(batch N)` suffix always survives; the prefix is truncated on a
    /// char boundary to keep the whole memo within 28 bytes.
    pub fn batch_memo(&self, custom: Option<&str>, batch_number: usize) -> String {
        let prefix = custom.unwrap_or("Bulk payment");
        let suffix = format!(" (batch {})", batch_number);
        let available = MEMO_TEXT_MAX_BYTES.saturating_sub(suffix.len());
        let prefix = truncate_to_bytes(prefix, available).trim_end();
        format!("{}{}", prefix, suffix)
    }

    /// Run the full pipeline against a payment file
    ///
    /// Live runs refuse files with invalid rows; dry runs proceed with the
    /// valid subset so a file can be previewed while it is being fixed.
    pub async fn process(
        &self,
        path: &Path,
        source_account: &str,
        options: &ProcessOptions,
    ) -> Result<RunSummary, ToolError> {
        let started = Instant::now();
        let validation = self.validate_file(path)?;

        if !validation.is_valid() && !options.dry_run {
            return Err(ToolError::validation(format!(
                "{} invalid rows in {} (run `bulk validate` for details)",
                validation.invalid_rows,
                path.display()
            )));
        }

        let (payments, _) = self.load_file(path)?;
        if payments.is_empty() {
            return Err(ToolError::validation("no valid payments to process"));
        }

        // One account load up front so a bad source fails before any batch
        self.ledger.account(source_account).await?;
        let base_fee = self.ledger.base_fee().await?;

        let batch_size = self.effective_batch_size(options.batch_size);
        let delay = options.delay.unwrap_or_else(|| self.config.rate_limit_delay());
        let batches = self.prepare_batches(payments, batch_size);
        let total_batches = batches.len();

        tracing::info!(
            batches = total_batches,
            batch_size,
            dry_run = options.dry_run,
            "starting bulk payment run"
        );

        let mut outcomes: Vec<BatchOutcome> = Vec::with_capacity(total_batches);
        let mut total_fees = Decimal::ZERO;

        for (index, batch) in batches.into_iter().enumerate() {
            let plan = BatchPlan {
                source_account: source_account.to_string(),
                asset_code: self.config.token_code.clone(),
                asset_issuer: self.config.issuer_public_key.clone(),
                base_fee,
                memo: Some(self.batch_memo(options.memo.as_deref(), index + 1)),
                payments: batch,
            };

            let result = match self.ledger.submit_batch(&plan).await {
                Ok(receipt) => {
                    total_fees += receipt.fee_charged;
                    tracing::info!(
                        batch = index + 1,
                        hash = %receipt.hash,
                        operations = receipt.operation_count,
                        "batch submitted"
                    );
                    Ok(receipt)
                }
                Err(ToolError::SigningUnavailable) => {
                    return Err(ToolError::SigningUnavailable);
                }
                Err(e) => {
                    tracing::warn!(batch = index + 1, error = %e, "batch failed");
                    Err(e.to_string())
                }
            };

            outcomes.push(BatchOutcome {
                index,
                result,
                payments: plan.payments,
            });
            eprint!("\r{}", crate::format::progress_bar(index + 1, total_batches));

            if index + 1 < total_batches && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        eprintln!();

        let successful_batches = outcomes.iter().filter(|o| o.successful()).count();
        let successful_payments: usize = outcomes
            .iter()
            .filter(|o| o.successful())
            .map(|o| o.payments.len())
            .sum();
        let failed_payments: usize = outcomes
            .iter()
            .filter(|o| !o.successful())
            .map(|o| o.payments.len())
            .sum();

        Ok(RunSummary {
            successful: successful_batches == total_batches,
            total_rows: validation.total_rows,
            valid_rows: validation.valid_rows,
            invalid_rows: validation.invalid_rows,
            successful_payments,
            failed_payments,
            total_batches,
            successful_batches,
            failed_batches: total_batches - successful_batches,
            total_amount: validation.total_amount,
            total_fees,
            duration: started.elapsed(),
            dry_run: options.dry_run,
            batches: outcomes,
        })
    }

    /// Write a JSON report of a completed run
    pub fn write_report(&self, summary: &RunSummary, path: &Path) -> Result<(), ToolError> {
        let batches: Vec<serde_json::Value> = summary
            .batches
            .iter()
            .map(|outcome| {
                let status = match &outcome.result {
                    Ok(receipt) => serde_json::json!({
                        "successful": true,
                        "hash": receipt.hash,
                        "ledger": receipt.ledger,
                        "fee_charged": receipt.fee_charged.to_string(),
                    }),
                    Err(error) => serde_json::json!({
                        "successful": false,
                        "error": error,
                    }),
                };
                serde_json::json!({
                    "batch": outcome.index + 1,
                    "payment_count": outcome.payments.len(),
                    "total_amount": outcome
                        .payments
                        .iter()
                        .map(|p| p.amount)
                        .sum::<Decimal>()
                        .to_string(),
                    "result": status,
                })
            })
            .collect();

        let report = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "dry_run": summary.dry_run,
            "successful": summary.successful,
            "token_code": self.config.token_code,
            "network": self.config.network.to_string(),
            "totals": {
                "rows": summary.total_rows,
                "valid_rows": summary.valid_rows,
                "invalid_rows": summary.invalid_rows,
                "payments_sent": summary.successful_payments,
                "payments_failed": summary.failed_payments,
                "amount": summary.total_amount.to_string(),
                "fees_xlm": summary.total_fees.to_string(),
                "duration_secs": summary.duration.as_secs_f64(),
            },
            "batches": batches,
        });

        std::fs::write(path, serde_json::to_string_pretty(&report)? + "\n")?;
        Ok(())
    }
}

//! Payment and batch types for bulk processing
//!
//! These types flow through the bulk pipeline: CSV rows become
//! [`PaymentRecord`]s, records are partitioned into batches, each batch
//! becomes a [`BatchPlan`] handed to the ledger seam, and the receipts are
//! aggregated into a [`RunSummary`].

use rust_decimal::Decimal;
use std::time::Duration;

/// CSV row number, counting the header as row 1
pub type RowNumber = u64;

/// Stellar's per-transaction operation limit
pub const MAX_OPS_PER_TX: usize = 100;

/// Maximum length of a text memo, in UTF-8 bytes
pub const MEMO_TEXT_MAX_BYTES: usize = 28;

/// Maximum fractional digits for a Stellar amount
pub const AMOUNT_MAX_SCALE: u32 = 7;

/// Largest representable amount (i64::MAX stroops)
pub fn max_amount() -> Decimal {
    Decimal::from_i128_with_scale(i64::MAX as i128, AMOUNT_MAX_SCALE)
}

/// One stroop, the smallest amount unit
pub fn stroop() -> Decimal {
    Decimal::new(1, AMOUNT_MAX_SCALE)
}

/// A single validated payment from the input CSV
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    /// Destination account (strkey-shaped `G...` address)
    pub address: String,

    /// Token amount with at most 7 fractional digits
    pub amount: Decimal,

    /// Optional per-payment memo (recorded in reports; the transaction memo
    /// is set per batch)
    pub memo: Option<String>,

    /// Source CSV row, for error reporting
    pub row: RowNumber,
}

/// One batch of payments, expressed as a single multi-operation transaction
///
/// This is the unit handed across the ledger seam. Everything needed to
/// build the transaction is here; building and signing belong to the
/// external SDK side of the seam.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Source account that pays and signs
    pub source_account: String,

    /// Asset code of the issued token
    pub asset_code: String,

    /// Issuer account of the token
    pub asset_issuer: String,

    /// Per-operation base fee in stroops
    pub base_fee: u32,

    /// Transaction text memo (already truncated to the 28-byte limit)
    pub memo: Option<String>,

    /// Payment operations, at most [`MAX_OPS_PER_TX`]
    pub payments: Vec<PaymentRecord>,
}

impl BatchPlan {
    /// Number of payment operations in this batch
    pub fn operation_count(&self) -> usize {
        self.payments.len()
    }

    /// Sum of all payment amounts in this batch
    pub fn total_amount(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Maximum fee for this transaction in XLM (base fee times operations)
    pub fn max_fee(&self) -> Decimal {
        Decimal::new(
            self.base_fee as i64 * self.payments.len() as i64,
            AMOUNT_MAX_SCALE,
        )
    }
}

/// Result of submitting (or simulating) one batch transaction
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReceipt {
    /// Transaction hash, or a placeholder for dry runs
    pub hash: String,

    /// Fee charged in XLM (estimated for dry runs)
    pub fee_charged: Decimal,

    /// Ledger sequence the transaction was included in, if known
    pub ledger: Option<u64>,

    /// Number of payment operations in the transaction
    pub operation_count: usize,

    /// Whether this receipt came from a simulation
    pub dry_run: bool,
}

/// Outcome of one batch in a bulk run
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Zero-based batch index
    pub index: usize,

    /// Receipt on success, error message on failure
    pub result: Result<BatchReceipt, String>,

    /// The payments that were in this batch
    pub payments: Vec<PaymentRecord>,
}

impl BatchOutcome {
    /// Whether the batch transaction went through
    pub fn successful(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fee estimate for a bulk run
///
/// Uses the Stellar base fee per operation, the 100-op transaction limit,
/// and a 2x congestion multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeEstimate {
    /// Number of payments being estimated
    pub payment_count: usize,

    /// Number of transactions the payments will be split into
    pub transaction_count: usize,

    /// Conservative fee per transaction in XLM
    pub fee_per_tx: Decimal,

    /// Conservative total fee in XLM
    pub total_fee: Decimal,

    /// Operation limit used for the split
    pub max_operations_per_tx: usize,
}

/// Aggregated results of a full bulk payment run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// True when every batch succeeded
    pub successful: bool,

    /// Rows in the input file (excluding the header)
    pub total_rows: usize,

    /// Rows that passed validation
    pub valid_rows: usize,

    /// Rows that failed validation
    pub invalid_rows: usize,

    /// Payments in successful batches
    pub successful_payments: usize,

    /// Payments in failed batches
    pub failed_payments: usize,

    /// Total number of batches
    pub total_batches: usize,

    /// Batches that succeeded
    pub successful_batches: usize,

    /// Batches that failed
    pub failed_batches: usize,

    /// Sum of all valid payment amounts (token units)
    pub total_amount: Decimal,

    /// Fees across successful batches in XLM (estimates for dry runs)
    pub total_fees: Decimal,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Per-batch outcomes in processing order
    pub batches: Vec<BatchOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn payment(amount: Decimal) -> PaymentRecord {
        PaymentRecord {
            address: "G".repeat(56),
            amount,
            memo: None,
            row: 2,
        }
    }

    #[test]
    fn test_batch_plan_totals() {
        let plan = BatchPlan {
            source_account: "G".repeat(56),
            asset_code: "OGC".to_string(),
            asset_issuer: "G".repeat(56),
            base_fee: 100,
            memo: None,
            payments: vec![
                payment(Decimal::new(105, 1)),
                payment(Decimal::new(200, 1)),
            ],
        };

        assert_eq!(plan.operation_count(), 2);
        assert_eq!(plan.total_amount(), Decimal::new(305, 1));
        // 2 ops * 100 stroops = 0.0000200 XLM
        assert_eq!(plan.max_fee(), Decimal::new(200, 7));
    }

    #[test]
    fn test_max_amount_matches_stellar_limit() {
        assert_eq!(max_amount().to_string(), "922337203685.4775807");
    }

    #[test]
    fn test_batch_outcome_successful() {
        let ok = BatchOutcome {
            index: 0,
            result: Ok(BatchReceipt {
                hash: "abc".to_string(),
                fee_charged: Decimal::ZERO,
                ledger: None,
                operation_count: 1,
                dry_run: true,
            }),
            payments: vec![],
        };
        let failed = BatchOutcome {
            index: 1,
            result: Err("tx_bad_seq".to_string()),
            payments: vec![],
        };

        assert!(ok.successful());
        assert!(!failed.successful());
    }
}

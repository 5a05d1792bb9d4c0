//! Plain-text formatting for CLI output

use crate::bulk::FileValidation;
use crate::horizon::{AccountRecord, SubmitResponse};
use crate::types::{FeeEstimate, RunSummary};
use chrono::Utc;
use rust_decimal::Decimal;
use std::fmt::Write;
use std::time::Duration;

/// How many row errors or warnings a validation report lists before
/// summarizing the rest
const REPORT_ROW_LIMIT: usize = 10;

/// Render an amount without trailing zeros
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Shorten a strkey for display: first 8 chars, ellipsis, last 8
pub fn shorten(key: &str) -> String {
    if key.len() <= 16 {
        return key.to_string();
    }
    format!("{}...{}", &key[..8], &key[key.len() - 8..])
}

/// Human-readable duration with sub-second precision for short runs
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{}m {}s", duration.as_secs() / 60, duration.as_secs() % 60)
    }
}

/// One-line progress bar for batch submission
pub fn progress_bar(current: usize, total: usize) -> String {
    const WIDTH: usize = 20;
    let filled = if total == 0 {
        WIDTH
    } else {
        WIDTH * current / total
    };
    let pct = if total == 0 { 100 } else { 100 * current / total };
    format!(
        "[{}{}] {}% ({}/{})",
        "█".repeat(filled),
        "░".repeat(WIDTH - filled),
        pct,
        current,
        total
    )
}

/// Account overview: balances, sequence, signers
pub fn format_account_info(account: &AccountRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Account:  {}", account.account_id);
    let _ = writeln!(out, "Sequence: {}", account.sequence);
    let _ = writeln!(out, "Balances:");
    for balance in &account.balances {
        if balance.is_native() {
            let _ = writeln!(out, "  {:>20} XLM", balance.balance);
        } else {
            let _ = writeln!(
                out,
                "  {:>20} {} (issuer {})",
                balance.balance,
                balance.asset_code.as_deref().unwrap_or("?"),
                shorten(balance.asset_issuer.as_deref().unwrap_or("?")),
            );
        }
    }
    if !account.signers.is_empty() {
        let _ = writeln!(out, "Signers:");
        for signer in &account.signers {
            let _ = writeln!(out, "  {} (weight {})", shorten(&signer.key), signer.weight);
        }
    }
    out
}

/// Result of submitting a transaction envelope
pub fn format_submit_response(response: &SubmitResponse) -> String {
    let mut out = String::new();
    let status = if response.successful { "SUCCESS" } else { "FAILED" };
    let _ = writeln!(out, "Transaction {}", status);
    let _ = writeln!(out, "  Hash:   {}", response.hash);
    let _ = writeln!(out, "  Ledger: {}", response.ledger);
    let _ = writeln!(out, "  Fee:    {} stroops", response.fee_charged);
    out
}

/// Validation report for a payment file
pub fn format_validation_report(validation: &FileValidation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Validation Report");
    let _ = writeln!(out, "=================");
    let _ = writeln!(out, "Total rows:   {}", validation.total_rows);
    let _ = writeln!(out, "Valid rows:   {}", validation.valid_rows);
    let _ = writeln!(out, "Invalid rows: {}", validation.invalid_rows);
    let _ = writeln!(
        out,
        "Total amount: {}",
        format_amount(validation.total_amount)
    );

    if !validation.errors.is_empty() {
        let _ = writeln!(out, "\nErrors:");
        for error in validation.errors.iter().take(REPORT_ROW_LIMIT) {
            let _ = writeln!(out, "  {}", error);
        }
        if validation.errors.len() > REPORT_ROW_LIMIT {
            let _ = writeln!(
                out,
                "  ... and {} more",
                validation.errors.len() - REPORT_ROW_LIMIT
            );
        }
    }
    if !validation.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in validation.warnings.iter().take(REPORT_ROW_LIMIT) {
            let _ = writeln!(out, "  {}", warning);
        }
        if validation.warnings.len() > REPORT_ROW_LIMIT {
            let _ = writeln!(
                out,
                "  ... and {} more",
                validation.warnings.len() - REPORT_ROW_LIMIT
            );
        }
    }

    let verdict = if validation.is_valid() {
        "\nFile is ready for processing."
    } else {
        "\nFix the errors above before processing."
    };
    let _ = writeln!(out, "{}", verdict);
    out
}

/// Fee estimate summary
pub fn format_fee_estimate(estimate: &FeeEstimate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Fee Estimate");
    let _ = writeln!(out, "  Payments:       {}", estimate.payment_count);
    let _ = writeln!(
        out,
        "  Transactions:   {} (up to {} ops each)",
        estimate.transaction_count, estimate.max_operations_per_tx
    );
    let _ = writeln!(
        out,
        "  Fee per tx:     {} XLM",
        format_amount(estimate.fee_per_tx)
    );
    let _ = writeln!(
        out,
        "  Total (max):    {} XLM",
        format_amount(estimate.total_fee)
    );
    out
}

/// Full run report printed after a bulk run
pub fn format_run_report(summary: &RunSummary) -> String {
    let mut out = String::new();
    let title = if summary.dry_run {
        "Bulk Payment Report (DRY RUN)"
    } else {
        "Bulk Payment Report"
    };
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    let _ = writeln!(
        out,
        "Generated: {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Duration:  {}", format_duration(summary.duration));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Rows:      {} total, {} valid, {} invalid",
        summary.total_rows, summary.valid_rows, summary.invalid_rows
    );
    let _ = writeln!(
        out,
        "Payments:  {} sent, {} failed",
        summary.successful_payments, summary.failed_payments
    );
    let _ = writeln!(
        out,
        "Batches:   {} of {} succeeded",
        summary.successful_batches, summary.total_batches
    );
    let _ = writeln!(out, "Amount:    {}", format_amount(summary.total_amount));
    let _ = writeln!(
        out,
        "Fees:      {} XLM",
        format_amount(summary.total_fees)
    );

    let _ = writeln!(out, "\nBatches:");
    for outcome in &summary.batches {
        match &outcome.result {
            Ok(receipt) => {
                let _ = writeln!(
                    out,
                    "  {:>3}. OK      {} ops  {}",
                    outcome.index + 1,
                    receipt.operation_count,
                    receipt.hash
                );
            }
            Err(error) => {
                let _ = writeln!(
                    out,
                    "  {:>3}. FAILED  {} ops  {}",
                    outcome.index + 1,
                    outcome.payments.len(),
                    error
                );
                for payment in &outcome.payments {
                    let _ = writeln!(
                        out,
                        "        row {} {} {}",
                        payment.row,
                        shorten(&payment.address),
                        format_amount(payment.amount)
                    );
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatchOutcome, BatchReceipt, PaymentRecord};
    use rstest::rstest;

    #[rstest]
    #[case::trailing_zeros(Decimal::new(105_000_000, 7), "10.5")]
    #[case::integer(Decimal::new(100_0000000, 7), "100")]
    #[case::stroop(Decimal::new(1, 7), "0.0000001")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_shorten() {
        let key = format!("GABCDEFG{}WXYZ5678", "X".repeat(40));
        assert_eq!(shorten(&key), "GABCDEFG...WXYZ5678");
        assert_eq!(shorten("short"), "short");
    }

    #[rstest]
    #[case::millis(Duration::from_millis(250), "250ms")]
    #[case::seconds(Duration::from_millis(2500), "2.5s")]
    #[case::minutes(Duration::from_secs(90), "1m 30s")]
    #[case::remainder_truncates(Duration::from_millis(119_700), "1m 59s")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(duration), expected);
    }

    #[rstest]
    #[case::empty(0, 10, "0% (0/10)")]
    #[case::half(5, 10, "50% (5/10)")]
    #[case::full(10, 10, "100% (10/10)")]
    fn test_progress_bar(#[case] current: usize, #[case] total: usize, #[case] suffix: &str) {
        let bar = progress_bar(current, total);
        assert!(bar.ends_with(suffix), "unexpected bar: {}", bar);
        assert!(bar.starts_with('['));
    }

    #[test]
    fn test_validation_report_truncates_long_error_lists() {
        let validation = FileValidation {
            total_rows: 30,
            valid_rows: 5,
            invalid_rows: 25,
            total_amount: Decimal::from(50),
            errors: (0..25).map(|i| format!("Row {}: bad", i + 2)).collect(),
            warnings: Vec::new(),
        };
        let report = format_validation_report(&validation);
        assert!(report.contains("... and 15 more"));
        assert!(report.contains("Fix the errors"));
    }

    #[test]
    fn test_run_report_lists_failed_payments() {
        let payment = PaymentRecord {
            address: format!("G{}", "A".repeat(55)),
            amount: Decimal::from(10),
            memo: None,
            row: 2,
        };
        let summary = RunSummary {
            successful: false,
            total_rows: 1,
            valid_rows: 1,
            invalid_rows: 0,
            successful_payments: 0,
            failed_payments: 1,
            total_batches: 1,
            successful_batches: 0,
            failed_batches: 1,
            total_amount: Decimal::from(10),
            total_fees: Decimal::ZERO,
            duration: Duration::from_secs(1),
            dry_run: false,
            batches: vec![BatchOutcome {
                index: 0,
                result: Err("tx_failed".to_string()),
                payments: vec![payment],
            }],
        };
        let report = format_run_report(&summary);
        assert!(report.contains("FAILED"));
        assert!(report.contains("tx_failed"));
        assert!(report.contains("row 2"));
    }

    #[test]
    fn test_run_report_dry_run_title() {
        let summary = RunSummary {
            successful: true,
            total_rows: 1,
            valid_rows: 1,
            invalid_rows: 0,
            successful_payments: 1,
            failed_payments: 0,
            total_batches: 1,
            successful_batches: 1,
            failed_batches: 0,
            total_amount: Decimal::from(10),
            total_fees: Decimal::new(100, 7),
            duration: Duration::from_millis(10),
            dry_run: true,
            batches: vec![BatchOutcome {
                index: 0,
                result: Ok(BatchReceipt {
                    hash: "dry-run-0000".to_string(),
                    fee_charged: Decimal::new(100, 7),
                    ledger: None,
                    operation_count: 1,
                    dry_run: true,
                }),
                payments: Vec::new(),
            }],
        };
        let report = format_run_report(&summary);
        assert!(report.contains("DRY RUN"));
        assert!(report.contains("dry-run-0000"));
    }
}

//! CSV row model for bulk payment files
//!
//! Files carry an `address,amount,memo` header; the memo column is
//! optional. Data rows are numbered from 2 so error messages line up with
//! what a spreadsheet shows.

use crate::keys::Keypair;
use crate::types::{PaymentRecord, RowNumber, ToolError};
use crate::validate::{self, MemoKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A payment row exactly as it appears in the CSV file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPaymentRow {
    /// Destination account (`G...`)
    pub address: String,
    /// Token amount as written in the file
    pub amount: String,
    /// Optional memo text
    #[serde(default)]
    pub memo: String,
}

/// Convert a raw CSV row into a validated [`PaymentRecord`]
pub fn convert_row(raw: &RawPaymentRow, row: RowNumber) -> Result<PaymentRecord, ToolError> {
    let address = raw.address.trim();
    if !validate::is_valid_address(address) {
        return Err(ToolError::invalid_address(address));
    }

    let amount = validate::parse_amount(&raw.amount)?;

    let memo = raw.memo.trim();
    let memo = if memo.is_empty() {
        None
    } else if validate::validate_memo(memo, MemoKind::Text) {
        Some(memo.to_string())
    } else {
        return Err(ToolError::InvalidMemo {
            memo: memo.to_string(),
        });
    };

    Ok(PaymentRecord {
        address: address.to_string(),
        amount,
        memo,
        row,
    })
}

/// Write a template CSV with generated sample addresses
///
/// Sample rows use freshly generated account IDs so the template passes
/// validation as-is.
pub fn write_template_csv(path: &Path, samples: usize) -> Result<(), ToolError> {
    let mut writer = csv::Writer::from_path(path)?;
    for i in 0..samples {
        writer.serialize(RawPaymentRow {
            address: Keypair::random().account_id(),
            amount: format!("{}.5", (i + 1) * 10),
            memo: format!("Sample payment {}", i + 1),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn raw(address: &str, amount: &str, memo: &str) -> RawPaymentRow {
        RawPaymentRow {
            address: address.to_string(),
            amount: amount.to_string(),
            memo: memo.to_string(),
        }
    }

    #[test]
    fn test_convert_row_valid() {
        let address = Keypair::random().account_id();
        let record = convert_row(&raw(&address, "10.5", "thanks"), 2).unwrap();
        assert_eq!(record.address, address);
        assert_eq!(record.amount, Decimal::new(105, 1));
        assert_eq!(record.memo.as_deref(), Some("thanks"));
        assert_eq!(record.row, 2);
    }

    #[test]
    fn test_convert_row_trims_and_drops_empty_memo() {
        let address = Keypair::random().account_id();
        let record = convert_row(&raw(&format!("  {}  ", address), " 1 ", "  "), 3).unwrap();
        assert_eq!(record.address, address);
        assert_eq!(record.memo, None);
    }

    #[rstest]
    #[case::bad_address("not-an-address", "10", "")]
    #[case::bad_amount("", "-1", "")]
    fn test_convert_row_rejects(#[case] address: &str, #[case] amount: &str, #[case] memo: &str) {
        let address = if address.is_empty() {
            Keypair::random().account_id()
        } else {
            address.to_string()
        };
        assert!(convert_row(&raw(&address, amount, memo), 2).is_err());
    }

    #[test]
    fn test_convert_row_rejects_long_memo() {
        let address = Keypair::random().account_id();
        let result = convert_row(&raw(&address, "10", &"x".repeat(29)), 2);
        assert!(matches!(result, Err(ToolError::InvalidMemo { .. })));
    }

    #[test]
    fn test_template_rows_are_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.csv");
        write_template_csv(&path, 3).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<RawPaymentRow> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert!(convert_row(row, (i + 2) as u64).is_ok());
        }
    }
}

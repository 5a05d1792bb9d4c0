//! Streaming CSV reader for bulk payment files

use super::csv_format::{convert_row, RawPaymentRow};
use crate::types::{PaymentRecord, ToolError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Iterator over validated payment records in a CSV file
///
/// Rows are yielded in file order with their 1-based line numbers (the
/// first data row is row 2, after the header). Invalid rows surface as
/// errors without stopping the iterator, so callers decide whether to
/// collect or abort.
pub struct PaymentReader {
    inner: csv::DeserializeRecordsIntoIter<File, RawPaymentRow>,
    row: u64,
}

impl PaymentReader {
    /// Open a payment CSV, trimming whitespace and tolerating a missing
    /// memo column
    pub fn open(path: &Path) -> Result<Self, ToolError> {
        if !path.exists() {
            return Err(ToolError::file_not_found(path));
        }
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_path(path)?;
        Ok(Self {
            inner: reader.into_deserialize(),
            row: 1,
        })
    }
}

impl Iterator for PaymentReader {
    type Item = Result<PaymentRecord, ToolError>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.inner.next()?;
        self.row += 1;
        Some(match raw {
            Ok(raw) => convert_row(&raw, self.row),
            Err(e) => Err(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_valid_rows_with_row_numbers() {
        let a = Keypair::random().account_id();
        let b = Keypair::random().account_id();
        let file = csv_file(&format!(
            "address,amount,memo\n{},10.5,first\n{},2,\n",
            a, b
        ));

        let records: Vec<_> = PaymentReader::open(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row, 2);
        assert_eq!(records[1].row, 3);
        assert_eq!(records[0].memo.as_deref(), Some("first"));
        assert_eq!(records[1].memo, None);
    }

    #[test]
    fn test_missing_memo_column_is_accepted() {
        let a = Keypair::random().account_id();
        let file = csv_file(&format!("address,amount\n{},7\n", a));

        let records: Vec<_> = PaymentReader::open(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].memo, None);
    }

    #[test]
    fn test_invalid_row_yields_error_then_continues() {
        let a = Keypair::random().account_id();
        let file = csv_file(&format!(
            "address,amount,memo\nbogus,10,\n{},5,\n",
            a
        ));

        let results: Vec<_> = PaymentReader::open(file.path()).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_missing_file() {
        let result = PaymentReader::open(Path::new("/nonexistent/payments.csv"));
        assert!(matches!(result, Err(ToolError::FileNotFound { .. })));
    }
}

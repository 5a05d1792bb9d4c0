//! Error types for the OGC token toolkit
//!
//! All fallible operations in the crate return [`ToolError`]. Variants carry
//! enough context to produce a useful one-line CLI message.
//!
//! # Error Categories
//!
//! - **File I/O errors**: missing files, permission problems
//! - **CSV errors**: malformed records, with line numbers where available
//! - **Validation errors**: bad addresses, amounts, memos, key material
//! - **Network errors**: HTTP failures and Horizon problem responses
//! - **Configuration errors**: unusable or incomplete settings

use thiserror::Error;

/// Main error type for the toolkit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing or conversion error
    ///
    /// Recoverable during validation passes; the offending row is reported
    /// and scanning continues.
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the error
        message: String,
    },

    /// Account address does not match the Stellar strkey shape
    #[error("Invalid Stellar address: {address}")]
    InvalidAddress {
        /// The rejected address
        address: String,
    },

    /// Secret seed does not match the Stellar strkey shape
    ///
    /// The seed itself is never echoed back.
    #[error("Invalid Stellar secret key")]
    InvalidSecret,

    /// Amount is not a positive decimal within Stellar's range and precision
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount string
        amount: String,
    },

    /// Memo fails the length or charset rules for its type
    #[error("Invalid memo: {memo}")]
    InvalidMemo {
        /// The rejected memo
        memo: String,
    },

    /// Strkey decoding failed (bad length, version byte, or checksum)
    #[error("Invalid key encoding: {message}")]
    InvalidKey {
        /// What went wrong while decoding
        message: String,
    },

    /// A file-level or run-level validation failure
    #[error("Validation failed: {message}")]
    Validation {
        /// Summary of the failure
        message: String,
    },

    /// Configuration is unusable for the requested operation
    #[error("Configuration error: {message}")]
    Config {
        /// What is missing or malformed
        message: String,
    },

    /// Transport-level HTTP failure (connect, timeout, decode)
    #[error("HTTP error: {message}")]
    Http {
        /// Description from the HTTP client
        message: String,
    },

    /// Horizon returned an error response
    #[error("Horizon error ({status}): {detail}")]
    Horizon {
        /// HTTP status code
        status: u16,
        /// Problem detail from the response body
        detail: String,
    },

    /// Horizon accepted the request but the transaction failed
    #[error("Transaction rejected: {detail}")]
    SubmitRejected {
        /// Result codes reported by Horizon
        detail: String,
    },

    /// Live submission requires an external Stellar signer
    ///
    /// Transaction building and signing are delegated to external SDK
    /// tooling. Run with `--dry-run`, then sign the planned batches and
    /// submit the envelopes with `submit-xdr`.
    #[error(
        "Transaction signing is delegated to external Stellar tooling; \
         run with --dry-run and submit signed envelopes with `submit-xdr`"
    )]
    SigningUnavailable,

    /// JSON serialization or deserialization failure
    #[error("JSON error: {message}")]
    Json {
        /// Description from serde
        message: String,
    },

    /// Report generation failure
    #[error("Report error: {message}")]
    Report {
        /// What went wrong
        message: String,
    },
}

impl From<std::io::Error> for ToolError {
    fn from(error: std::io::Error) -> Self {
        ToolError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ToolError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());
        ToolError::Csv {
            line,
            message: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(error: reqwest::Error) -> Self {
        ToolError::Http {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(error: serde_json::Error) -> Self {
        ToolError::Json {
            message: error.to_string(),
        }
    }
}

impl ToolError {
    /// Create a FileNotFound error from a path
    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        ToolError::FileNotFound {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Create an InvalidAddress error
    pub fn invalid_address(address: impl Into<String>) -> Self {
        ToolError::InvalidAddress {
            address: address.into(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl Into<String>) -> Self {
        ToolError::InvalidAmount {
            amount: amount.into(),
        }
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation {
            message: message.into(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        ToolError::Config {
            message: message.into(),
        }
    }
}

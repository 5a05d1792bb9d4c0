//! Core data types for the OGC token toolkit
//!
//! This module bundles the payment/batch domain types and the crate-wide
//! error type.

pub mod error;
pub mod payment;

pub use error::ToolError;
pub use payment::{
    max_amount, stroop, BatchOutcome, BatchPlan, BatchReceipt, FeeEstimate, PaymentRecord,
    RowNumber, RunSummary, AMOUNT_MAX_SCALE, MAX_OPS_PER_TX, MEMO_TEXT_MAX_BYTES,
};

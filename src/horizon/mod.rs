//! Horizon REST API client and response models

pub mod client;
pub mod types;

pub use client::{HorizonClient, FRIENDBOT_URL};
pub use types::{
    AccountRecord, Balance, FeeStats, LedgerRecord, OperationRecord, Page, ProblemBody,
    SubmitResponse, TxRecord,
};

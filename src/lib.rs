//! Operations toolkit for an issued Stellar token
//!
//! The crate covers the day-to-day operational surface of running a token:
//! bulk payments from CSV files, payment file validation, account
//! inspection and testnet funding, transparency reporting over Horizon
//! history, and submission of externally signed transaction envelopes.
//!
//! Transaction building and signing are deliberately left to external
//! Stellar tooling. The bulk pipeline talks to the network through the
//! [`ledger::Ledger`] trait, which also gives it a fully offline dry-run
//! mode.

pub mod bulk;
pub mod cli;
pub mod config;
pub mod format;
pub mod horizon;
pub mod io;
pub mod keys;
pub mod ledger;
pub mod report;
pub mod types;
pub mod validate;

pub use config::{Config, Network};
pub use types::ToolError;

//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Operations toolkit for the OGC Stellar token
#[derive(Parser, Debug)]
#[command(name = "ogc-tools")]
#[command(about = "Operations toolkit for the OGC Stellar token", long_about = None)]
pub struct CliArgs {
    /// Path to a JSON config file (default: ogc_config.json if present)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Bulk payment processing
    Bulk {
        #[command(subcommand)]
        action: BulkAction,
    },
    /// Transparency reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
    /// Network information
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },
    /// Submit an externally signed transaction envelope
    SubmitXdr {
        /// File containing the base64-encoded signed envelope
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration and validation results
    Show,
    /// Write a template config file
    Init {
        /// Where to write the template
        #[arg(long = "output", value_name = "FILE", default_value = "ogc_config.json")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountAction {
    /// Generate a new keypair
    Create,
    /// Show balances and signers for an account
    Info {
        /// Account ID (defaults to the configured issuer)
        #[arg(long = "address", value_name = "ACCOUNT")]
        address: Option<String>,
    },
    /// Fund a testnet account through friendbot
    Fund {
        /// Account ID to fund
        #[arg(long = "address", value_name = "ACCOUNT")]
        address: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BulkAction {
    /// Validate a payment CSV without submitting anything
    Validate {
        /// Payment CSV file
        #[arg(long = "file", value_name = "FILE")]
        file: PathBuf,
    },
    /// Write a template payment CSV with sample rows
    Template {
        /// Where to write the template
        #[arg(long = "output", value_name = "FILE", default_value = "payments.csv")]
        output: PathBuf,
        /// Number of sample rows
        #[arg(long = "samples", value_name = "COUNT", default_value_t = 3)]
        samples: usize,
    },
    /// Process a payment CSV
    Process {
        /// Payment CSV file
        #[arg(long = "file", value_name = "FILE")]
        file: PathBuf,
        /// Secret seed of the sending account (required for live runs)
        #[arg(long = "secret", value_name = "SEED")]
        secret: Option<String>,
        /// Payments per transaction (capped at 100)
        #[arg(long = "batch-size", value_name = "SIZE")]
        batch_size: Option<usize>,
        /// Seconds to wait between batches
        #[arg(long = "delay", value_name = "SECONDS")]
        delay: Option<f64>,
        /// Custom memo prefix for batch transactions
        #[arg(long = "memo", value_name = "TEXT")]
        memo: Option<String>,
        /// Simulate without submitting
        #[arg(long = "dry-run")]
        dry_run: bool,
        /// Write a JSON run report to this path
        #[arg(long = "report", value_name = "FILE")]
        report: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReportAction {
    /// Token stats for the last 24 hours
    Stats,
    /// Transparency report for a month (defaults to the current one)
    Monthly {
        #[arg(long = "year", value_name = "YEAR")]
        year: Option<i32>,
        #[arg(long = "month", value_name = "MONTH")]
        month: Option<u32>,
    },
    /// Transparency report for the previous calendar month
    Previous,
    /// Annual summary
    Annual {
        #[arg(long = "year", value_name = "YEAR")]
        year: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum NetworkAction {
    /// Show network and latest ledger information
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_bulk_process_flags() {
        let args = parse(&[
            "ogc-tools",
            "bulk",
            "process",
            "--file",
            "payments.csv",
            "--batch-size",
            "50",
            "--delay",
            "1.5",
            "--dry-run",
        ]);
        match args.command {
            Command::Bulk {
                action:
                    BulkAction::Process {
                        file,
                        batch_size,
                        delay,
                        dry_run,
                        secret,
                        ..
                    },
            } => {
                assert_eq!(file, PathBuf::from("payments.csv"));
                assert_eq!(batch_size, Some(50));
                assert_eq!(delay, Some(1.5));
                assert!(dry_run);
                assert_eq!(secret, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let args = parse(&["ogc-tools", "--config", "custom.json", "network", "status"]);
        assert_eq!(args.config, Some(PathBuf::from("custom.json")));
    }

    #[test]
    fn test_bulk_template_defaults() {
        let args = parse(&["ogc-tools", "bulk", "template"]);
        match args.command {
            Command::Bulk {
                action: BulkAction::Template { output, samples },
            } => {
                assert_eq!(output, PathBuf::from("payments.csv"));
                assert_eq!(samples, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[rstest]
    #[case::monthly(&["ogc-tools", "report", "monthly", "--year", "2026", "--month", "3"])]
    #[case::stats(&["ogc-tools", "report", "stats"])]
    #[case::previous(&["ogc-tools", "report", "previous"])]
    #[case::annual(&["ogc-tools", "report", "annual", "--year", "2026"])]
    fn test_report_subcommands_parse(#[case] args: &[&str]) {
        parse(args);
    }

    #[test]
    fn test_report_monthly_defaults_to_current_month() {
        let args = parse(&["ogc-tools", "report", "monthly"]);
        match args.command {
            Command::Report {
                action: ReportAction::Monthly { year, month },
            } => {
                assert_eq!(year, None);
                assert_eq!(month, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_submit_xdr_takes_positional_file() {
        let args = parse(&["ogc-tools", "submit-xdr", "signed.txt"]);
        match args.command {
            Command::SubmitXdr { file } => assert_eq!(file, PathBuf::from("signed.txt")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(CliArgs::try_parse_from(["ogc-tools"]).is_err());
    }
}

//! Command-line interface: argument parsing and command dispatch

pub mod args;

pub use args::{
    AccountAction, BulkAction, CliArgs, Command, ConfigAction, NetworkAction, ReportAction,
};

use crate::bulk::{BulkPaymentProcessor, ProcessOptions};
use crate::config::{Config, Network};
use crate::format;
use crate::horizon::HorizonClient;
use crate::io;
use crate::keys::Keypair;
use crate::ledger::{DryRunLedger, HorizonLedger, Ledger};
use crate::report::TransparencyReporter;
use crate::types::ToolError;
use chrono::Datelike;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parse command-line arguments, exiting on `--help` or parse errors
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run the parsed command to completion
pub async fn run(args: CliArgs) -> Result<(), ToolError> {
    let config = Config::load(args.config.as_deref())?;
    match args.command {
        Command::Config { action } => run_config(&config, action),
        Command::Account { action } => run_account(&config, action).await,
        Command::Bulk { action } => run_bulk(config, action).await,
        Command::Report { action } => run_report(&config, action).await,
        Command::Network { action } => run_network(&config, action).await,
        Command::SubmitXdr { file } => run_submit_xdr(&config, &file).await,
    }
}

fn client(config: &Config) -> Result<HorizonClient, ToolError> {
    HorizonClient::new(config.horizon_url(), config.timeout())
}

fn run_config(config: &Config, action: ConfigAction) -> Result<(), ToolError> {
    match action {
        ConfigAction::Show => {
            let mut rendered = serde_json::to_value(config)?;
            if !config.issuer_secret_key.is_empty() {
                rendered["issuer_secret_key"] = serde_json::Value::String("S***".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&rendered)?);
            let check = config.validate();
            for warning in &check.warnings {
                println!("Warning: {}", warning);
            }
            for error in &check.errors {
                println!("Error: {}", error);
            }
            if check.is_valid() {
                println!("Configuration is valid.");
                Ok(())
            } else {
                Err(ToolError::config("configuration has errors"))
            }
        }
        ConfigAction::Init { output } => {
            Config::write_template(&output)?;
            println!("Wrote config template to {}", output.display());
            Ok(())
        }
    }
}

async fn run_account(config: &Config, action: AccountAction) -> Result<(), ToolError> {
    match action {
        AccountAction::Create => {
            let keypair = Keypair::random();
            println!("Account ID: {}", keypair.account_id());
            println!("Secret:     {}", keypair.secret());
            println!();
            println!("Store the secret somewhere safe; it cannot be recovered.");
            if config.network == Network::Testnet {
                println!(
                    "Fund it on testnet with: ogc-tools account fund --address {}",
                    keypair.account_id()
                );
            }
            Ok(())
        }
        AccountAction::Info { address } => {
            let address = match address {
                Some(address) => address,
                None if !config.issuer_public_key.is_empty() => {
                    config.issuer_public_key.clone()
                }
                None => {
                    return Err(ToolError::validation(
                        "pass --address or configure an issuer public key",
                    ))
                }
            };
            let account = client(config)?.account(&address).await?;
            print!("{}", format::format_account_info(&account));
            Ok(())
        }
        AccountAction::Fund { address } => {
            if config.network != Network::Testnet {
                return Err(ToolError::validation(
                    "friendbot funding is only available on testnet",
                ));
            }
            if !crate::validate::is_valid_address(&address) {
                return Err(ToolError::invalid_address(&address));
            }
            client(config)?.fund_testnet_account(&address).await?;
            println!("Funded {} via friendbot", address);
            Ok(())
        }
    }
}

async fn run_bulk(config: Config, action: BulkAction) -> Result<(), ToolError> {
    match action {
        BulkAction::Validate { file } => {
            let processor = BulkPaymentProcessor::new(config, DryRunLedger::default());
            let validation = processor.validate_file(&file)?;
            print!("{}", format::format_validation_report(&validation));
            if validation.is_valid() {
                Ok(())
            } else {
                Err(ToolError::validation(format!(
                    "{} invalid rows in {}",
                    validation.invalid_rows,
                    file.display()
                )))
            }
        }
        BulkAction::Template { output, samples } => {
            io::write_template_csv(&output, samples)?;
            println!(
                "Wrote template with {} sample rows to {}",
                samples,
                output.display()
            );
            Ok(())
        }
        BulkAction::Process {
            file,
            secret,
            batch_size,
            delay,
            memo,
            dry_run,
            report,
        } => {
            let delay = match delay {
                Some(secs) if secs.is_finite() && secs >= 0.0 => {
                    Some(Duration::from_secs_f64(secs))
                }
                Some(_) => {
                    return Err(ToolError::validation("--delay must be a non-negative number"))
                }
                None => None,
            };
            let options = ProcessOptions {
                batch_size,
                delay,
                memo,
                dry_run,
            };
            let source_account = resolve_source(&config, secret.as_deref(), dry_run)?;
            if dry_run {
                let base_fee = config.base_fee;
                let processor = BulkPaymentProcessor::new(config, DryRunLedger::new(base_fee));
                process_and_report(&processor, &file, &source_account, &options, report).await
            } else {
                let ledger = HorizonLedger::new(client(&config)?);
                let processor = BulkPaymentProcessor::new(config, ledger);
                process_and_report(&processor, &file, &source_account, &options, report).await
            }
        }
    }
}

/// Derive the sending account for a run
///
/// Live runs need a secret seed, from `--secret` or the configuration.
/// Dry runs can fall back to the configured issuer, or an ephemeral
/// account when nothing is configured.
fn resolve_source(
    config: &Config,
    secret: Option<&str>,
    dry_run: bool,
) -> Result<String, ToolError> {
    let secret = secret.or_else(|| {
        (!config.issuer_secret_key.is_empty()).then_some(config.issuer_secret_key.as_str())
    });
    match secret {
        Some(secret) => Ok(Keypair::from_secret(secret)?.account_id()),
        None if dry_run => {
            if config.issuer_public_key.is_empty() {
                Ok(Keypair::random().account_id())
            } else {
                Ok(config.issuer_public_key.clone())
            }
        }
        None => Err(ToolError::validation(
            "--secret is required for live runs (or pass --dry-run)",
        )),
    }
}

async fn process_and_report<L: Ledger>(
    processor: &BulkPaymentProcessor<L>,
    file: &Path,
    source_account: &str,
    options: &ProcessOptions,
    report: Option<PathBuf>,
) -> Result<(), ToolError> {
    let validation = processor.validate_file(file)?;
    let estimate = processor.estimate_fees(
        validation.valid_rows,
        processor.effective_batch_size(options.batch_size),
    );
    print!("{}", format::format_fee_estimate(&estimate));
    println!();

    let summary = processor.process(file, source_account, options).await?;
    print!("{}", format::format_run_report(&summary));

    if let Some(path) = report {
        processor.write_report(&summary, &path)?;
        println!("\nWrote run report to {}", path.display());
    }
    if summary.successful {
        Ok(())
    } else {
        Err(ToolError::validation(format!(
            "{} of {} batches failed",
            summary.failed_batches, summary.total_batches
        )))
    }
}

async fn run_report(config: &Config, action: ReportAction) -> Result<(), ToolError> {
    let reporter = TransparencyReporter::new(client(config)?, config.clone());
    match action {
        ReportAction::Stats => {
            let data = reporter.current_stats().await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        ReportAction::Monthly { year, month } => {
            let now = chrono::Utc::now();
            let paths = reporter
                .monthly_report(
                    year.unwrap_or_else(|| now.year()),
                    month.unwrap_or_else(|| now.month()),
                )
                .await?;
            announce_report(&paths);
            Ok(())
        }
        ReportAction::Previous => {
            let paths = reporter.previous_month_report().await?;
            announce_report(&paths);
            Ok(())
        }
        ReportAction::Annual { year } => {
            let paths = reporter.annual_summary(year).await?;
            announce_report(&paths);
            Ok(())
        }
    }
}

fn announce_report(paths: &crate::report::ReportPaths) {
    println!("Wrote {}", paths.json.display());
    if let Some(html) = &paths.html {
        println!("Wrote {}", html.display());
    }
}

async fn run_network(config: &Config, action: NetworkAction) -> Result<(), ToolError> {
    match action {
        NetworkAction::Status => {
            let client = client(config)?;
            println!("Network:    {}", config.network);
            println!("Horizon:    {}", config.horizon_url());
            println!("Passphrase: {}", config.network.passphrase());
            let ledger = client.latest_ledger().await?;
            println!(
                "Ledger:     {} (closed {})",
                ledger.sequence,
                ledger.closed_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            let base_fee = client.base_fee().await?;
            println!("Base fee:   {} stroops", base_fee);
            if !config.issuer_public_key.is_empty() {
                match client.account(&config.issuer_public_key).await {
                    Ok(account) => println!(
                        "Issuer:     {} (sequence {})",
                        format::shorten(&account.account_id),
                        account.sequence
                    ),
                    Err(e) => println!("Issuer:     not reachable ({})", e),
                }
            }
            Ok(())
        }
    }
}

async fn run_submit_xdr(config: &Config, file: &Path) -> Result<(), ToolError> {
    if !file.exists() {
        return Err(ToolError::file_not_found(file));
    }
    let envelope = std::fs::read_to_string(file)?;
    let envelope = envelope.trim();
    if envelope.is_empty() {
        return Err(ToolError::validation("envelope file is empty"));
    }
    let response = client(config)?.submit_envelope(envelope).await?;
    print!("{}", format::format_submit_response(&response));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_source_from_secret() {
        let keypair = Keypair::random();
        let config = Config::default();
        let source = resolve_source(&config, Some(&keypair.secret()), false).unwrap();
        assert_eq!(source, keypair.account_id());
    }

    #[test]
    fn test_resolve_source_falls_back_to_configured_secret() {
        let keypair = Keypair::random();
        let mut config = Config::default();
        config.issuer_secret_key = keypair.secret();
        let source = resolve_source(&config, None, false).unwrap();
        assert_eq!(source, keypair.account_id());
    }

    #[test]
    fn test_resolve_source_live_requires_secret() {
        let config = Config::default();
        assert!(resolve_source(&config, None, false).is_err());
    }

    #[test]
    fn test_resolve_source_dry_run_prefers_issuer() {
        let mut config = Config::default();
        config.issuer_public_key = Keypair::random().account_id();
        let source = resolve_source(&config, None, true).unwrap();
        assert_eq!(source, config.issuer_public_key);
    }

    #[test]
    fn test_resolve_source_dry_run_without_issuer_is_ephemeral() {
        let config = Config::default();
        let source = resolve_source(&config, None, true).unwrap();
        assert!(crate::validate::is_valid_address(&source));
    }
}

//! Input validation for addresses, amounts, memos, and CSV rows
//!
//! All functions here are pure. Address and secret checks are shape-only
//! (prefix, length, base32 alphabet); full checksum verification happens in
//! [`crate::keys`] when key material is actually parsed.

use crate::types::{max_amount, stroop, ToolError, AMOUNT_MAX_SCALE, MEMO_TEXT_MAX_BYTES};
use rust_decimal::Decimal;
use std::str::FromStr;

/// RFC 4648 base32 alphabet used by Stellar strkeys
const BASE32_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Strkey length for account IDs and seeds
const STRKEY_LEN: usize = 56;

fn is_strkey_shaped(value: &str, prefix: char) -> bool {
    value.len() == STRKEY_LEN
        && value.starts_with(prefix)
        && value.chars().all(|c| BASE32_ALPHABET.contains(c))
}

/// Check the shape of a Stellar account address (`G...`, 56 base32 chars)
pub fn is_valid_address(address: &str) -> bool {
    is_strkey_shaped(address, 'G')
}

/// Check the shape of a Stellar secret seed (`S...`, 56 base32 chars)
pub fn is_valid_secret(secret: &str) -> bool {
    is_strkey_shaped(secret, 'S')
}

/// Parse a payment amount, enforcing Stellar's range and precision
///
/// Amounts must be positive, carry at most 7 fractional digits, and fit in
/// an i64 stroop count. Fractional digits are counted as written, so
/// `1.00000000` is rejected even though its value is representable.
pub fn parse_amount(amount: &str) -> Result<Decimal, ToolError> {
    let trimmed = amount.trim();
    let value =
        Decimal::from_str(trimmed).map_err(|_| ToolError::invalid_amount(trimmed))?;

    if value <= Decimal::ZERO
        || value.scale() > AMOUNT_MAX_SCALE
        || value > max_amount()
    {
        return Err(ToolError::invalid_amount(trimmed));
    }

    Ok(value)
}

/// Check an amount string without keeping the parsed value
pub fn validate_amount(amount: &str) -> bool {
    parse_amount(amount).is_ok()
}

/// Memo types supported by Stellar transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoKind {
    /// Free text, at most 28 UTF-8 bytes
    Text,
    /// Unsigned 64-bit integer
    Id,
    /// 32-byte hash, hex encoded
    Hash,
    /// 32-byte return hash, hex encoded
    Return,
}

/// Validate a memo against the rules for its type
///
/// An empty memo is always valid (it simply isn't attached).
pub fn validate_memo(memo: &str, kind: MemoKind) -> bool {
    if memo.is_empty() {
        return true;
    }

    match kind {
        MemoKind::Text => memo.len() <= MEMO_TEXT_MAX_BYTES,
        MemoKind::Id => memo.parse::<u64>().is_ok(),
        MemoKind::Hash | MemoKind::Return => {
            memo.len() == 64 && hex::decode(memo).is_ok()
        }
    }
}

/// Strip unsafe characters from a text memo and truncate to 28 bytes
///
/// Keeps alphanumerics, whitespace, and `- . _ @ #`. Truncation respects
/// char boundaries so the result is always valid UTF-8.
pub fn sanitize_memo(memo: &str) -> String {
    let filtered: String = memo
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '.' | '_' | '@' | '#')
        })
        .collect();

    truncate_to_bytes(&filtered, MEMO_TEXT_MAX_BYTES)
        .trim()
        .to_string()
}

/// Truncate a string to at most `max_bytes` UTF-8 bytes on a char boundary
pub fn truncate_to_bytes(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Result of validating a single bulk-payment row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValidation {
    /// Problems that make the row unusable
    pub errors: Vec<String>,
    /// Suspicious but acceptable values
    pub warnings: Vec<String>,
}

impl RowValidation {
    /// Whether the row can be processed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate one bulk-payment CSV row (address required, amount required,
/// memo optional)
///
/// Collects every problem on the row rather than stopping at the first, so
/// validation reports can show the full picture.
pub fn validate_row(
    address: Option<&str>,
    amount: Option<&str>,
    memo: Option<&str>,
) -> RowValidation {
    let mut result = RowValidation::default();

    match address.map(str::trim) {
        None | Some("") => result.errors.push("Missing address field".to_string()),
        Some(addr) if !is_valid_address(addr) => {
            result.errors.push(format!("Invalid Stellar address: {}", addr));
        }
        Some(_) => {}
    }

    match amount.map(str::trim) {
        None | Some("") => result.errors.push("Missing amount field".to_string()),
        Some(amt) => match parse_amount(amt) {
            Err(_) => result.errors.push(format!("Invalid amount: {}", amt)),
            Ok(value) => {
                if value < stroop() {
                    result.warnings.push(format!("Very small amount: {}", amt));
                }
            }
        },
    }

    if let Some(memo) = memo.map(str::trim) {
        if !memo.is_empty() && !validate_memo(memo, MemoKind::Text) {
            result.errors.push(format!("Invalid memo: {}", memo));
        }
    }

    result
}

/// Result of a configuration-level validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigCheck {
    /// Problems that make the configuration unusable
    pub errors: Vec<String>,
    /// Suspicious but workable settings
    pub warnings: Vec<String>,
}

impl ConfigCheck {
    /// Whether the checked configuration is usable
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a token definition (code, issuer, total supply)
pub fn validate_token_config(token_code: &str, issuer: &str, total_supply: &str) -> ConfigCheck {
    let mut result = ConfigCheck::default();

    if token_code.is_empty() {
        result.errors.push("Token code is required".to_string());
    } else if token_code.len() > 12 {
        result
            .errors
            .push("Token code must be 12 characters or less".to_string());
    } else if !token_code.chars().all(|c| c.is_ascii_alphanumeric()) {
        result
            .errors
            .push("Token code must be alphanumeric".to_string());
    }

    if !is_valid_address(issuer) {
        result.errors.push("Invalid issuer address".to_string());
    }

    if !validate_amount(total_supply) {
        result.errors.push("Invalid total supply amount".to_string());
    } else if let Ok(supply) = parse_amount(total_supply) {
        if supply > Decimal::new(922_337_203_685, 0) {
            result.warnings.push("Very large total supply".to_string());
        }
    }

    result
}

/// Validate a network name and Horizon URL pair
pub fn validate_network_config(network: &str, horizon_url: &str) -> ConfigCheck {
    let mut result = ConfigCheck::default();

    if network != "public" && network != "testnet" {
        result.errors.push(format!("Invalid network: {}", network));
    }

    if horizon_url.is_empty() {
        result.errors.push("Horizon URL is required".to_string());
    } else if !horizon_url.starts_with("http://") && !horizon_url.starts_with("https://") {
        result
            .errors
            .push("Horizon URL must start with http:// or https://".to_string());
    }

    if network == "testnet" && !horizon_url.to_lowercase().contains("testnet") {
        result
            .warnings
            .push("Network is testnet but URL doesn't contain 'testnet'".to_string());
    }

    result
}

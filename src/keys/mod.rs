//! Stellar key material: strkey encoding and ed25519 keypairs
//!
//! A strkey is a version byte, a 32-byte payload, and a little-endian
//! CRC-16/XMODEM checksum, base32 encoded without padding. Account IDs use
//! version `6 << 3` (so they render with a `G` prefix), seeds use `18 << 3`
//! (`S` prefix).

use crate::types::ToolError;
use crc::{Crc, CRC_16_XMODEM};
use data_encoding::BASE32_NOPAD;
use ed25519_dalek::SigningKey;
use rand::RngCore;
use std::fmt;

const VERSION_ACCOUNT: u8 = 6 << 3;
const VERSION_SEED: u8 = 18 << 3;

const CHECKSUM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

fn encode_strkey(version: u8, payload: &[u8; 32]) -> String {
    let mut data = Vec::with_capacity(35);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = CHECKSUM.checksum(&data);
    data.extend_from_slice(&checksum.to_le_bytes());
    BASE32_NOPAD.encode(&data)
}

fn decode_strkey(version: u8, encoded: &str) -> Option<[u8; 32]> {
    if encoded.len() != 56 {
        return None;
    }
    let data = BASE32_NOPAD.decode(encoded.as_bytes()).ok()?;
    if data.len() != 35 || data[0] != version {
        return None;
    }
    let (body, checksum) = data.split_at(33);
    if CHECKSUM.checksum(body).to_le_bytes() != checksum {
        return None;
    }
    let mut payload = [0u8; 32];
    payload.copy_from_slice(&body[1..]);
    Some(payload)
}

/// Encode a 32-byte ed25519 public key as a `G...` account ID
pub fn encode_account_id(key: &[u8; 32]) -> String {
    encode_strkey(VERSION_ACCOUNT, key)
}

/// Decode a `G...` account ID, verifying its checksum
pub fn decode_account_id(address: &str) -> Result<[u8; 32], ToolError> {
    decode_strkey(VERSION_ACCOUNT, address).ok_or_else(|| ToolError::invalid_address(address))
}

/// Encode a 32-byte ed25519 secret seed as an `S...` strkey
pub fn encode_seed(seed: &[u8; 32]) -> String {
    encode_strkey(VERSION_SEED, seed)
}

/// Decode an `S...` secret seed, verifying its checksum
///
/// The error never carries the input, so a mistyped seed can't leak into
/// logs.
pub fn decode_seed(secret: &str) -> Result<[u8; 32], ToolError> {
    decode_strkey(VERSION_SEED, secret).ok_or(ToolError::InvalidSecret)
}

/// An ed25519 keypair addressed by Stellar strkeys
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair
    pub fn random() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// Reconstruct a keypair from an `S...` secret seed
    pub fn from_secret(secret: &str) -> Result<Self, ToolError> {
        let seed = decode_seed(secret)?;
        Ok(Self {
            signing: SigningKey::from_bytes(&seed),
        })
    }

    /// The `G...` account ID for this keypair
    pub fn account_id(&self) -> String {
        encode_account_id(self.signing.verifying_key().as_bytes())
    }

    /// The `S...` secret seed for this keypair
    pub fn secret(&self) -> String {
        encode_seed(&self.signing.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("account_id", &self.account_id())
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{is_valid_address, is_valid_secret};
    use rstest::rstest;

    #[test]
    fn test_generated_keypair_round_trips() {
        let keypair = Keypair::random();
        let restored = Keypair::from_secret(&keypair.secret()).unwrap();
        assert_eq!(restored.account_id(), keypair.account_id());
    }

    #[test]
    fn test_generated_strkeys_are_well_shaped() {
        let keypair = Keypair::random();
        assert!(is_valid_address(&keypair.account_id()));
        assert!(is_valid_secret(&keypair.secret()));
    }

    #[test]
    fn test_account_id_round_trips_through_codec() {
        let payload = [42u8; 32];
        let address = encode_account_id(&payload);
        assert_eq!(decode_account_id(&address).unwrap(), payload);
    }

    #[test]
    fn test_corrupted_address_fails_checksum() {
        let address = Keypair::random().account_id();
        // Flip one payload character to a different alphabet character
        let mut chars: Vec<char> = address.chars().collect();
        chars[10] = if chars[10] == 'A' { 'B' } else { 'A' };
        let corrupted: String = chars.into_iter().collect();
        assert!(decode_account_id(&corrupted).is_err());
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("GABC")]
    #[case::lowercase(&Keypair::random().account_id().to_lowercase())]
    #[case::seed_as_address(&Keypair::random().secret())]
    fn test_decode_account_id_rejects(#[case] address: &str) {
        assert!(decode_account_id(address).is_err());
    }

    #[test]
    fn test_decode_seed_rejects_account_id() {
        let address = Keypair::random().account_id();
        assert!(decode_seed(&address).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let keypair = Keypair::random();
        let rendered = format!("{:?}", keypair);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&keypair.secret()));
    }

    #[rstest]
    #[case::empty(&[], 0x0000)]
    #[case::single(&[0x41], 0x58e5)]
    fn test_checksum_is_crc16_xmodem(#[case] data: &[u8], #[case] expected: u16) {
        assert_eq!(CHECKSUM.checksum(data), expected);
    }
}

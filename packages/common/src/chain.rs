//! Chain kinds and address encoding rules.
//!
//! Every registered chain carries an explicit [`ChainKind`], fixed at
//! registration. The kind decides how an address typed by an operator is
//! turned into the raw bytes carried in wire messages, and back.
//!
//! | Kind    | Text form                       | Stored bytes               |
//! |---------|---------------------------------|----------------------------|
//! | Evm     | `0x` + 40 hex chars             | 20 bytes                   |
//! | Tron    | base58check (`T...`)            | 21 bytes, leading `0x41`   |
//! | Solana  | base58                          | 32 bytes                   |
//! | Bitcoin | bech32 or base58check           | UTF-8 of the address text  |
//! | Ton     | opaque                          | UTF-8 of the address text  |
//! | Other   | opaque (relay chain, cosmos)    | UTF-8 of the address text  |

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdError, StdResult};

/// Tron address version byte
pub const TRON_ADDRESS_PREFIX: u8 = 0x41;

/// Longest address a wire message can carry (one length byte)
pub const MAX_ADDRESS_LEN: usize = 255;

#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum ChainKind {
    Evm,
    Tron,
    Ton,
    Solana,
    Bitcoin,
    Other,
}

impl ChainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKind::Evm => "evm",
            ChainKind::Tron => "tron",
            ChainKind::Ton => "ton",
            ChainKind::Solana => "solana",
            ChainKind::Bitcoin => "bitcoin",
            ChainKind::Other => "other",
        }
    }

    /// Parse an address in this chain's text form into wire bytes.
    pub fn parse_address(&self, text: &str) -> StdResult<Vec<u8>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StdError::generic_err("address is empty"));
        }
        let bytes = match self {
            ChainKind::Evm => parse_evm_address(text)?.to_vec(),
            ChainKind::Tron => parse_tron_address(text)?,
            ChainKind::Solana => {
                let raw = bs58::decode(text)
                    .into_vec()
                    .map_err(|e| StdError::generic_err(format!("Invalid base58 address: {}", e)))?;
                if raw.len() != 32 {
                    return Err(StdError::generic_err(format!(
                        "Invalid solana address length: expected 32 bytes, got {}",
                        raw.len()
                    )));
                }
                raw
            }
            ChainKind::Bitcoin => {
                validate_bitcoin_address(text)?;
                text.as_bytes().to_vec()
            }
            ChainKind::Ton | ChainKind::Other => text.as_bytes().to_vec(),
        };
        self.validate_bytes(&bytes)?;
        Ok(bytes)
    }

    /// Check that raw bytes have the shape this chain expects.
    pub fn validate_bytes(&self, bytes: &[u8]) -> StdResult<()> {
        if bytes.is_empty() {
            return Err(StdError::generic_err("address is empty"));
        }
        if bytes.len() > MAX_ADDRESS_LEN {
            return Err(StdError::generic_err(format!(
                "address too long: {} bytes",
                bytes.len()
            )));
        }
        match self {
            ChainKind::Evm if bytes.len() != 20 => Err(StdError::generic_err(format!(
                "Invalid EVM address length: expected 20 bytes, got {}",
                bytes.len()
            ))),
            ChainKind::Tron if bytes.len() != 21 || bytes[0] != TRON_ADDRESS_PREFIX => {
                Err(StdError::generic_err("Invalid tron address bytes"))
            }
            ChainKind::Solana if bytes.len() != 32 => Err(StdError::generic_err(format!(
                "Invalid solana address length: expected 32 bytes, got {}",
                bytes.len()
            ))),
            ChainKind::Bitcoin | ChainKind::Ton if std::str::from_utf8(bytes).is_err() => {
                Err(StdError::generic_err("address is not valid UTF-8"))
            }
            _ => Ok(()),
        }
    }

    /// Render wire bytes in this chain's text form.
    pub fn format_address(&self, bytes: &[u8]) -> String {
        match self {
            ChainKind::Evm => format!("0x{}", hex::encode(bytes)),
            ChainKind::Tron => bs58::encode(bytes).with_check().into_string(),
            ChainKind::Solana => bs58::encode(bytes).into_string(),
            ChainKind::Bitcoin | ChainKind::Ton | ChainKind::Other => {
                match std::str::from_utf8(bytes) {
                    Ok(s) => s.to_string(),
                    Err(_) => format!("0x{}", hex::encode(bytes)),
                }
            }
        }
    }
}

impl std::fmt::Display for ChainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a 0x-prefixed (or bare) 40 character hex address
pub fn parse_evm_address(addr: &str) -> StdResult<[u8; 20]> {
    let hex_str = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    if hex_str.len() != 40 {
        return Err(StdError::generic_err(format!(
            "Invalid EVM address length: expected 40 hex chars, got {}",
            hex_str.len()
        )));
    }
    let bytes = hex::decode(hex_str)
        .map_err(|e| StdError::generic_err(format!("Invalid hex: {}", e)))?;
    let mut result = [0u8; 20];
    result.copy_from_slice(&bytes);
    Ok(result)
}

/// Tron accepts base58check (`T...`) or the 21-byte hex form (`41...`).
fn parse_tron_address(addr: &str) -> StdResult<Vec<u8>> {
    if addr.len() == 42 && addr.starts_with("41") {
        return hex::decode(addr).map_err(|e| StdError::generic_err(format!("Invalid hex: {}", e)));
    }
    bs58::decode(addr)
        .with_check(Some(TRON_ADDRESS_PREFIX))
        .into_vec()
        .map_err(|e| StdError::generic_err(format!("Invalid tron address: {}", e)))
}

fn validate_bitcoin_address(addr: &str) -> StdResult<()> {
    let lower = addr.to_ascii_lowercase();
    if lower.starts_with("bc1") || lower.starts_with("tb1") || lower.starts_with("bcrt1") {
        bech32::decode(addr)
            .map_err(|e| StdError::generic_err(format!("Invalid bech32 address: {}", e)))?;
        return Ok(());
    }
    let raw = bs58::decode(addr)
        .with_check(None)
        .into_vec()
        .map_err(|e| StdError::generic_err(format!("Invalid bitcoin address: {}", e)))?;
    if raw.len() != 21 {
        return Err(StdError::generic_err("Invalid bitcoin address length"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evm_round_trip() {
        let text = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
        let bytes = ChainKind::Evm.parse_address(text).unwrap();
        assert_eq!(bytes.len(), 20);
        assert_eq!(ChainKind::Evm.format_address(&bytes), text);
    }

    #[test]
    fn test_evm_rejects_wrong_length() {
        assert!(ChainKind::Evm.parse_address("0x1234").is_err());
        assert!(ChainKind::Evm.validate_bytes(&[1u8; 32]).is_err());
    }

    #[test]
    fn test_solana_base58() {
        let key = [7u8; 32];
        let text = bs58::encode(key).into_string();
        let bytes = ChainKind::Solana.parse_address(&text).unwrap();
        assert_eq!(bytes, key.to_vec());
        assert_eq!(ChainKind::Solana.format_address(&bytes), text);
    }

    #[test]
    fn test_tron_base58check_and_hex_forms() {
        let mut raw = vec![TRON_ADDRESS_PREFIX];
        raw.extend_from_slice(&[0xAB; 20]);
        let text = bs58::encode(&raw).with_check().into_string();
        assert!(text.starts_with('T'));
        assert_eq!(ChainKind::Tron.parse_address(&text).unwrap(), raw);
        assert_eq!(
            ChainKind::Tron.parse_address(&hex::encode(&raw)).unwrap(),
            raw
        );
        assert_eq!(ChainKind::Tron.format_address(&raw), text);
    }

    #[test]
    fn test_bitcoin_bech32_kept_as_text() {
        let addr = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        let bytes = ChainKind::Bitcoin.parse_address(addr).unwrap();
        assert_eq!(bytes, addr.as_bytes());
        assert!(ChainKind::Bitcoin.parse_address("bc1notvalid").is_err());
    }

    #[test]
    fn test_opaque_kinds() {
        let ton = "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N";
        assert_eq!(ChainKind::Ton.parse_address(ton).unwrap(), ton.as_bytes());
        assert!(ChainKind::Other.parse_address("  ").is_err());
        assert_eq!(ChainKind::Other.format_address(b"terra1abc"), "terra1abc");
    }
}

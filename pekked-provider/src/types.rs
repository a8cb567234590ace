use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProviderError, Result};

/// Wei per finney (10^15).
const WEI_PER_FINNEY: u128 = 1_000_000_000_000_000;
/// Wei per ether (10^18).
const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;
/// Decimal places of the native currency.
const ETHER_DECIMALS: usize = 18;

// ============ Address ============

/// A 20-byte account or contract address.
///
/// Keeps the textual form the wallet reported (checksummed or lowercase).
/// Equality through `==` is exact; use [`Address::matches`] to compare
/// addresses coming from different sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse a `0x`-prefixed, 40 hex digit address.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| invalid_address(trimmed, "missing 0x prefix"))?;
        if digits.len() != 40 {
            return Err(invalid_address(trimmed, "expected 40 hex digits"));
        }
        if hex::decode(digits).is_err() {
            return Err(invalid_address(trimmed, "not hex"));
        }
        Ok(Self(format!("0x{digits}")))
    }

    /// Build an address from raw bytes (lowercase hex).
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Raw 20 bytes.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        // `parse` guarantees 40 valid hex digits after the prefix
        if let Ok(decoded) = hex::decode(&self.0[2..]) {
            out.copy_from_slice(&decoded);
        }
        out
    }

    /// Case-insensitive comparison.
    pub fn matches(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Shortened form for display: `0x1234...abcd`.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid_address(value: &str, detail: &str) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: "types".to_string(),
        param: "address".to_string(),
        detail: format!("{value}: {detail}"),
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ProviderError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

// ============ ChainId ============

/// EIP-155 chain id. Serialized as a `0x` quantity, the way wallets report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

impl ChainId {
    /// `0x`-prefixed lowercase hex without leading zeros.
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parse a `0x` hex quantity or a decimal string.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix("0x") {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed.map(Self).map_err(|e| ProviderError::InvalidParameter {
            provider: "types".to_string(),
            param: "chain_id".to_string(),
            detail: format!("{trimmed}: {e}"),
        })
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Raw::Number(n) => Ok(Self(n)),
        }
    }
}

// ============ Wei ============

/// An amount of the native currency in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wei(pub u128);

impl Wei {
    pub const ZERO: Self = Self(0);

    /// Amount in thousandths of a native unit.
    pub const fn from_finney(finney: u128) -> Self {
        Self(finney * WEI_PER_FINNEY)
    }

    /// Parse a decimal ether string (`"0.5"`, `"12"`, `".25"`).
    pub fn from_ether(s: &str) -> Result<Self> {
        let invalid = |detail: &str| ProviderError::InvalidParameter {
            provider: "types".to_string(),
            param: "amount".to_string(),
            detail: format!("{s}: {detail}"),
        };

        let trimmed = s.trim();
        let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("empty amount"));
        }
        if frac.len() > ETHER_DECIMALS {
            return Err(invalid("more than 18 decimal places"));
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("not a decimal number"));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("overflow"))?
        };
        let frac: u128 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<width$}", width = ETHER_DECIMALS)
                .parse()
                .map_err(|_| invalid("overflow"))?
        };

        whole
            .checked_mul(WEI_PER_ETHER)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or_else(|| invalid("overflow"))
    }

    /// Parse a `0x` hex quantity as returned by `eth_getBalance`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches("0x");
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }
        u128::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| ProviderError::ParseError {
                provider: "types".to_string(),
                detail: format!("invalid quantity {s}: {e}"),
            })
    }

    /// `0x` hex quantity for JSON-RPC requests.
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// Human-readable ether amount, e.g. `0.5` or `1.0`.
    pub fn format_ether(self) -> String {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;
        let frac = format!("{frac:0width$}", width = ETHER_DECIMALS);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            format!("{whole}.0")
        } else {
            format!("{whole}.{frac}")
        }
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_ether())
    }
}

// ============ Transactions ============

/// Transaction hash as returned by `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final execution status of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

/// Confirmation of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub status: TxStatus,
    pub block_number: Option<u64>,
    /// Set when the transaction created a contract.
    pub contract_address: Option<Address>,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

/// A state-changing transaction handed to the wallet for signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Option<Address>,
    /// `None` deploys a contract.
    pub to: Option<Address>,
    pub value: Option<Wei>,
    pub data: Vec<u8>,
}

/// A read-only contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Address,
    pub data: Vec<u8>,
}

// ============ Chain descriptor ============

/// Native currency metadata of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Everything a wallet needs to add a network (EIP-3085 parameters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl ChainDescriptor {
    /// Explorer link for a transaction, if the chain has an explorer.
    pub fn tx_url(&self, hash: &TxHash) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{}/tx/{hash}", base.trim_end_matches('/')))
    }
}

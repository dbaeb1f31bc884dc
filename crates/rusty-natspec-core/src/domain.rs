use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, Bytes, Selector, U256};
use serde::{Deserialize, Deserializer};

use crate::document::AbiFunction;

/// A transaction the user is about to sign.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PendingTransaction {
    pub to: Address,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default, deserialize_with = "quantity::u256")]
    pub value: U256,
}

/// Digest bytes of an IPFS content identifier, displayed in base58.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(Vec<u8>);

impl ContentId {
    pub fn from_digest(digest: impl Into<Vec<u8>>) -> Self {
        Self(digest.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    pub fn from_base58(encoded: &str) -> Result<Self, bs58::decode::Error> {
        bs58::decode(encoded).into_vec().map(Self)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for ContentId {
    type Err = bs58::decode::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    NotVerified,
    Unknown(String),
}

impl VerificationStatus {
    /// One-line text shown above the description in the confirmation prompt.
    pub fn summary(&self) -> String {
        match self {
            Self::Verified => "The contract is verified with Sourcify".to_owned(),
            Self::NotVerified => "The contract is not verified".to_owned(),
            Self::Unknown(reason) => format!("Verification status unknown: {reason}"),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// The resolved call and its rendered notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCallDescription {
    pub selector: Selector,
    pub function: AbiFunction,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub description: String,
    pub verification: VerificationStatus,
    pub call: DecodedCallDescription,
    /// Compiler version from the metadata document, else from the bytecode trailer.
    pub compiler_version: Option<String>,
}

/// Lenient JSON quantities: numbers, decimal strings and `0x` hex strings.
pub(crate) mod quantity {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    fn parse<E: serde::de::Error>(repr: Repr) -> Result<U256, E> {
        match repr {
            Repr::Number(n) => Ok(U256::from(n)),
            Repr::Text(s) => {
                let s = s.trim();
                let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    Some(hex) => U256::from_str_radix(hex, 16),
                    None => U256::from_str_radix(s, 10),
                };
                parsed.map_err(|e| E::custom(format!("invalid quantity '{s}': {e}")))
            }
        }
    }

    pub fn u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        parse(Repr::deserialize(deserializer)?)
    }

    pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value: U256 = parse(Repr::deserialize(deserializer)?)?;
        u64::try_from(value)
            .map_err(|_| serde::de::Error::custom(format!("quantity {value} overflows u64")))
    }
}

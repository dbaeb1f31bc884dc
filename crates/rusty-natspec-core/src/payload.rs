//! CBOR metadata payload decoding
//!
//! The payload is a CBOR map keyed by short ASCII tags. solc emits some of:
//! - `ipfs`: multihash of the metadata JSON (`0x12 0x20 <sha256>`)
//! - `bzzr0` / `bzzr1`: Swarm hash of the metadata JSON (older compilers)
//! - `solc`: compiler version, 3 raw bytes for releases or text for nightlies
//! - `experimental`: set when experimental features were enabled

use ciborium::value::Value;

use crate::domain::ContentId;
use crate::error::DecodeError;

/// The decoded trailer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerMetadata {
    pub ipfs: Option<Vec<u8>>,
    pub bzzr0: Option<Vec<u8>>,
    pub bzzr1: Option<Vec<u8>>,
    pub solc: Option<String>,
    pub experimental: Option<bool>,
}

impl CompilerMetadata {
    /// The IPFS content identifier the metadata document lives under.
    pub fn content_id(&self) -> Result<ContentId, DecodeError> {
        if let Some(digest) = &self.ipfs {
            return Ok(ContentId::from_digest(digest.clone()));
        }
        let reason = if self.bzzr1.is_some() || self.bzzr0.is_some() {
            "only a Swarm hash (bzzr) is present, which cannot be fetched over IPFS"
        } else {
            "no ipfs field"
        };
        Err(DecodeError::MissingContentField(reason.to_owned()))
    }
}

/// Decode the CBOR metadata map.
pub fn decode_payload(payload: &[u8]) -> Result<CompilerMetadata, DecodeError> {
    let mut reader = payload;
    let value: Value = ciborium::de::from_reader(&mut reader)
        .map_err(|e| DecodeError::PayloadDecode(e.to_string()))?;
    if !reader.is_empty() {
        return Err(DecodeError::PayloadDecode(format!(
            "{} trailing byte(s) after the metadata map",
            reader.len()
        )));
    }

    let entries = match value {
        Value::Map(entries) => entries,
        _ => {
            return Err(DecodeError::PayloadDecode(
                "top-level item is not a map".to_owned(),
            ))
        }
    };

    let mut meta = CompilerMetadata::default();
    for (key, value) in entries {
        let Value::Text(key) = key else {
            continue;
        };
        match (key.as_str(), value) {
            ("ipfs", Value::Bytes(digest)) => meta.ipfs = Some(digest),
            ("ipfs", _) => {
                return Err(DecodeError::MissingContentField(
                    "ipfs field is not a byte string".to_owned(),
                ))
            }
            ("bzzr0", Value::Bytes(digest)) => meta.bzzr0 = Some(digest),
            ("bzzr1", Value::Bytes(digest)) => meta.bzzr1 = Some(digest),
            ("solc", Value::Bytes(v)) if v.len() == 3 => {
                meta.solc = Some(format!("{}.{}.{}", v[0], v[1], v[2]))
            }
            ("solc", Value::Text(v)) => meta.solc = Some(v),
            ("experimental", Value::Bool(flag)) => meta.experimental = Some(flag),
            (other, _) => tracing::debug!(key = other, "ignoring metadata field"),
        }
    }

    Ok(meta)
}

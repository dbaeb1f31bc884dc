//! Selector resolution against a fetched ABI

use alloy::primitives::{hex, keccak256, Selector};

use crate::document::AbiFunction;
use crate::error::DecodeError;

/// `keccak256(signature)[0..4]`
pub fn selector_of(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::from_slice(&hash[..4])
}

/// Leading four bytes of the call-data.
pub fn call_selector(call_data: &[u8]) -> Result<Selector, DecodeError> {
    match call_data.get(..4) {
        Some(head) => Ok(Selector::from_slice(head)),
        None => Err(DecodeError::SelectorNotFound {
            selector: format!("0x{}", hex::encode(call_data)),
        }),
    }
}

/// Find the ABI function whose selector is `selector`.
///
/// Colliding selectors resolve to the earliest entry in declaration order.
pub fn resolve(selector: Selector, abi: &[AbiFunction]) -> Result<&AbiFunction, DecodeError> {
    abi.iter()
        .find(|f| f.selector() == selector)
        .ok_or_else(|| DecodeError::SelectorNotFound {
            selector: selector.to_string(),
        })
}

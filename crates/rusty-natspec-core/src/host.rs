//! Host-facing request and prompt shapes
//!
//! The host delivers `{ "method": "promptDecodedTransaction", "params": { "transaction":
//! { "to", "data", "value" }, "chainId" } }` and shows the returned [`ConfirmPrompt`]
//! in its confirmation dialog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{quantity, DecodeResult, PendingTransaction};
use crate::error::DecodeError;
use crate::orchestrator::DecodeOrchestrator;
use crate::ports::{CodeProvider, MetadataFetcher, VerificationRegistry};

pub const PROMPT_DECODED_TRANSACTION: &str = "promptDecodedTransaction";
pub const PROMPT_TITLE: &str = "Decoded Transaction";

#[derive(Debug, Clone, Deserialize)]
pub struct HostRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeParams {
    pub transaction: PendingTransaction,
    #[serde(deserialize_with = "quantity::u64")]
    pub chain_id: u64,
}

/// Payload for the host's confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPrompt {
    pub prompt: String,
    pub description: String,
    pub text_area_content: String,
}

impl From<&DecodeResult> for ConfirmPrompt {
    fn from(result: &DecodeResult) -> Self {
        Self {
            prompt: PROMPT_TITLE.to_owned(),
            description: result.verification.summary(),
            text_area_content: result.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl HostError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MethodNotFound(_) => "METHOD_NOT_FOUND",
            Self::InvalidParams(_) => "INVALID_PARAMS",
            Self::Decode(e) => e.code(),
        }
    }

    pub fn to_payload(&self) -> HostErrorPayload {
        HostErrorPayload {
            code: self.code().to_owned(),
            message: self.to_string(),
        }
    }
}

/// Error shape returned to the host in place of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostErrorPayload {
    pub code: String,
    pub message: String,
}

pub async fn handle_request<C, F, V>(
    orchestrator: &DecodeOrchestrator<C, F, V>,
    request: HostRequest,
) -> Result<ConfirmPrompt, HostError>
where
    C: CodeProvider,
    F: MetadataFetcher,
    V: VerificationRegistry,
{
    if request.method != PROMPT_DECODED_TRANSACTION {
        return Err(HostError::MethodNotFound(request.method));
    }

    let params: DecodeParams = serde_json::from_value(request.params)
        .map_err(|e| HostError::InvalidParams(e.to_string()))?;
    tracing::info!(
        chain_id = params.chain_id,
        to = %params.transaction.to,
        "decoding pending transaction"
    );

    let result = orchestrator
        .decode(params.chain_id, &params.transaction)
        .await?;
    Ok(ConfirmPrompt::from(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use serde_json::json;

    #[test]
    fn test_params_accept_loose_quantities() {
        let params: DecodeParams = serde_json::from_value(json!({
            "transaction": {
                "to": "0x000000000000000000000000000000000000beef",
                "data": "0x8456cb59",
                "value": "0x0de0b6b3a7640000"
            },
            "chainId": "0x5"
        }))
        .unwrap();
        assert_eq!(params.chain_id, 5);
        assert_eq!(params.transaction.value, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(params.transaction.data.len(), 4);

        let params: DecodeParams = serde_json::from_value(json!({
            "transaction": { "to": "0x000000000000000000000000000000000000beef" },
            "chainId": 1
        }))
        .unwrap();
        assert_eq!(params.chain_id, 1);
        assert!(params.transaction.data.is_empty());
        assert_eq!(params.transaction.value, U256::ZERO);

        let params: DecodeParams = serde_json::from_value(json!({
            "transaction": { "to": "0x000000000000000000000000000000000000beef", "value": "42" },
            "chainId": "137"
        }))
        .unwrap();
        assert_eq!(params.chain_id, 137);
        assert_eq!(params.transaction.value, U256::from(42u64));
    }

    #[test]
    fn test_prompt_serializes_camel_case() {
        let prompt = ConfirmPrompt {
            prompt: PROMPT_TITLE.to_owned(),
            description: "The contract is not verified".to_owned(),
            text_area_content: "Multiply by 21".to_owned(),
        };
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["textAreaContent"], "Multiply by 21");
        assert_eq!(json["prompt"], "Decoded Transaction");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            HostError::MethodNotFound("eth_sign".to_owned()).code(),
            "METHOD_NOT_FOUND"
        );
        let payload = HostError::from(DecodeError::SelectorNotFound {
            selector: "0xdeadbeef".to_owned(),
        })
        .to_payload();
        assert_eq!(payload.code, "SELECTOR_NOT_FOUND");
        assert!(payload.message.contains("0xdeadbeef"));
    }
}

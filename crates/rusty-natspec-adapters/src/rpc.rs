use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use rusty_natspec_core::{CodeProvider, PortError};

use crate::http::{build_client, transport_error};
use crate::NatspecAdapterConfig;

/// Reads deployed code over plain JSON-RPC.
///
/// The endpoint serves a single chain, so every lookup first confirms that
/// `eth_chainId` matches the requested chain before asking for code.
#[derive(Debug, Clone)]
pub struct JsonRpcCodeProvider {
    client: reqwest::Client,
    rpc_url: String,
}

impl JsonRpcCodeProvider {
    pub fn with_config(config: &NatspecAdapterConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: build_client(config)?,
            rpc_url: config.rpc_url.clone(),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error("rpc request failed", e))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| transport_error("rpc json decode failed", e))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "rpc status {status}: {body}"
            )));
        }
        if let Some(err) = body.get("error") {
            return Err(PortError::Transport(format!("rpc returned error: {err}")));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport(format!("{method}: missing result")))
    }

    pub async fn chain_id(&self) -> Result<u64, PortError> {
        let result = self.call("eth_chainId", serde_json::json!([])).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| PortError::Transport("eth_chainId: string expected".to_owned()))?;
        parse_quantity(raw)
            .ok_or_else(|| PortError::Validation(format!("eth_chainId: invalid quantity {raw}")))
    }
}

fn parse_quantity(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

#[async_trait]
impl CodeProvider for JsonRpcCodeProvider {
    async fn code_at(&self, chain_id: u64, address: Address) -> Result<Bytes, PortError> {
        let remote = self.chain_id().await?;
        if remote != chain_id {
            return Err(PortError::Validation(format!(
                "rpc endpoint serves chain {remote}, requested {chain_id}"
            )));
        }

        debug!(%address, chain_id, "eth_getCode");
        let result = self
            .call(
                "eth_getCode",
                serde_json::json!([address.to_string(), "latest"]),
            )
            .await?;
        let raw = result
            .as_str()
            .ok_or_else(|| PortError::Transport("eth_getCode: string expected".to_owned()))?;
        raw.parse::<Bytes>()
            .map_err(|e| PortError::Validation(format!("eth_getCode: invalid hex: {e}")))
    }
}

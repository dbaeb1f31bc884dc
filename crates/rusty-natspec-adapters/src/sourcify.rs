//! Sourcify verification lookup
//!
//! Uses the Sourcify repository's static file layout:
//! `{repo}/contracts/full_match/{chainId}/{address}/metadata.json`
//!
//! Only full matches count as verified. A missing file means the contract was never
//! verified (or only partially), anything else leaves the status unknown.

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use rusty_natspec_core::{PortError, VerificationRegistry, VerificationStatus};

use crate::http::{build_client, read_limited, transport_error};
use crate::NatspecAdapterConfig;

/// Path of a contract's metadata under the full-match tree
fn full_match_path(chain_id: u64, address: Address) -> String {
    // checksummed, the way Sourcify names its directories
    format!("/contracts/full_match/{chain_id}/{address}/metadata.json")
}

#[derive(Debug, Clone)]
pub struct SourcifyRegistry {
    client: reqwest::Client,
    repo_url: String,
    max_bytes: usize,
}

impl SourcifyRegistry {
    pub fn with_config(config: &NatspecAdapterConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: build_client(config)?,
            repo_url: config.sourcify_repo_url.trim_end_matches('/').to_owned(),
            max_bytes: config.metadata_max_bytes,
        })
    }

    pub fn metadata_url(&self, chain_id: u64, address: Address) -> String {
        format!("{}{}", self.repo_url, full_match_path(chain_id, address))
    }
}

#[async_trait]
impl VerificationRegistry for SourcifyRegistry {
    async fn lookup(
        &self,
        chain_id: u64,
        address: Address,
    ) -> Result<VerificationStatus, PortError> {
        let url = self.metadata_url(chain_id, address);
        debug!(%url, "checking sourcify");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("sourcify request failed", e))?;

        let status = response.status();
        debug!(%status, "sourcify responded");

        if status == StatusCode::NOT_FOUND {
            return Ok(VerificationStatus::NotVerified);
        }
        if !status.is_success() {
            return Ok(VerificationStatus::Unknown(format!(
                "sourcify returned {status}"
            )));
        }

        let body = read_limited(response, self.max_bytes, "sourcify").await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(VerificationStatus::Unknown(
                "sourcify returned an empty body".to_owned(),
            ));
        }
        Ok(VerificationStatus::Verified)
    }
}

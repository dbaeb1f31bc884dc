use alloy::primitives::Bytes;
use async_trait::async_trait;
use tracing::debug;

use rusty_natspec_core::{ContentId, MetadataFetcher, PortError};

use crate::http::{build_client, read_limited, transport_error};
use crate::NatspecAdapterConfig;

/// Fetches metadata documents through a public IPFS HTTP gateway.
#[derive(Debug, Clone)]
pub struct IpfsGatewayFetcher {
    client: reqwest::Client,
    gateway_url: String,
    max_bytes: usize,
}

impl IpfsGatewayFetcher {
    pub fn with_config(config: &NatspecAdapterConfig) -> Result<Self, PortError> {
        Ok(Self {
            client: build_client(config)?,
            gateway_url: config.ipfs_gateway_url.trim_end_matches('/').to_owned(),
            max_bytes: config.metadata_max_bytes,
        })
    }

    pub fn document_url(&self, cid: &ContentId) -> String {
        format!("{}/ipfs/{}", self.gateway_url, cid)
    }
}

#[async_trait]
impl MetadataFetcher for IpfsGatewayFetcher {
    async fn fetch(&self, cid: &ContentId) -> Result<Bytes, PortError> {
        let url = self.document_url(cid);
        debug!(%url, "fetching metadata document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("ipfs gateway request failed", e))?;

        let status = response.status();
        debug!(%status, "ipfs gateway responded");
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "ipfs gateway returned {status} for {cid}"
            )));
        }

        read_limited(response, self.max_bytes, "ipfs gateway").await
    }
}

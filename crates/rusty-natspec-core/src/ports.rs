use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ContentId, VerificationStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Reads deployed code, the `eth_getCode` of whichever chain the caller is on.
#[async_trait]
pub trait CodeProvider: Send + Sync {
    async fn code_at(&self, chain_id: u64, address: Address) -> Result<Bytes, PortError>;
}

/// Retrieves a raw metadata document body from a content-addressed store.
///
/// `Transport`/`Timeout` mean nothing was retrieved. `Validation` means a body came
/// back but was refused (e.g. over the size limit).
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, cid: &ContentId) -> Result<Bytes, PortError>;
}

#[async_trait]
pub trait VerificationRegistry: Send + Sync {
    async fn lookup(&self, chain_id: u64, address: Address)
        -> Result<VerificationStatus, PortError>;
}

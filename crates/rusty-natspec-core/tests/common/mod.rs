#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, Bytes, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Barrier;

use rusty_natspec_core::{
    selector_of, CodeProvider, ContentId, DecodeOrchestrator, MetadataFetcher, PendingTransaction,
    PortError, VerificationRegistry, VerificationStatus,
};

pub const DIGEST: [u8; 32] = [0x5f; 32];

pub fn contract() -> Address {
    address!("000000000000000000000000000000000000cafe")
}

/// Code provider that returns the same answer for every address.
pub struct StaticCode(pub Result<Bytes, PortError>);

#[async_trait]
impl CodeProvider for StaticCode {
    async fn code_at(&self, _chain_id: u64, _address: Address) -> Result<Bytes, PortError> {
        self.0.clone()
    }
}

/// Fetcher serving one canned body and recording the ids asked for.
pub struct StaticFetcher {
    body: Result<Bytes, PortError>,
    pub requested: Mutex<Vec<String>>,
    barrier: Option<Arc<Barrier>>,
}

impl StaticFetcher {
    pub fn json(body: &Value) -> Self {
        Self::raw(Ok(Bytes::from(body.to_string().into_bytes())))
    }

    pub fn raw(body: Result<Bytes, PortError>) -> Self {
        Self {
            body,
            requested: Mutex::new(Vec::new()),
            barrier: None,
        }
    }

    pub fn meeting_at(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }
}

#[async_trait]
impl MetadataFetcher for StaticFetcher {
    async fn fetch(&self, cid: &ContentId) -> Result<Bytes, PortError> {
        self.requested
            .lock()
            .expect("requested lock")
            .push(cid.to_base58());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.body.clone()
    }
}

pub struct StaticRegistry {
    answer: Result<VerificationStatus, PortError>,
    barrier: Option<Arc<Barrier>>,
}

impl StaticRegistry {
    pub fn answering(answer: Result<VerificationStatus, PortError>) -> Self {
        Self {
            answer,
            barrier: None,
        }
    }

    pub fn meeting_at(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }
}

#[async_trait]
impl VerificationRegistry for StaticRegistry {
    async fn lookup(
        &self,
        _chain_id: u64,
        _address: Address,
    ) -> Result<VerificationStatus, PortError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.answer.clone()
    }
}

pub type TestOrchestrator = DecodeOrchestrator<StaticCode, StaticFetcher, StaticRegistry>;

pub fn new_orchestrator(fetcher: StaticFetcher, registry: StaticRegistry) -> TestOrchestrator {
    DecodeOrchestrator::new(StaticCode(Ok(deployed_code())), fetcher, registry)
}

/// CBOR trailer as solc 0.8.17 emits it: `{ "ipfs": <multihash>, "solc": 0.8.17 }`.
pub fn solc_trailer() -> Vec<u8> {
    let mut out = vec![0xa2, 0x64, b'i', b'p', b'f', b's', 0x58, 0x22, 0x12, 0x20];
    out.extend_from_slice(&DIGEST);
    out.extend_from_slice(&[0x64, b's', b'o', b'l', b'c', 0x43, 0x00, 0x08, 0x11]);
    out
}

/// Runtime code followed by the trailer and its length.
pub fn deployed_code() -> Bytes {
    let trailer = solc_trailer();
    let mut code = vec![0x5b; 64];
    code.extend_from_slice(&trailer);
    code.extend_from_slice(&(trailer.len() as u16).to_be_bytes());
    Bytes::from(code)
}

pub fn expected_cid() -> String {
    let mut multihash = vec![0x12, 0x20];
    multihash.extend_from_slice(&DIGEST);
    ContentId::from_digest(multihash).to_base58()
}

/// solc metadata for a contract with one documented function, `multiplyBy(uint256 _n2)`.
pub fn multiply_metadata(notice: &str) -> Value {
    json!({
        "compiler": { "version": "0.8.17+commit.8df45f5f" },
        "language": "Solidity",
        "settings": { "compilationTarget": { "contracts/Multiplier.sol": "Multiplier" } },
        "output": {
            "abi": [{
                "type": "function",
                "name": "multiplyBy",
                "inputs": [{ "internalType": "uint256", "name": "_n2", "type": "uint256" }],
                "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
                "stateMutability": "nonpayable"
            }],
            "userdoc": {
                "kind": "user",
                "methods": { "multiplyBy(uint256)": { "notice": notice } },
                "version": 1
            }
        },
        "version": 1
    })
}

pub fn multiply_by_call(arg: u64) -> PendingTransaction {
    let mut data = selector_of("multiplyBy(uint256)").to_vec();
    data.extend_from_slice(&U256::from(arg).to_be_bytes::<32>());
    PendingTransaction {
        to: contract(),
        data: Bytes::from(data),
        value: U256::ZERO,
    }
}

#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use alloy::primitives::{address, hex, Address, Bytes, U256};
use serde_json::{json, Value};
use tiny_http::{Method, Response, Server, StatusCode};

use rusty_natspec_adapters::NatspecAdapterConfig;
use rusty_natspec_core::{selector_of, ContentId, PendingTransaction};

pub const DIGEST: [u8; 32] = [0x5f; 32];

/// What the mock answers: status, body, and an optional delay before responding.
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay_ms: u64,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay_ms: 0,
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn after(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Serves `route` on an ephemeral port, recording every path requested.
///
/// The route sees the method, the lowercased path and the request body.
pub fn spawn_mock_server<F>(
    calls: Arc<Mutex<Vec<String>>>,
    route: F,
) -> (String, thread::JoinHandle<()>)
where
    F: Fn(&Method, &str, &str) -> Reply + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        for _ in 0..32 {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let method = req.method().clone();
            let path = req.url().to_owned();
            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            if let Ok(mut g) = calls.lock() {
                g.push(path.clone());
            }

            let reply = route(&method, &path.to_ascii_lowercase(), &body);
            if reply.delay_ms > 0 {
                thread::sleep(std::time::Duration::from_millis(reply.delay_ms));
            }
            let response =
                Response::from_string(reply.body).with_status_code(StatusCode(reply.status));
            let _ = req.respond(response);
        }
    });

    (addr, join)
}

/// Config pointing every adapter at the same mock.
pub fn config_for(base_url: &str) -> NatspecAdapterConfig {
    NatspecAdapterConfig {
        ipfs_gateway_url: base_url.to_owned(),
        sourcify_repo_url: base_url.to_owned(),
        rpc_url: base_url.to_owned(),
        http_timeout_ms: 5_000,
        ..NatspecAdapterConfig::default()
    }
}

pub fn contract() -> Address {
    address!("000000000000000000000000000000000000cafe")
}

pub fn cid() -> ContentId {
    let mut multihash = vec![0x12, 0x20];
    multihash.extend_from_slice(&DIGEST);
    ContentId::from_digest(multihash)
}

/// Runtime code ending in a solc 0.8.17 CBOR trailer that points at `cid()`.
pub fn deployed_code() -> Bytes {
    let mut trailer = vec![0xa2, 0x64, b'i', b'p', b'f', b's', 0x58, 0x22, 0x12, 0x20];
    trailer.extend_from_slice(&DIGEST);
    trailer.extend_from_slice(&[0x64, b's', b'o', b'l', b'c', 0x43, 0x00, 0x08, 0x11]);

    let mut code = vec![0x5b; 64];
    code.extend_from_slice(&trailer);
    code.extend_from_slice(&(trailer.len() as u16).to_be_bytes());
    Bytes::from(code)
}

pub fn deployed_code_hex() -> String {
    hex::encode_prefixed(deployed_code())
}

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

/// JSON-RPC reply for `body`, answering `eth_chainId` with `chain_id`.
pub fn rpc_reply(body: &str, chain_id: u64, code: &str) -> Reply {
    let request: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let result = match request.get("method").and_then(Value::as_str) {
        Some("eth_chainId") => json!(format!("{chain_id:#x}")),
        Some("eth_getCode") => json!(code),
        _ => {
            return Reply::json(
                200,
                &json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "method not found"}}),
            )
        }
    };
    Reply::json(200, &json!({"jsonrpc": "2.0", "id": 1, "result": result}))
}

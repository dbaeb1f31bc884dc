//! HTTP-backed implementations of the decode pipeline's ports.

pub mod config;
mod http;
pub mod ipfs;
pub mod rpc;
pub mod sourcify;

pub use config::NatspecAdapterConfig;
pub use ipfs::IpfsGatewayFetcher;
pub use rpc::JsonRpcCodeProvider;
pub use sourcify::SourcifyRegistry;

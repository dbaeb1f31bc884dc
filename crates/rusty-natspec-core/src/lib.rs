//! Decode-and-describe pipeline for pending EVM transactions
//!
//! bytecode trailer → CBOR payload → IPFS metadata document → selector → NatSpec
//! notice, with a Sourcify verification lookup alongside.

pub mod bytecode;
pub mod calldata;
pub mod document;
pub mod domain;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod payload;
pub mod ports;
pub mod selector;
pub mod template;

pub use bytecode::{extract_metadata, EmbeddedMetadataBlock};
pub use document::{AbiFunction, AbiParam, ContractMetadataDocument};
pub use domain::{
    ContentId, DecodeResult, DecodedCallDescription, PendingTransaction, VerificationStatus,
};
pub use error::DecodeError;
pub use host::{handle_request, ConfirmPrompt, HostError, HostErrorPayload, HostRequest};
pub use orchestrator::DecodeOrchestrator;
pub use payload::{decode_payload, CompilerMetadata};
pub use ports::{CodeProvider, MetadataFetcher, PortError, VerificationRegistry};
pub use selector::{call_selector, resolve, selector_of};
pub use template::render;

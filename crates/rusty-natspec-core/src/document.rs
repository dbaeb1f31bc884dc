//! Contract metadata document
//!
//! The document behind the bytecode's content identifier is the solc metadata JSON.
//! Only the parts the pipeline needs are kept, and they are validated here so later
//! stages never see an unparseable signature:
//!
//! ```json
//! {
//!   "compiler": { "version": "0.8.17+commit.8df45f5f" },
//!   "settings": { "compilationTarget": { "contracts/Math.sol": "Math" } },
//!   "output": {
//!     "abi": [ { "type": "function", "name": "multiplyBy", "inputs": [ ... ] } ],
//!     "userdoc": { "methods": { "multiplyBy(uint256)": { "notice": "Multiply by `_n2`" } } }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use alloy::dyn_abi::DynSolType;
use alloy::json_abi::Function;
use alloy::primitives::Selector;
use serde::Deserialize;

use crate::error::DecodeError;
use crate::selector::selector_of;

/// One named, canonically typed function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiParam {
    pub name: String,
    /// Canonical type, tuples already expanded (e.g. `(address,uint256)[]`).
    pub ty: String,
}

/// A function entry from the ABI, with its selector derived up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiFunction {
    pub name: String,
    pub inputs: Vec<AbiParam>,
    signature: String,
    selector: Selector,
}

impl AbiFunction {
    pub fn new(name: impl Into<String>, inputs: Vec<AbiParam>) -> Result<Self, DecodeError> {
        let name = name.into();
        for param in &inputs {
            DynSolType::parse(&param.ty).map_err(|e| {
                DecodeError::InvalidDocument(format!(
                    "parameter '{}' of {name} has unsupported type '{}': {e}",
                    param.name, param.ty
                ))
            })?;
        }
        let types: Vec<&str> = inputs.iter().map(|p| p.ty.as_str()).collect();
        let signature = format!("{}({})", name, types.join(","));

        Function::parse(&signature).map_err(|e| {
            DecodeError::InvalidDocument(format!("unparseable function '{signature}': {e}"))
        })?;

        let selector = selector_of(&signature);
        Ok(Self {
            name,
            inputs,
            signature,
            selector,
        })
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Position of the parameter called `name`.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractMetadataDocument {
    /// Functions in declaration order.
    pub abi: Vec<AbiFunction>,
    /// `@notice` templates keyed by function selector.
    pub user_doc: HashMap<Selector, String>,
    pub compiler_version: Option<String>,
    pub contract_name: Option<String>,
}

impl ContractMetadataDocument {
    pub fn from_json_slice(body: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawMetadata = serde_json::from_slice(body)
            .map_err(|e| DecodeError::InvalidDocument(e.to_string()))?;

        let mut abi = Vec::new();
        for entry in raw.output.abi {
            if entry.kind != "function" {
                continue;
            }
            let inputs = entry
                .inputs
                .iter()
                .map(|p| AbiParam {
                    name: p.name.clone(),
                    ty: p.canonical_type(),
                })
                .collect();
            abi.push(AbiFunction::new(entry.name, inputs)?);
        }

        let user_doc = raw
            .output
            .userdoc
            .methods
            .into_iter()
            .filter(|(signature, _)| signature.contains('('))
            .filter_map(|(signature, doc)| {
                let notice = match doc {
                    RawMethodDoc::Text(notice) => Some(notice),
                    RawMethodDoc::Entry { notice } => notice,
                }?;
                Some((selector_of(&signature), notice))
            })
            .collect();

        Ok(Self {
            abi,
            user_doc,
            compiler_version: raw.compiler.and_then(|c| c.version),
            contract_name: raw
                .settings
                .and_then(|s| s.compilation_target.into_values().next()),
        })
    }

    pub fn notice_for(&self, selector: Selector) -> Option<&str> {
        self.user_doc.get(&selector).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    compiler: Option<RawCompiler>,
    #[serde(default)]
    settings: Option<RawSettings>,
    output: RawOutput,
}

#[derive(Debug, Deserialize)]
struct RawCompiler {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    #[serde(default)]
    compilation_target: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    abi: Vec<RawAbiEntry>,
    #[serde(default)]
    userdoc: RawUserDoc,
}

#[derive(Debug, Default, Deserialize)]
struct RawUserDoc {
    #[serde(default)]
    methods: BTreeMap<String, RawMethodDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMethodDoc {
    Text(String),
    Entry {
        #[serde(default)]
        notice: Option<String>,
    },
}

fn default_entry_kind() -> String {
    "function".to_owned()
}

#[derive(Debug, Deserialize)]
struct RawAbiEntry {
    #[serde(rename = "type", default = "default_entry_kind")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<RawAbiParam>,
}

#[derive(Debug, Deserialize)]
struct RawAbiParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<RawAbiParam>,
}

impl RawAbiParam {
    /// `tuple`, `tuple[]`, `tuple[2][]` become `(..)`, `(..)[]`, `(..)[2][]`.
    fn canonical_type(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> =
                    self.components.iter().map(Self::canonical_type).collect();
                format!("({}){}", inner.join(","), suffix)
            }
            None => self.ty.clone(),
        }
    }
}

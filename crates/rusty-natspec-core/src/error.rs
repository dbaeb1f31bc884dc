use thiserror::Error;

/// Terminal failure of one stage of the decode chain.
///
/// Each variant maps to a stable [`DecodeError::code`] the host can branch on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("could not read contract code: {0}")]
    CodeUnavailable(String),
    #[error("no metadata in contract bytecode: {0}")]
    NoMetadata(String),
    #[error("metadata length {declared} does not fit in {bytecode_len} bytes of bytecode")]
    MalformedLength { declared: usize, bytecode_len: usize },
    #[error("metadata payload is not valid CBOR: {0}")]
    PayloadDecode(String),
    #[error("metadata payload has no content identifier: {0}")]
    MissingContentField(String),
    #[error("metadata document unavailable: {0}")]
    FetchUnavailable(String),
    #[error("invalid metadata document: {0}")]
    InvalidDocument(String),
    #[error("no ABI function matches selector {selector}")]
    SelectorNotFound { selector: String },
    #[error("could not decode arguments of {function}: {reason}")]
    ArgumentDecode { function: String, reason: String },
    #[error("template evaluation failed: {0}")]
    TemplateEvaluation(String),
}

impl DecodeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CodeUnavailable(_) => "CODE_UNAVAILABLE",
            Self::NoMetadata(_) => "NO_METADATA",
            Self::MalformedLength { .. } => "MALFORMED_LENGTH",
            Self::PayloadDecode(_) => "PAYLOAD_DECODE_ERROR",
            Self::MissingContentField(_) => "MISSING_CONTENT_FIELD",
            Self::FetchUnavailable(_) => "FETCH_UNAVAILABLE",
            Self::InvalidDocument(_) => "INVALID_DOCUMENT",
            Self::SelectorNotFound { .. } => "SELECTOR_NOT_FOUND",
            Self::ArgumentDecode { .. } => "ARGUMENT_DECODE_ERROR",
            Self::TemplateEvaluation(_) => "TEMPLATE_EVALUATION_ERROR",
        }
    }
}

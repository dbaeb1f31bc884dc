//! Locating the compiler metadata trailer in deployed bytecode
//!
//! solc appends a CBOR-encoded metadata map to the runtime code, followed by the
//! map's length as a big-endian `u16`:
//!
//! ```text
//! <runtime code> <CBOR payload: L bytes> <L: 2 bytes>
//! ```

use crate::error::DecodeError;

/// Size of the big-endian length suffix
const LENGTH_SUFFIX_BYTES: usize = 2;

/// The CBOR payload sliced out of a contract's bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedMetadataBlock<'a> {
    pub encoded_payload: &'a [u8],
    pub declared_length: usize,
}

/// Slice the metadata payload off the end of `bytecode`.
///
/// The accepted bound is `declared * 2 + 2 <= bytecode.len()`, which is stricter than
/// the payload strictly needs. Anything that does not end in a plausible trailer is a
/// decode failure.
pub fn extract_metadata(bytecode: &[u8]) -> Result<EmbeddedMetadataBlock<'_>, DecodeError> {
    if bytecode.is_empty() {
        return Err(DecodeError::NoMetadata(
            "address has no deployed code".to_owned(),
        ));
    }
    if bytecode.len() < LENGTH_SUFFIX_BYTES {
        return Err(DecodeError::NoMetadata(format!(
            "bytecode is {} byte(s), too short for a length suffix",
            bytecode.len()
        )));
    }

    let suffix_start = bytecode.len() - LENGTH_SUFFIX_BYTES;
    let declared =
        u16::from_be_bytes([bytecode[suffix_start], bytecode[suffix_start + 1]]) as usize;

    if declared == 0 {
        return Err(DecodeError::NoMetadata(
            "declared metadata length is zero".to_owned(),
        ));
    }
    if declared * 2 + LENGTH_SUFFIX_BYTES > bytecode.len() {
        return Err(DecodeError::MalformedLength {
            declared,
            bytecode_len: bytecode.len(),
        });
    }

    Ok(EmbeddedMetadataBlock {
        encoded_payload: &bytecode[suffix_start - declared..suffix_start],
        declared_length: declared,
    })
}

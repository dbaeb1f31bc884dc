//! Call-data argument decoding and value formatting
//!
//! Uses `alloy_json_abi::Function::parse()` on the resolved canonical signature,
//! following the same pattern as Foundry's `abi_decode_calldata`.

use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::primitives::{hex, I256, U256};

use crate::document::AbiFunction;
use crate::error::DecodeError;

/// How integers are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    #[default]
    Decimal,
    Hex,
}

/// Decode the argument section of `call_data` (everything after the selector).
///
/// Fixed-width values are range checked against their raw words: a `uint8` word
/// holding 256, an `address` with dirty upper bytes, a `bool` word of 2 or a `bytes4`
/// with non-zero padding are all rejected rather than silently truncated.
pub fn decode_arguments(
    function: &AbiFunction,
    call_data: &[u8],
) -> Result<Vec<DynSolValue>, DecodeError> {
    let fail = |reason: String| DecodeError::ArgumentDecode {
        function: function.signature().to_owned(),
        reason,
    };

    let func = Function::parse(function.signature())
        .map_err(|e| fail(format!("invalid signature: {e}")))?;

    if call_data.len() < 4 {
        return Err(fail("call-data shorter than a selector".to_owned()));
    }
    let args = &call_data[4..];

    // Empty params case
    if args.is_empty() && func.inputs.is_empty() {
        return Ok(vec![]);
    }

    let decoded = func
        .abi_decode_input(args, true)
        .map_err(|e| fail(e.to_string()))?;

    if decoded.len() != function.inputs.len() {
        return Err(fail(format!(
            "decoded {} value(s), expected {}",
            decoded.len(),
            function.inputs.len()
        )));
    }
    for (value, param) in decoded.iter().zip(&function.inputs) {
        check_width(value).map_err(|reason| fail(format!("'{}': {reason}", param.name)))?;
    }

    let mut head = 0;
    for param in &function.inputs {
        let ty = DynSolType::parse(&param.ty).map_err(|e| fail(e.to_string()))?;
        check_padding(&ty, args, head)
            .map_err(|reason| fail(format!("'{}': {reason}", param.name)))?;
        head += head_words(&ty) * 32;
    }

    tracing::debug!(
        function = function.signature(),
        args = decoded.len(),
        "decoded call arguments"
    );
    Ok(decoded)
}

fn check_width(value: &DynSolValue) -> Result<(), String> {
    match value {
        DynSolValue::Uint(v, bits) if *bits < 256 && v.bit_len() > *bits => {
            Err(format!("{v} does not fit in uint{bits}"))
        }
        DynSolValue::Int(v, bits) if *bits < 256 && !fits_signed(v, *bits) => {
            Err(format!("{v} does not fit in int{bits}"))
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().try_for_each(check_width)
        }
        _ => Ok(()),
    }
}

fn fits_signed(v: &I256, bits: usize) -> bool {
    let raw: U256 = v.into_raw();
    let magnitude = if v.is_negative() { !raw } else { raw };
    magnitude.bit_len() < bits
}

/// Words a value occupies inline; `None` for dynamic types.
fn static_words(ty: &DynSolType) -> Option<usize> {
    match ty {
        DynSolType::Bytes | DynSolType::String | DynSolType::Array(_) => None,
        DynSolType::FixedArray(inner, len) => static_words(inner).map(|w| w * len),
        DynSolType::Tuple(types) => types.iter().map(static_words).sum(),
        _ => Some(1),
    }
}

/// Head size in words; a dynamic value's head is its offset.
fn head_words(ty: &DynSolType) -> usize {
    static_words(ty).unwrap_or(1)
}

fn word_at(region: &[u8], pos: usize) -> Result<&[u8], String> {
    pos.checked_add(32)
        .and_then(|end| region.get(pos..end))
        .ok_or_else(|| format!("word at {pos} is out of bounds"))
}

fn offset_at(region: &[u8], pos: usize) -> Result<usize, String> {
    let word = word_at(region, pos)?;
    usize::try_from(U256::from_be_slice(word)).map_err(|_| format!("offset at {pos} is too large"))
}

fn tail_from(region: &[u8], pos: usize) -> Result<&[u8], String> {
    region
        .get(pos..)
        .ok_or_else(|| format!("offset {pos} is out of bounds"))
}

fn zero_padded(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| *b == 0)
}

/// Reject raw words the decoder would otherwise normalise: high bytes of an address,
/// bool words other than 0 or 1, and the padding of `bytesN` and `function` values.
///
/// `region` is the encoding the value's head lives in, `head` the head's byte position.
fn check_padding(ty: &DynSolType, region: &[u8], head: usize) -> Result<(), String> {
    if static_words(ty).is_none() {
        let tail = tail_from(region, offset_at(region, head)?)?;
        return match ty {
            DynSolType::Array(inner) => {
                let len = offset_at(tail, 0)?;
                check_sequence(std::iter::repeat(&**inner).take(len), tail_from(tail, 32)?)
            }
            DynSolType::FixedArray(inner, len) => {
                check_sequence(std::iter::repeat(&**inner).take(*len), tail)
            }
            DynSolType::Tuple(types) => check_sequence(types.iter(), tail),
            _ => Ok(()),
        };
    }

    match ty {
        DynSolType::Address => {
            let word = word_at(region, head)?;
            if !zero_padded(&word[..12]) {
                return Err(format!("0x{} is not a clean address word", hex::encode(word)));
            }
            Ok(())
        }
        DynSolType::Bool => {
            let word = word_at(region, head)?;
            if !zero_padded(&word[..31]) || word[31] > 1 {
                return Err(format!("0x{} is not a bool", hex::encode(word)));
            }
            Ok(())
        }
        DynSolType::FixedBytes(size) => {
            let word = word_at(region, head)?;
            if !zero_padded(&word[*size..]) {
                return Err(format!("bytes{size} has non-zero padding"));
            }
            Ok(())
        }
        DynSolType::Function => {
            let word = word_at(region, head)?;
            if !zero_padded(&word[24..]) {
                return Err("function has non-zero padding".to_owned());
            }
            Ok(())
        }
        DynSolType::FixedArray(inner, len) => check_sequence(
            std::iter::repeat(&**inner).take(*len),
            tail_from(region, head)?,
        ),
        DynSolType::Tuple(types) => check_sequence(types.iter(), tail_from(region, head)?),
        _ => Ok(()),
    }
}

fn check_sequence<'a>(
    types: impl IntoIterator<Item = &'a DynSolType>,
    region: &[u8],
) -> Result<(), String> {
    let mut head = 0;
    for ty in types {
        check_padding(ty, region, head)?;
        head += head_words(ty) * 32;
    }
    Ok(())
}

/// Format a decoded value for display
pub fn format_value(val: &DynSolValue, numbers: NumberFormat) -> String {
    match val {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => match numbers {
            NumberFormat::Decimal => i.to_string(),
            // two's-complement word
            NumberFormat::Hex => format!("0x{:x}", i.into_raw()),
        },
        DynSolValue::Uint(u, _) => match numbers {
            NumberFormat::Decimal => u.to_string(),
            NumberFormat::Hex => format!("0x{u:x}"),
        },
        // FixedBytes: word is 32 bytes, size is actual length (e.g., 4 for bytes4)
        // bytesN is right-padded, so take first `size` bytes
        DynSolValue::FixedBytes(word, size) => {
            let bytes = word.as_slice();
            format!("0x{}", hex::encode(&bytes[..*size]))
        }
        DynSolValue::Address(a) => format!("{}", a),
        DynSolValue::Function(f) => format!("0x{}", hex::encode(f)),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(v, numbers)).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(items) => {
            let items: Vec<String> = items.iter().map(|v| format_value(v, numbers)).collect();
            format!("({})", items.join(", "))
        }
        DynSolValue::CustomStruct { name, tuple, .. } => {
            let items: Vec<String> = tuple.iter().map(|v| format_value(v, numbers)).collect();
            format!("{}({})", name, items.join(", "))
        }
    }
}

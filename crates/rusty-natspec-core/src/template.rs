//! NatSpec `@notice` template rendering
//!
//! Templates are plain text with backtick placeholders:
//!
//! ```text
//! template    := ( text | placeholder )*
//! placeholder := '`' reference ( ':' directive )? '`'
//! reference   := <parameter name> | 'self' | 'msg.value'
//! directive   := 'dec' | 'hex'
//! ```
//!
//! `self` is the called contract, `msg.value` the wei sent with the call. Whitespace
//! inside the backticks is ignored. There are no expressions.

use crate::calldata::{decode_arguments, format_value, NumberFormat};
use crate::document::AbiFunction;
use crate::domain::PendingTransaction;
use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    /// Index into the function's inputs
    Param(usize),
    Contract,
    MsgValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Placeholder(Reference, NumberFormat),
}

fn parse<'a>(template: &'a str, function: &AbiFunction) -> Result<Vec<Segment<'a>>, DecodeError> {
    let parts: Vec<&str> = template.split('`').collect();
    if parts.len() % 2 == 0 {
        return Err(DecodeError::TemplateEvaluation(
            "unterminated backtick placeholder".to_owned(),
        ));
    }

    let mut segments = Vec::with_capacity(parts.len());
    for (i, part) in parts.into_iter().enumerate() {
        if i % 2 == 0 {
            if !part.is_empty() {
                segments.push(Segment::Text(part));
            }
            continue;
        }

        let (reference, directive) = match part.split_once(':') {
            Some((r, d)) => (r.trim(), Some(d.trim())),
            None => (part.trim(), None),
        };
        let format = match directive {
            None | Some("dec") => NumberFormat::Decimal,
            Some("hex") => NumberFormat::Hex,
            Some(other) => {
                return Err(DecodeError::TemplateEvaluation(format!(
                    "unknown directive '{other}' on `{reference}`"
                )))
            }
        };
        let reference = match reference {
            "" => {
                return Err(DecodeError::TemplateEvaluation(
                    "empty placeholder".to_owned(),
                ))
            }
            "self" => Reference::Contract,
            "msg.value" => Reference::MsgValue,
            name => Reference::Param(function.param_index(name).ok_or_else(|| {
                DecodeError::TemplateEvaluation(format!(
                    "`{name}` is not a parameter of {}",
                    function.signature()
                ))
            })?),
        };
        segments.push(Segment::Placeholder(reference, format));
    }
    Ok(segments)
}

/// Render `template` for a call to `function` made by `tx`.
///
/// The template is checked before the arguments are decoded. Arguments are
/// always decoded, even when the template references none of them.
pub fn render(
    template: &str,
    function: &AbiFunction,
    tx: &PendingTransaction,
) -> Result<String, DecodeError> {
    let segments = parse(template, function)?;
    let args = decode_arguments(function, &tx.data)?;

    let mut out = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder(Reference::Param(idx), format) => {
                out.push_str(&format_value(&args[idx], format))
            }
            Segment::Placeholder(Reference::Contract, _) => out.push_str(&tx.to.to_string()),
            Segment::Placeholder(Reference::MsgValue, NumberFormat::Decimal) => {
                out.push_str(&tx.value.to_string())
            }
            Segment::Placeholder(Reference::MsgValue, NumberFormat::Hex) => {
                out.push_str(&format!("0x{:x}", tx.value))
            }
        }
    }
    Ok(out)
}

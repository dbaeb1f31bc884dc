use std::time::Duration;

use alloy::primitives::Bytes;
use rusty_natspec_core::PortError;

use crate::NatspecAdapterConfig;

pub(crate) fn build_client(config: &NatspecAdapterConfig) -> Result<reqwest::Client, PortError> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(config.http_timeout_ms))
        .build()
        .map_err(|e| PortError::Transport(format!("failed to build http client: {e}")))
}

/// Classify a reqwest failure: timeouts apart from everything else.
pub(crate) fn transport_error(context: &str, err: reqwest::Error) -> PortError {
    if err.is_timeout() {
        PortError::Timeout(format!("{context}: {err}"))
    } else {
        PortError::Transport(format!("{context}: {err}"))
    }
}

/// Read the whole body, refusing anything over `max_bytes`.
pub(crate) async fn read_limited(
    mut response: reqwest::Response,
    max_bytes: usize,
    context: &str,
) -> Result<Bytes, PortError> {
    let too_large =
        || PortError::Validation(format!("{context}: body exceeds {max_bytes} bytes"));

    if response
        .content_length()
        .is_some_and(|len| len > max_bytes as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| transport_error(context, e))?
    {
        if body.len() + chunk.len() > max_bytes {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(body))
}

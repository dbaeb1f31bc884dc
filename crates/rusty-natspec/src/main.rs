//! rusty-natspec: explain a pending transaction from its contract's NatSpec
//!
//! Reads one host request as JSON on stdin and writes the confirmation prompt (or a
//! `{ code, message }` error) as JSON on stdout. Logs go to stderr.

use std::process::ExitCode;

use eyre::WrapErr;

use rusty_natspec_adapters::{
    IpfsGatewayFetcher, JsonRpcCodeProvider, NatspecAdapterConfig, SourcifyRegistry,
};
use rusty_natspec_core::{handle_request, DecodeOrchestrator, HostError, HostRequest};

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let raw = std::io::read_to_string(std::io::stdin()).wrap_err("failed to read stdin")?;

    let config = NatspecAdapterConfig::from_env();
    tracing::info!(
        rpc = %config.rpc_url,
        gateway = %config.ipfs_gateway_url,
        sourcify = %config.sourcify_repo_url,
        "starting rusty-natspec"
    );

    let orchestrator = DecodeOrchestrator::new(
        JsonRpcCodeProvider::with_config(&config).wrap_err("rpc client")?,
        IpfsGatewayFetcher::with_config(&config).wrap_err("ipfs client")?,
        SourcifyRegistry::with_config(&config).wrap_err("sourcify client")?,
    );

    let outcome = match serde_json::from_str::<HostRequest>(&raw) {
        Ok(request) => handle_request(&orchestrator, request).await,
        Err(e) => Err(HostError::InvalidParams(format!("malformed request: {e}"))),
    };

    match outcome {
        Ok(prompt) => {
            println!("{}", serde_json::to_string_pretty(&prompt)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "request failed");
            println!("{}", serde_json::to_string_pretty(&e.to_payload())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

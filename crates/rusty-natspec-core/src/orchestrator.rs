use alloy::primitives::Address;
use tracing::{debug, info, warn};

use crate::bytecode::extract_metadata;
use crate::document::ContractMetadataDocument;
use crate::domain::{DecodeResult, DecodedCallDescription, PendingTransaction, VerificationStatus};
use crate::error::DecodeError;
use crate::payload::decode_payload;
use crate::ports::{CodeProvider, MetadataFetcher, PortError, VerificationRegistry};
use crate::selector::{call_selector, resolve};
use crate::template::render;

/// Runs the decode chain and the verification lookup for one transaction.
///
/// Holds no per-request state, so one instance can serve concurrent requests.
pub struct DecodeOrchestrator<C, F, V>
where
    C: CodeProvider,
    F: MetadataFetcher,
    V: VerificationRegistry,
{
    pub code: C,
    pub fetcher: F,
    pub registry: V,
}

impl<C, F, V> DecodeOrchestrator<C, F, V>
where
    C: CodeProvider,
    F: MetadataFetcher,
    V: VerificationRegistry,
{
    pub fn new(code: C, fetcher: F, registry: V) -> Self {
        Self {
            code,
            fetcher,
            registry,
        }
    }

    /// Describe `tx` and look up its contract's verification status.
    ///
    /// The two run concurrently. Only the description can fail the request, and a
    /// failed description drops the pending lookup instead of waiting for it.
    /// Dropping the returned future cancels both.
    pub async fn decode(
        &self,
        chain_id: u64,
        tx: &PendingTransaction,
    ) -> Result<DecodeResult, DecodeError> {
        let ((call, compiler_version), verification) = tokio::try_join!(
            self.describe(chain_id, tx),
            async { Ok::<_, DecodeError>(self.verify(chain_id, tx.to).await) },
        )
        .map_err(|e| {
            warn!(code = e.code(), error = %e, to = %tx.to, "decode failed");
            e
        })?;

        Ok(DecodeResult {
            description: call.text.clone(),
            verification,
            call,
            compiler_version,
        })
    }

    async fn describe(
        &self,
        chain_id: u64,
        tx: &PendingTransaction,
    ) -> Result<(DecodedCallDescription, Option<String>), DecodeError> {
        let bytecode = self
            .code
            .code_at(chain_id, tx.to)
            .await
            .map_err(|e| DecodeError::CodeUnavailable(e.to_string()))?;
        debug!(len = bytecode.len(), to = %tx.to, "fetched contract code");

        let block = extract_metadata(&bytecode)?;
        let trailer = decode_payload(block.encoded_payload)?;
        let cid = trailer.content_id()?;
        info!(cid = %cid, solc = ?trailer.solc, "found metadata content id");

        let body = self.fetcher.fetch(&cid).await.map_err(|e| match e {
            PortError::Validation(reason) => DecodeError::InvalidDocument(reason),
            other => DecodeError::FetchUnavailable(other.to_string()),
        })?;
        let document = ContractMetadataDocument::from_json_slice(&body)?;
        debug!(
            functions = document.abi.len(),
            notices = document.user_doc.len(),
            contract = ?document.contract_name,
            "parsed metadata document"
        );

        let selector = call_selector(&tx.data)?;
        let function = resolve(selector, &document.abi)?;
        let template = document.notice_for(selector).ok_or_else(|| {
            DecodeError::TemplateEvaluation(format!(
                "{} has no @notice documentation",
                function.signature()
            ))
        })?;
        let text = render(template, function, tx)?;

        let compiler_version = document.compiler_version.clone().or(trailer.solc);
        Ok((
            DecodedCallDescription {
                selector,
                function: function.clone(),
                text,
            },
            compiler_version,
        ))
    }

    async fn verify(&self, chain_id: u64, address: Address) -> VerificationStatus {
        match self.registry.lookup(chain_id, address).await {
            Ok(status) => {
                debug!(?status, %address, chain_id, "verification lookup finished");
                status
            }
            Err(e) => {
                warn!(error = %e, %address, chain_id, "verification lookup failed");
                VerificationStatus::Unknown(e.to_string())
            }
        }
    }
}

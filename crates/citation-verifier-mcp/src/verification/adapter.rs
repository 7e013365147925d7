//! Owns the verification capability and its initialization state.

use std::sync::Arc;

use citation_verifier::{
    format_verification, CitationVerifier, CrossrefClient, CrossrefConfig, VerificationResult,
};

/// Failure to reach the verification capability at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Citation verifier not initialized")]
    Unavailable,
}

/// Wraps a [`CitationVerifier`] for use by the protocol handler.
///
/// Constructed once at startup and shared read-only across transports.
/// An adapter built with [`VerificationAdapter::uninitialized`] (or whose
/// Crossref client failed to build) answers every `verify` with
/// [`AdapterError::Unavailable`].
#[derive(Clone)]
pub struct VerificationAdapter {
    verifier: Option<Arc<dyn CitationVerifier>>,
}

impl VerificationAdapter {
    pub fn new(verifier: Arc<dyn CitationVerifier>) -> Self {
        Self {
            verifier: Some(verifier),
        }
    }

    pub fn uninitialized() -> Self {
        Self { verifier: None }
    }

    /// Build a Crossref-backed adapter. A client that cannot be built
    /// leaves the adapter uninitialized rather than aborting startup.
    pub fn connect(config: CrossrefConfig) -> Self {
        match CrossrefClient::new(config) {
            Ok(client) => {
                tracing::info!("Citation verifier initialized ({})", client.base_url());
                Self::new(Arc::new(client))
            }
            Err(e) => {
                tracing::error!("Failed to initialize citation verifier: {e}");
                Self::uninitialized()
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.verifier.is_some()
    }

    pub async fn verify(&self, doi: &str) -> Result<VerificationResult, AdapterError> {
        let verifier = self.verifier.as_ref().ok_or(AdapterError::Unavailable)?;
        tracing::info!("Verifying citation for DOI: {doi}");
        let result = verifier.verify_doi(doi).await;
        tracing::debug!(verified = result.is_verified(), doi = result.doi(), "Verification finished");
        Ok(result)
    }

    pub fn format(result: &VerificationResult) -> String {
        format_verification(result)
    }
}

impl std::fmt::Debug for VerificationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationAdapter")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

//! The verification capability consumed by the MCP server.

use async_trait::async_trait;

use crate::types::VerificationResult;

/// Anything that can check a DOI against a bibliographic registry.
///
/// Implementations must not fail for any input string: malformed, unknown
/// and unreachable lookups are all reported as
/// [`VerificationResult::NotVerified`]. They must also be safe to call
/// concurrently from many tasks.
#[async_trait]
pub trait CitationVerifier: Send + Sync {
    async fn verify_doi(&self, doi: &str) -> VerificationResult;
}

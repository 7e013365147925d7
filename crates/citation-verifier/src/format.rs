//! Human-readable rendering of verification results.

use crate::types::VerificationResult;

/// Render a result as Markdown for display to an LLM client.
///
/// Pure: the output depends only on `result`.
pub fn format_verification(result: &VerificationResult) -> String {
    match result {
        VerificationResult::Verified(meta) => format!(
            "# ✅ Citation Verified\n\
             \n\
             **DOI:** {}\n\
             **Title:** {}\n\
             **Authors:** {}\n\
             **Journal:** {}\n\
             **Publisher:** {}\n\
             **Year:** {}\n\
             **URL:** {}\n\
             \n\
             This DOI exists in the Crossref database and appears to be a legitimate citation.",
            meta.doi, meta.title, meta.authors, meta.journal, meta.publisher, meta.year, meta.url
        ),
        VerificationResult::NotVerified { doi, error } => format!(
            "# ❌ Citation Not Verified\n\
             \n\
             **DOI:** {doi}\n\
             **Error:** {error}\n\
             \n\
             ⚠️ **Warning:** This DOI was not found in the Crossref database. This may indicate:\n\
             - The DOI is hallucinated/fake\n\
             - The DOI contains typos\n\
             - The paper is very recent and not yet indexed\n\
             - The publisher doesn't use Crossref\n\
             \n\
             **Recommendation:** Verify this citation manually or find an alternative source."
        ),
    }
}

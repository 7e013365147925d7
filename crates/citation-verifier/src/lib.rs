//! Citation verifier: checks DOIs against the Crossref registry to catch hallucinated citations.

pub mod crossref;
pub mod doi;
pub mod format;
pub mod types;
pub mod verifier;

pub use crossref::{CrossrefClient, CrossrefConfig, DEFAULT_CROSSREF_URL, DEFAULT_TIMEOUT_SECS};
pub use doi::{is_well_formed, normalize_doi};
pub use format::format_verification;
pub use types::*;
pub use verifier::CitationVerifier;

//! Core data types for citation verification results.

use serde::{Deserialize, Serialize};

/// Outcome of checking one DOI against the bibliographic registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// The DOI resolved to a registered work.
    Verified(CitationMetadata),
    /// The DOI was malformed, unknown, or the lookup failed.
    NotVerified { doi: String, error: String },
}

/// Bibliographic metadata for a verified DOI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationMetadata {
    pub doi: String,
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub publisher: String,
    pub year: String,
    pub url: String,
}

impl VerificationResult {
    pub fn not_verified(doi: impl Into<String>, error: impl Into<String>) -> Self {
        VerificationResult::NotVerified {
            doi: doi.into(),
            error: error.into(),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationResult::Verified(_))
    }

    /// The DOI the result refers to, after normalization.
    pub fn doi(&self) -> &str {
        match self {
            VerificationResult::Verified(meta) => &meta.doi,
            VerificationResult::NotVerified { doi, .. } => doi,
        }
    }

    /// Flatten into the `{verified, doi, ...}` wire record.
    pub fn to_record(&self) -> VerificationRecord {
        VerificationRecord::from(self)
    }
}

/// Flat record form: `verified` plus either the six metadata fields or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub verified: bool,
    pub doi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&VerificationResult> for VerificationRecord {
    fn from(result: &VerificationResult) -> Self {
        match result {
            VerificationResult::Verified(meta) => Self {
                verified: true,
                doi: meta.doi.clone(),
                title: Some(meta.title.clone()),
                authors: Some(meta.authors.clone()),
                journal: Some(meta.journal.clone()),
                publisher: Some(meta.publisher.clone()),
                year: Some(meta.year.clone()),
                url: Some(meta.url.clone()),
                error: None,
            },
            VerificationResult::NotVerified { doi, error } => Self {
                verified: false,
                doi: doi.clone(),
                title: None,
                authors: None,
                journal: None,
                publisher: None,
                year: None,
                url: None,
                error: Some(error.clone()),
            },
        }
    }
}

/// Errors that can occur while setting up the verifier.
#[derive(thiserror::Error, Debug)]
pub enum VerifierError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type VerifierResult<T> = Result<T, VerifierError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta() -> CitationMetadata {
        CitationMetadata {
            doi: "10.1038/nature12373".to_string(),
            title: "Nanometre-scale thermometry in a living cell".to_string(),
            authors: "G. Kucsko, P. C. Maurer, N. Y. Yao, et al.".to_string(),
            journal: "Nature".to_string(),
            publisher: "Springer Science and Business Media LLC".to_string(),
            year: "2013".to_string(),
            url: "https://doi.org/10.1038/nature12373".to_string(),
        }
    }

    #[test]
    fn test_verified_record_has_all_metadata_and_no_error() {
        let record = VerificationResult::Verified(sample_meta()).to_record();
        assert!(record.verified);
        assert!(record.title.is_some());
        assert!(record.authors.is_some());
        assert!(record.journal.is_some());
        assert!(record.publisher.is_some());
        assert!(record.year.is_some());
        assert!(record.url.is_some());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_not_verified_record_has_error_only() {
        let result = VerificationResult::not_verified("10.1234/x", "DOI not found in Crossref database");
        let json = serde_json::to_value(result.to_record()).unwrap();
        assert_eq!(json["verified"], false);
        assert_eq!(json["doi"], "10.1234/x");
        assert_eq!(json["error"], "DOI not found in Crossref database");
        assert!(json.get("title").is_none());
        assert!(json.get("url").is_none());
    }

    #[test]
    fn test_doi_accessor() {
        assert_eq!(VerificationResult::Verified(sample_meta()).doi(), "10.1038/nature12373");
        assert_eq!(VerificationResult::not_verified("abc", "bad").doi(), "abc");
    }
}

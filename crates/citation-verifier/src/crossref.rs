//! Crossref REST API client.
//!
//! Looks up `GET {base_url}/works/{doi}` and turns the `message` object
//! into [`CitationMetadata`]. Every failure mode (malformed DOI, 404,
//! non-success status, transport error, undecodable body) is reported as
//! [`VerificationResult::NotVerified`] rather than an error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::doi::{is_well_formed, normalize_doi};
use crate::types::{CitationMetadata, VerificationResult, VerifierError, VerifierResult};
use crate::verifier::CitationVerifier;

pub const DEFAULT_CROSSREF_URL: &str = "https://api.crossref.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Authors listed before the remainder is collapsed into "et al.".
const MAX_LISTED_AUTHORS: usize = 3;
const UNKNOWN: &str = "Unknown";

/// Settings for [`CrossrefClient`].
#[derive(Debug, Clone)]
pub struct CrossrefConfig {
    pub base_url: String,
    /// Contact address sent in the User-Agent (Crossref "polite pool").
    pub mailto: Option<String>,
    pub timeout: Duration,
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CROSSREF_URL.to_string(),
            mailto: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Verifies DOIs against the Crossref works endpoint.
#[derive(Debug, Clone)]
pub struct CrossrefClient {
    client: reqwest::Client,
    base: reqwest::Url,
    base_url: String,
}

impl CrossrefClient {
    pub fn new(config: CrossrefConfig) -> VerifierResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(VerifierError::InvalidConfig(format!(
                "Crossref base URL must be http(s): {base_url}"
            )));
        }
        let base = reqwest::Url::parse(&base_url)
            .map_err(|e| VerifierError::InvalidConfig(format!("{base_url}: {e}")))?;

        let user_agent = match &config.mailto {
            Some(mailto) => format!(
                "{}/{} (mailto:{mailto})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            None => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()?;

        tracing::debug!("Crossref client ready: {base_url}");
        Ok(Self {
            client,
            base,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/works/<doi>` with each DOI path piece percent-encoded, so
    /// `#`, `?` and `%` stay part of the DOI instead of becoming a fragment
    /// or query.
    fn works_url(&self, doi: &str) -> Option<reqwest::Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("works")
            .extend(doi.split('/'));
        Some(url)
    }

    /// Look up a DOI. Never fails; problems are reported in the result.
    pub async fn verify_doi(&self, raw: &str) -> VerificationResult {
        let doi = normalize_doi(raw);
        if !is_well_formed(&doi) {
            return VerificationResult::not_verified(&doi, format!("Invalid DOI format: {doi}"));
        }

        let Some(url) = self.works_url(&doi) else {
            return VerificationResult::not_verified(
                &doi,
                format!("Request failed: cannot build lookup URL from {}", self.base_url),
            );
        };
        tracing::debug!("Querying Crossref: {url}");

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Crossref request for {doi} failed: {e}");
                return VerificationResult::not_verified(&doi, format!("Request failed: {e}"));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return VerificationResult::not_verified(&doi, "DOI not found in Crossref database");
        }
        if !status.is_success() {
            return VerificationResult::not_verified(
                &doi,
                format!("Crossref API returned status {}", status.as_u16()),
            );
        }

        match response.json::<WorksResponse>().await {
            Ok(body) => VerificationResult::Verified(body.message.into_metadata(&doi)),
            Err(e) => VerificationResult::not_verified(
                &doi,
                format!("Failed to parse Crossref response: {e}"),
            ),
        }
    }
}

#[async_trait]
impl CitationVerifier for CrossrefClient {
    async fn verify_doi(&self, doi: &str) -> VerificationResult {
        CrossrefClient::verify_doi(self, doi).await
    }
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: WorkMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct WorkMessage {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<Author>,
    #[serde(default)]
    container_title: Vec<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    published_print: Option<DateParts>,
    #[serde(default)]
    published_online: Option<DateParts>,
    #[serde(default)]
    issued: Option<DateParts>,
    #[serde(default, rename = "URL")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DateParts {
    #[serde(default)]
    date_parts: Vec<Vec<Option<i64>>>,
}

impl DateParts {
    fn year(&self) -> Option<i64> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

impl Author {
    fn display_name(&self) -> Option<String> {
        match (&self.given, &self.family, &self.name) {
            (Some(given), Some(family), _) => Some(format!("{given} {family}")),
            (None, Some(family), _) => Some(family.clone()),
            (Some(given), None, _) => Some(given.clone()),
            (None, None, Some(name)) => Some(name.clone()),
            (None, None, None) => None,
        }
    }
}

impl WorkMessage {
    fn into_metadata(self, doi: &str) -> CitationMetadata {
        let names: Vec<String> = self.author.iter().filter_map(Author::display_name).collect();
        let authors = if names.is_empty() {
            UNKNOWN.to_string()
        } else if names.len() > MAX_LISTED_AUTHORS {
            format!("{}, et al.", names[..MAX_LISTED_AUTHORS].join(", "))
        } else {
            names.join(", ")
        };

        let year = [&self.published_print, &self.published_online, &self.issued]
            .into_iter()
            .flatten()
            .find_map(DateParts::year)
            .map_or_else(|| UNKNOWN.to_string(), |y| y.to_string());

        CitationMetadata {
            doi: doi.to_string(),
            title: first_or_unknown(self.title),
            authors,
            journal: first_or_unknown(self.container_title),
            publisher: self.publisher.unwrap_or_else(|| UNKNOWN.to_string()),
            year,
            url: self.url.unwrap_or_else(|| format!("https://doi.org/{doi}")),
        }
    }
}

fn first_or_unknown(values: Vec<String>) -> String {
    values
        .into_iter()
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

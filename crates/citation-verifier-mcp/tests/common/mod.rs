//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use citation_verifier::{normalize_doi, CitationMetadata, CitationVerifier, VerificationResult};
use citation_verifier_mcp::protocol::ProtocolHandler;
use citation_verifier_mcp::verification::VerificationAdapter;

pub const KNOWN_DOI: &str = "10.1038/nature12373";

/// Offline verifier: only [`KNOWN_DOI`] resolves. `panic-doi` panics.
#[derive(Default)]
pub struct StubVerifier {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CitationVerifier for StubVerifier {
    async fn verify_doi(&self, doi: &str) -> VerificationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let doi = normalize_doi(doi);
        if doi == "panic-doi" {
            panic!("stub verifier exploded");
        }
        if doi == KNOWN_DOI {
            VerificationResult::Verified(CitationMetadata {
                doi: doi.clone(),
                title: "Nanometre-scale thermometry in a living cell".to_string(),
                authors: "G. Kucsko, P. C. Maurer, N. Y. Yao, et al.".to_string(),
                journal: "Nature".to_string(),
                publisher: "Springer Science and Business Media LLC".to_string(),
                year: "2013".to_string(),
                url: format!("https://doi.org/{doi}"),
            })
        } else {
            VerificationResult::not_verified(doi, "DOI not found in Crossref database")
        }
    }
}

pub fn stub_handler() -> (ProtocolHandler, Arc<StubVerifier>) {
    let stub = Arc::new(StubVerifier::default());
    let adapter = VerificationAdapter::new(stub.clone());
    (ProtocolHandler::new(Arc::new(adapter)), stub)
}

pub fn uninitialized_handler() -> ProtocolHandler {
    ProtocolHandler::new(Arc::new(VerificationAdapter::uninitialized()))
}

/// Build an MCP JSON-RPC request.
pub fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

pub fn verify_request(id: i64, doi: &str) -> Value {
    mcp_request(
        id,
        "tools/call",
        json!({ "name": "verify_citation", "arguments": { "doi": doi } }),
    )
}

//! Verification adapter: the server's handle on the DOI registry.

pub mod adapter;

pub use adapter::{AdapterError, VerificationAdapter};

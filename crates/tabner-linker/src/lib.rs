//! Tabner Entity Linking
//!
//! Resolves recognized entity spans to knowledge-base identifiers through an
//! external lookup service.
//!
//! The only backend is the DBpedia Lookup search API. Lookup is best-effort
//! by contract: transport failures, malformed payloads, and empty result sets
//! all degrade to the `"NOT FOUND"` sentinel after a bounded number of
//! retries, so linking never aborts a batch run.

#![warn(missing_docs)]

pub mod dbpedia;

use thiserror::Error;

pub use dbpedia::DbpediaLinker;

/// Errors that can occur while talking to a lookup service.
///
/// These never escape a linker's `link` call; they drive the internal retry
/// loop and are logged when an attempt is abandoned.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Lookup service answered with an unexpected payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

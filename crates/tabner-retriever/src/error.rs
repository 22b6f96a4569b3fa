//! Error types for entity retrieval

use thiserror::Error;

/// Errors that can occur while talking to a retrieval backend.
///
/// These never escape a retriever's `retrieve` call; they drive the internal
/// retry loop and are logged when an attempt is abandoned.
#[derive(Error, Debug)]
pub enum RetrieveError {
    /// Annotation server communication error
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Model output did not follow the expected structure
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the data model and the
//! infrastructure layers. Implementations live in other crates.

use crate::entity::{Entity, LinkedEntity};
use crate::result::NerResult;

/// Trait for recognizing entity spans in raw text.
///
/// Implementations must not fail: malformed backend output or an exhausted
/// retry budget degrades to an empty result, so a single bad record never
/// aborts a batch run.
pub trait EntityRetriever {
    /// Extract sentence-grouped entity spans from `text`.
    fn retrieve(&self, text: &str) -> NerResult;
}

/// Trait for resolving an entity span to a knowledge-base identifier.
///
/// Implementations must not fail: lookup errors and empty search results both
/// degrade to the not-found sentinel.
pub trait Linker {
    /// Resolve `entity` to a link record.
    fn link(&self, entity: &Entity) -> LinkedEntity;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (tabner-llm).
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

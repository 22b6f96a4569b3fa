//! Tabner Entity Retrieval
//!
//! Turns raw text into sentence-grouped entity spans through one of two
//! backends: an NLP annotation server or a prompt-driven LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → PipelineRetriever → annotation server → NerResult
//! Text → LlmRetriever → prompt → LlmProvider → JSON parse → NerResult
//! ```
//!
//! Both backends implement `EntityRetriever` from `tabner-model` and share the
//! same degradation policy: any failure is retried up to a fixed attempt
//! ceiling, and exhaustion yields an empty result instead of an error, so one
//! stubborn record never aborts a batch run.
//!
//! # Example
//!
//! ```
//! use tabner_llm::MockProvider;
//! use tabner_model::traits::EntityRetriever;
//! use tabner_retriever::{LlmRetriever, RetrieverConfig};
//!
//! let provider = MockProvider::new(
//!     r#"[[{"text": "Москва", "type": "LOC", "start_char": 0, "end_char": 6}]]"#,
//! );
//! let retriever = LlmRetriever::new(
//!     provider,
//!     vec!["LOC".to_string()],
//!     RetrieverConfig::default(),
//! );
//!
//! let result = retriever.retrieve("Москва — столица России.");
//! assert_eq!(result.entity_count(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod llm;
mod parser;
mod pipeline;
mod prompt;

pub use config::RetrieverConfig;
pub use error::RetrieveError;
pub use llm::LlmRetriever;
pub use pipeline::PipelineRetriever;
pub use prompt::PromptBuilder;

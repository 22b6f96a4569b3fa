//! Prompt-based entity retrieval through an LLM provider

use crate::config::RetrieverConfig;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use std::fmt;
use tabner_model::traits::{EntityRetriever, LlmProvider};
use tabner_model::NerResult;
use tracing::{debug, warn};

/// Retrieves entities by prompting an LLM and parsing its JSON output.
///
/// Each record gets up to `max_retries` attempts; a provider failure or an
/// unparseable response triggers another attempt, and exhaustion degrades to
/// an empty result.
pub struct LlmRetriever<P> {
    provider: P,
    classes: Vec<String>,
    config: RetrieverConfig,
}

impl<P> LlmRetriever<P>
where
    P: LlmProvider,
    P::Error: fmt::Display,
{
    /// Create a retriever over the given provider and class inventory.
    pub fn new(provider: P, classes: Vec<String>, config: RetrieverConfig) -> Self {
        Self {
            provider,
            classes,
            config,
        }
    }
}

impl<P> EntityRetriever for LlmRetriever<P>
where
    P: LlmProvider,
    P::Error: fmt::Display,
{
    fn retrieve(&self, text: &str) -> NerResult {
        let prompt = PromptBuilder::new(text, &self.classes).build();
        debug!("Prompt length: {} chars", prompt.len());

        for attempt in 1..=self.config.max_retries {
            match self.provider.generate(&prompt) {
                Ok(response) => match parse_llm_response(&response) {
                    Ok(result) => {
                        debug!(
                            "Retrieved {} entities in {} sentences",
                            result.entity_count(),
                            result.sentences.len()
                        );
                        return result;
                    }
                    Err(e) => {
                        warn!("Error while retrieving entities: {}. Try {}.", e, attempt);
                    }
                },
                Err(e) => {
                    warn!("Error while retrieving entities: {}. Try {}.", e, attempt);
                }
            }
        }

        warn!(
            "Failed to retrieve entities after {} attempts, returning empty result",
            self.config.max_retries
        );
        NerResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabner_llm::MockProvider;

    fn classes() -> Vec<String> {
        vec!["LOC".to_string(), "ORG".to_string()]
    }

    fn retriever_with(provider: MockProvider) -> LlmRetriever<MockProvider> {
        LlmRetriever::new(provider, classes(), RetrieverConfig::default())
    }

    #[test]
    fn test_successful_retrieval() {
        let provider = MockProvider::new(
            r#"[[{"text": "Москва", "type": "LOC", "start_char": 0, "end_char": 6}]]"#,
        );
        let retriever = retriever_with(provider);

        let result = retriever.retrieve("Москва");
        assert_eq!(result.entity_count(), 1);
        assert_eq!(result.sentences[0][0].entity_type, "LOC");
    }

    #[test]
    fn test_markdown_fenced_output_accepted() {
        let provider = MockProvider::new(
            "```json\n[[{\"text\": \"Яндекс\", \"type\": \"ORG\", \"start_char\": 0, \"end_char\": 6}]]\n```",
        );
        let retriever = retriever_with(provider);

        let result = retriever.retrieve("Яндекс");
        assert_eq!(result.entity_count(), 1);
    }

    #[test]
    fn test_malformed_output_exhausts_retries_to_empty() {
        let provider = MockProvider::new("not json at all");
        let call_counter = provider.clone();
        let retriever = retriever_with(provider);

        let result = retriever.retrieve("Москва");
        assert!(result.is_empty());
        assert_eq!(
            call_counter.call_count(),
            RetrieverConfig::default().max_retries as usize
        );
    }

    #[test]
    fn test_provider_error_exhausts_retries_to_empty() {
        let mut provider = MockProvider::default();
        let prompt = PromptBuilder::new("Москва", &classes()).build();
        provider.add_error(prompt.as_str());
        let call_counter = provider.clone();

        let retriever = LlmRetriever::new(
            provider,
            classes(),
            RetrieverConfig {
                max_retries: 2,
                ..RetrieverConfig::default()
            },
        );

        let result = retriever.retrieve("Москва");
        assert!(result.is_empty());
        assert_eq!(call_counter.call_count(), 2);
    }
}

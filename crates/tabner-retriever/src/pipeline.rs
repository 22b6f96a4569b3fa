//! Annotation-server entity retrieval
//!
//! Speaks the CoreNLP-compatible HTTP wire format: raw text is POSTed with an
//! `annotators` property set, and the server answers with per-sentence entity
//! mentions carrying label and character offsets.

use crate::config::RetrieverConfig;
use crate::error::RetrieveError;
use serde::Deserialize;
use tabner_model::traits::EntityRetriever;
use tabner_model::{Entity, NerResult};
use tracing::{debug, warn};

/// Default annotation server endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9000";

const ANNOTATOR_PROPERTIES: &str =
    r#"{"annotators":"tokenize,ssplit,ner","outputFormat":"json"}"#;

/// Retrieves entities from a CoreNLP-compatible annotation server.
pub struct PipelineRetriever {
    endpoint: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Deserialize)]
struct PipelineResponse {
    #[serde(default)]
    sentences: Vec<PipelineSentence>,
}

#[derive(Deserialize)]
struct PipelineSentence {
    #[serde(default, rename = "entitymentions")]
    entity_mentions: Vec<PipelineMention>,
}

#[derive(Deserialize)]
struct PipelineMention {
    text: String,
    ner: String,
    #[serde(rename = "characterOffsetBegin")]
    begin: usize,
    #[serde(rename = "characterOffsetEnd")]
    end: usize,
}

impl PipelineRetriever {
    /// Create a retriever against the given annotation server.
    pub fn new(endpoint: impl Into<String>, config: &RetrieverConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            client,
            max_retries: config.max_retries,
        }
    }

    /// Create a retriever against the default local endpoint.
    pub fn default_endpoint(config: &RetrieverConfig) -> Self {
        Self::new(DEFAULT_ENDPOINT, config)
    }

    /// Annotate one text record.
    ///
    /// # Errors
    ///
    /// Returns error if the server is unreachable, answers with a non-success
    /// status, or produces a payload that does not match the wire format.
    pub async fn annotate(&self, text: &str) -> Result<NerResult, RetrieveError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("properties", ANNOTATOR_PROPERTIES)])
            .body(text.to_string())
            .send()
            .await
            .map_err(|e| RetrieveError::Pipeline(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RetrieveError::Pipeline(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: PipelineResponse = response
            .json()
            .await
            .map_err(|e| RetrieveError::InvalidFormat(format!("Failed to parse response: {}", e)))?;

        let sentences: Vec<Vec<Entity>> = payload
            .sentences
            .into_iter()
            .map(|sentence| {
                sentence
                    .entity_mentions
                    .into_iter()
                    .map(|mention| {
                        Entity::new(mention.text, mention.ner, mention.begin, mention.end)
                    })
                    .collect()
            })
            .collect();

        debug!(
            "Annotation server returned {} sentences",
            sentences.len()
        );
        Ok(NerResult::new(sentences))
    }
}

impl EntityRetriever for PipelineRetriever {
    fn retrieve(&self, text: &str) -> NerResult {
        for attempt in 1..=self.max_retries {
            let outcome = tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(async { self.annotate(text).await });

            match outcome {
                Ok(result) => return result,
                Err(e) => {
                    warn!("Error while retrieving entities: {}. Try {}.", e, attempt);
                }
            }
        }

        warn!(
            "Failed to retrieve entities after {} attempts, returning empty result",
            self.max_retries
        );
        NerResult::default()
    }
}

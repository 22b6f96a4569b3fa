//! DBpedia Lookup client

use crate::LinkError;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tabner_model::traits::Linker as LinkerTrait;
use tabner_model::{Entity, LinkedEntity};
use tracing::{debug, warn};

/// Default DBpedia Lookup endpoint
pub const DEFAULT_ENDPOINT: &str = "https://lookup.dbpedia.org/api/search";

/// Default lookup language
pub const DEFAULT_LANG: &str = "ru";

/// Default timeout for lookup requests (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Resolves entity spans through the DBpedia Lookup search API.
///
/// The top-ranked document's resource is taken as the link; anything short of
/// that resolves to the not-found sentinel.
pub struct DbpediaLinker {
    endpoint: String,
    lang: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    docs: Vec<LookupDoc>,
}

#[derive(Deserialize)]
struct LookupDoc {
    // The lookup API has served both a plain string and a one-element array
    // here across versions; accept either.
    #[serde(default)]
    resource: Value,
}

impl LookupDoc {
    fn resource_str(&self) -> Option<String> {
        match &self.resource {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items
                .first()
                .and_then(Value::as_str)
                .map(ToString::to_string),
            _ => None,
        }
    }
}

impl DbpediaLinker {
    /// Create a linker against the given lookup endpoint and language.
    pub fn new(endpoint: impl Into<String>, lang: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            lang: lang.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a linker against the public DBpedia endpoint.
    pub fn default_endpoint(lang: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, lang)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Look up one entity span.
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable, answers with a non-success
    /// status, or produces an unparseable payload. An empty result set is not
    /// an error; it resolves to the not-found sentinel.
    pub async fn lookup(&self, entity: &Entity) -> Result<LinkedEntity, LinkError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("query", entity.text.as_str()),
                ("format", "json"),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LinkError::Communication(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LinkError::Communication(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: LookupResponse = response
            .json()
            .await
            .map_err(|e| LinkError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        match payload.docs.first().and_then(LookupDoc::resource_str) {
            Some(resource) => {
                debug!("Resolved '{}' to {}", entity.text, resource);
                Ok(LinkedEntity::new(entity.clone(), resource))
            }
            None => Ok(LinkedEntity::not_found(entity.clone())),
        }
    }
}

impl LinkerTrait for DbpediaLinker {
    fn link(&self, entity: &Entity) -> LinkedEntity {
        for attempt in 1..=self.max_retries {
            let outcome = tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(async { self.lookup(entity).await });

            match outcome {
                Ok(linked) => return linked,
                Err(e) => {
                    warn!("Error while linking '{}': {}. Try {}.", entity.text, e, attempt);
                }
            }
        }

        warn!(
            "Failed to link '{}' after {} attempts",
            entity.text, self.max_retries
        );
        LinkedEntity::not_found(entity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linker_creation() {
        let linker = DbpediaLinker::default_endpoint("ru");
        assert_eq!(linker.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(linker.lang, "ru");
        assert_eq!(linker.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_with_max_retries() {
        let linker = DbpediaLinker::default_endpoint("en").with_max_retries(1);
        assert_eq!(linker.max_retries, 1);
    }

    #[test]
    fn test_resource_as_string() {
        let payload = r#"{"docs": [{"resource": "http://dbpedia.org/resource/Moscow"}]}"#;
        let parsed: LookupResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(
            parsed.docs[0].resource_str().unwrap(),
            "http://dbpedia.org/resource/Moscow"
        );
    }

    #[test]
    fn test_resource_as_array() {
        let payload = r#"{"docs": [{"resource": ["http://dbpedia.org/resource/Moscow"]}]}"#;
        let parsed: LookupResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(
            parsed.docs[0].resource_str().unwrap(),
            "http://dbpedia.org/resource/Moscow"
        );
    }

    #[test]
    fn test_empty_docs() {
        let payload = r#"{"docs": []}"#;
        let parsed: LookupResponse = serde_json::from_str(payload).unwrap();
        assert!(parsed.docs.first().is_none());
    }

    #[test]
    fn test_unreachable_service_degrades_to_not_found() {
        let linker = DbpediaLinker::new("http://localhost:1", "ru").with_max_retries(1);
        let entity = Entity::new("Москва", "LOC", 0, 6);

        let linked = linker.link(&entity);
        assert!(!linked.is_resolved());
        assert_eq!(linked.entity, entity);
    }
}

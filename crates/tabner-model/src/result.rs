//! Sentence-grouped extraction and linking results.

use crate::entity::Entity;
use serde::{Deserialize, Serialize};

/// Extraction output for one input text record.
///
/// Sentences are ordered the way the source text was segmented; the order of
/// spans within a sentence carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NerResult {
    /// One span list per source sentence.
    pub sentences: Vec<Vec<Entity>>,
}

impl NerResult {
    /// Create a result from pre-grouped sentences.
    pub fn new(sentences: Vec<Vec<Entity>>) -> Self {
        Self { sentences }
    }

    /// All spans across all sentences, in sentence order.
    pub fn flatten(&self) -> Vec<&Entity> {
        self.sentences.iter().flatten().collect()
    }

    /// Total number of spans across all sentences.
    pub fn entity_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// Whether the result holds no spans at all.
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}

/// Resolved link strings parallel to a [`NerResult`]'s sentence structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingResult {
    /// One link list per source sentence.
    pub sentences: Vec<Vec<String>>,
}

impl LinkingResult {
    /// Create a linking result from pre-grouped link strings.
    pub fn new(sentences: Vec<Vec<String>>) -> Self {
        Self { sentences }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ner_result_wire_shape() {
        let result = NerResult::new(vec![
            vec![
                Entity::new("Москве", "LOC", 9, 15),
                Entity::new("Яндексе", "ORG", 28, 35),
            ],
            vec![Entity::new("Санкт-Петербург", "LOC", 9, 24)],
        ]);

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.starts_with("{\"sentences\":[["));

        let parsed: NerResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, parsed);
    }

    #[test]
    fn test_flatten_preserves_sentence_order() {
        let result = NerResult::new(vec![
            vec![Entity::new("a", "LOC", 0, 1)],
            vec![Entity::new("b", "PER", 2, 3), Entity::new("c", "ORG", 4, 5)],
        ]);

        let texts: Vec<&str> = result.flatten().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert_eq!(result.entity_count(), 3);
    }

    #[test]
    fn test_empty_result() {
        assert!(NerResult::default().is_empty());
        // Sentences with no spans still count as empty.
        assert!(NerResult::new(vec![vec![], vec![]]).is_empty());
    }

    #[test]
    fn test_linking_result_round_trip() {
        let result = LinkingResult::new(vec![vec![
            "http://dbpedia.org/resource/Moscow".to_string(),
            "NOT FOUND".to_string(),
        ]]);
        let json = serde_json::to_string(&result).unwrap();
        let parsed: LinkingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, parsed);
    }
}

//! Parse LLM output into a sentence-grouped span result

use crate::error::RetrieveError;
use serde_json::Value;
use tabner_model::{Entity, NerResult};
use tracing::warn;

/// Parse an LLM JSON response into a sentence-grouped result.
///
/// The expected shape is an array of arrays of span objects. Individual spans
/// that are malformed or fail validation are skipped with a warning; a
/// response that is not an array of arrays at all is an error, which lets the
/// caller's retry loop ask the model again.
pub fn parse_llm_response(response: &str) -> Result<NerResult, RetrieveError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| RetrieveError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let sentences_json = json
        .as_array()
        .ok_or_else(|| RetrieveError::InvalidFormat("Expected JSON array".to_string()))?;

    let mut sentences = Vec::with_capacity(sentences_json.len());
    for (sentence_idx, sentence_json) in sentences_json.iter().enumerate() {
        let spans_json = sentence_json.as_array().ok_or_else(|| {
            RetrieveError::InvalidFormat(format!(
                "Sentence {} is not a JSON array",
                sentence_idx
            ))
        })?;

        let mut spans = Vec::with_capacity(spans_json.len());
        for (span_idx, span_json) in spans_json.iter().enumerate() {
            match parse_entity_json(span_json) {
                Ok(entity) => {
                    if let Err(e) = validate_entity(&entity) {
                        warn!(
                            "Span {}/{} failed validation: {}",
                            sentence_idx, span_idx, e
                        );
                        continue;
                    }
                    spans.push(entity);
                }
                Err(e) => {
                    warn!("Failed to parse span {}/{}: {}", sentence_idx, span_idx, e);
                }
            }
        }
        sentences.push(spans);
    }

    Ok(NerResult::new(sentences))
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, RetrieveError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```json") || trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(RetrieveError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a single span from JSON
fn parse_entity_json(json: &Value) -> Result<Entity, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Span is not a JSON object".to_string())?;

    let text = obj
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'text'".to_string())?
        .to_string();

    let entity_type = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'type'".to_string())?
        .to_string();

    let start_char = obj
        .get("start_char")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| "Missing or invalid 'start_char'".to_string())? as usize;

    let end_char = obj
        .get("end_char")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| "Missing or invalid 'end_char'".to_string())? as usize;

    Ok(Entity {
        text,
        entity_type,
        start_char,
        end_char,
    })
}

fn validate_entity(entity: &Entity) -> Result<(), String> {
    if entity.text.trim().is_empty() {
        return Err("text is empty".to_string());
    }
    if entity.entity_type.is_empty() {
        return Err("type is empty".to_string());
    }
    if entity.start_char > entity.end_char {
        return Err(format!(
            "start_char {} > end_char {}",
            entity.start_char, entity.end_char
        ));
    }
    Ok(())
}

//! LLM prompt engineering for entity extraction

/// Builds prompts instructing the LLM to extract entity spans.
pub struct PromptBuilder {
    text: String,
    classes: Vec<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder for one text record.
    pub fn new(text: impl Into<String>, classes: &[String]) -> Self {
        Self {
            text: text.into(),
            classes: classes.to_vec(),
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Instruction and span format specification
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Allowed class inventory
        prompt.push_str(&format!(
            "Use only the following entity types: {}\n\n",
            self.classes.join(", ")
        ));

        // 3. Worked example
        prompt.push_str(WORKED_EXAMPLE);
        prompt.push_str("\n\n");

        // 4. The text to analyze
        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");

        // 5. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract every named entity from the text below.
Each entity must follow this format:

{
  "text": "Москва",
  "type": "LOC",
  "start_char": 14,
  "end_char": 19
}

Rules:
- "text" is the mention exactly as written in the source
- "start_char"/"end_char" are character offsets into the source text
- Group entities by sentence: one inner array per source sentence
- A sentence with no entities is an empty array
- Do not invent entities that are not present in the text"#;

const WORKED_EXAMPLE: &str = r#"Example:
Text: Я живу в Москве и работаю в Яндексе. Завтра еду в Санкт-Петербург.
Answer: [
    [
        {"text": "Москве", "type": "LOC", "start_char": 9, "end_char": 15},
        {"text": "Яндексе", "type": "ORG", "start_char": 28, "end_char": 35}
    ],
    [
        {"text": "Санкт-Петербург", "type": "LOC", "start_char": 9, "end_char": 24}
    ]
]"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array of arrays only, one inner array per sentence):
[
  [
    {"text": "...", "type": "...", "start_char": N, "end_char": M}
  ]
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> Vec<String> {
        ["LOC", "PER", "MISC", "ORG"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_prompt_includes_text() {
        let builder = PromptBuilder::new("Гагарин родился в Клушино", &classes());
        let prompt = builder.build();
        assert!(prompt.contains("Гагарин родился в Клушино"));
    }

    #[test]
    fn test_prompt_includes_class_inventory() {
        let prompt = PromptBuilder::new("Test", &classes()).build();
        assert!(prompt.contains("LOC, PER, MISC, ORG"));
    }

    #[test]
    fn test_prompt_includes_instructions_and_reminder() {
        let prompt = PromptBuilder::new("Test", &classes()).build();
        assert!(prompt.contains("Extract every named entity"));
        assert!(prompt.contains("start_char"));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn test_prompt_respects_custom_classes() {
        let custom = vec!["GPE".to_string(), "DATE".to_string()];
        let prompt = PromptBuilder::new("Test", &custom).build();
        assert!(prompt.contains("GPE, DATE"));
        assert!(!prompt.contains("LOC, PER"));
    }
}

//! Structuring Layer — turns free text into schema-shaped data via one
//! generative call plus defensive parsing.
//!
//! The model is asked to "return only JSON" but is not trusted to comply:
//! fences are stripped before parsing, and a parse failure degrades to a
//! documented fallback (the raw text for objects, the empty list for arrays).
//! Nothing from this layer raises to the caller.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

use crate::llm_client::TextGenerator;

/// System prompt shared by all structuring calls — enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Result of one object-shaped structuring call.
#[derive(Debug)]
pub enum Structured<T> {
    /// Strict decode succeeded.
    Parsed(T),
    /// The model's text did not decode; carries the fence-stripped raw text
    /// (empty when the generative call itself failed).
    Raw(String),
}

/// Parse-with-fallback boundary over the generative-text collaborator.
#[derive(Clone)]
pub struct Structurer {
    generator: Arc<dyn TextGenerator>,
}

impl Structurer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// One object-shaped call. The prompt must describe the target schema.
    pub async fn object<T: DeserializeOwned>(&self, prompt: &str) -> Structured<T> {
        let text = match self.generator.generate(prompt, JSON_ONLY_SYSTEM).await {
            Ok(t) => t,
            Err(e) => {
                warn!("structuring call failed: {e}");
                return Structured::Raw(String::new());
            }
        };
        let cleaned = strip_json_fences(&text);
        match serde_json::from_str::<T>(cleaned) {
            Ok(value) => Structured::Parsed(value),
            Err(e) => {
                warn!("structuring parse failed, degrading to raw text: {e}");
                Structured::Raw(cleaned.to_string())
            }
        }
    }

    /// One array-shaped call. Parse failure yields the empty list.
    pub async fn array<T: DeserializeOwned>(&self, prompt: &str) -> Vec<T> {
        let text = match self.generator.generate(prompt, JSON_ONLY_SYSTEM).await {
            Ok(t) => t,
            Err(e) => {
                warn!("structuring call failed: {e}");
                return Vec::new();
            }
        };
        let cleaned = strip_json_fences(&text);
        match serde_json::from_str::<Vec<T>>(cleaned) {
            Ok(values) => values,
            Err(e) => {
                warn!("structuring parse failed, degrading to empty list: {e}");
                Vec::new()
            }
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::llm_client::{LlmError, TextGenerator};

    /// Scripted generator: returns queued responses in order, repeating the
    /// last one when the script runs out. Counts calls.
    pub struct ScriptedGenerator {
        responses: Vec<String>,
        pub calls: Mutex<usize>,
    }

    impl ScriptedGenerator {
        pub fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: responses.into_iter().map(String::from).collect(),
                calls: Mutex::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            let mut calls = self.calls.lock().unwrap();
            let index = (*calls).min(self.responses.len().saturating_sub(1));
            *calls += 1;
            self.responses
                .get(index)
                .cloned()
                .ok_or(LlmError::EmptyContent)
        }

        async fn describe_media(&self, url: &str) -> Result<String, LlmError> {
            Ok(format!("description of {url}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedGenerator;
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[tokio::test]
    async fn test_fenced_and_bare_responses_parse_identically() {
        let fenced = Structurer::new(std::sync::Arc::new(ScriptedGenerator::new(vec![
            "```json\n{\"name\":\"X\"}\n```",
        ])));
        let bare = Structurer::new(std::sync::Arc::new(ScriptedGenerator::new(vec![
            "{\"name\":\"X\"}",
        ])));

        let a: Structured<Named> = fenced.object("p").await;
        let b: Structured<Named> = bare.object("p").await;
        match (a, b) {
            (Structured::Parsed(a), Structured::Parsed(b)) => {
                assert_eq!(a, b);
                assert_eq!(a.name, "X");
            }
            other => panic!("expected both parsed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_object_parse_failure_degrades_to_raw() {
        let structurer = Structurer::new(std::sync::Arc::new(ScriptedGenerator::new(vec![
            "I am sorry, I cannot produce JSON today.",
        ])));
        let result: Structured<Named> = structurer.object("p").await;
        match result {
            Structured::Raw(text) => assert!(text.contains("cannot produce JSON")),
            Structured::Parsed(_) => panic!("expected raw fallback"),
        }
    }

    #[tokio::test]
    async fn test_array_parse_failure_degrades_to_empty() {
        let structurer = Structurer::new(std::sync::Arc::new(ScriptedGenerator::new(vec![
            "not json at all",
        ])));
        let result: Vec<Named> = structurer.array("p").await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_array_parses_valid_list() {
        let structurer = Structurer::new(std::sync::Arc::new(ScriptedGenerator::new(vec![
            "[{\"name\":\"a\"},{\"name\":\"b\"}]",
        ])));
        let result: Vec<Named> = structurer.array("p").await;
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].name, "b");
    }
}

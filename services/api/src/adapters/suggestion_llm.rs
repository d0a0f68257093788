//! services/api/src/adapters/suggestion_llm.rs
//!
//! This module contains the adapter for the metadata-suggestion LLM.
//! It implements the `MetadataSuggestionService` port from the `core` crate.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;

use catalog_core::domain::MetadataSuggestion;
use catalog_core::ports::{MetadataSuggestionService, PortError, PortResult};

const SYSTEM_INSTRUCTIONS: &str = r#"You are a metadata assistant for a video catalog. Based on the video description or keywords you are given, suggest a compelling title, a detailed description, relevant tags (at most 5), and a category.

Respond with a single JSON object containing exactly these fields:
- "title": string
- "description": string
- "category": string
- "tags": array of strings (at most 5)

Do not wrap the object in markdown fences and do not add any other fields."#;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `MetadataSuggestionService` using an
/// OpenAI-compatible LLM.
///
/// Exactly one outbound request per invocation, bounded by an explicit
/// timeout. No caching and no automatic retry.
#[derive(Clone)]
pub struct OpenAiSuggestionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiSuggestionAdapter {
    /// Creates a new `OpenAiSuggestionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }
}

//=========================================================================================
// Response Parsing
//=========================================================================================

/// The shape the remote service is asked to return. Fields the model left
/// out default to empty rather than failing the whole suggestion; only a
/// body that is not valid JSON is a hard failure.
#[derive(Deserialize, Default)]
#[serde(default)]
struct SuggestionRecord {
    title: String,
    description: String,
    category: String,
    tags: Vec<String>,
}

impl SuggestionRecord {
    fn to_domain(self) -> MetadataSuggestion {
        MetadataSuggestion {
            title: self.title,
            description: self.description,
            category: self.category,
            tags: self.tags,
        }
    }
}

fn parse_suggestion(body: &str) -> PortResult<MetadataSuggestion> {
    let record: SuggestionRecord = serde_json::from_str(body).map_err(|e| {
        PortError::Unexpected(format!("suggestion response was not valid JSON: {e}"))
    })?;
    Ok(record.to_domain())
}

//=========================================================================================
// `MetadataSuggestionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl MetadataSuggestionService for OpenAiSuggestionAdapter {
    async fn suggest_metadata(&self, prompt: &str) -> PortResult<MetadataSuggestion> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!("Video description or keywords: {prompt}"))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // The transport default is effectively unbounded, so the deadline
        // lives here rather than being inherited silently.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                PortError::Unavailable(format!(
                    "suggestion request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Suggestion LLM response contained no text content.".to_string(),
                )
            })?;

        parse_suggestion(&content)
    }
}

//=========================================================================================
// Disabled Stand-in
//=========================================================================================

/// Wired in place of the OpenAI adapter when no API key is configured.
/// The catalog keeps working; only the suggestion call-out reports itself
/// unavailable.
pub struct DisabledSuggestionAdapter;

#[async_trait]
impl MetadataSuggestionService for DisabledSuggestionAdapter {
    async fn suggest_metadata(&self, _prompt: &str) -> PortResult<MetadataSuggestion> {
        Err(PortError::Unavailable(
            "metadata suggestions are disabled: no API key configured".to_string(),
        ))
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_response_parses_into_all_fields() {
        let body = r#"{
            "title": "Alpine Sunrise",
            "description": "Slow pans over snowfields.",
            "category": "Nature",
            "tags": ["alps", "sunrise"]
        }"#;

        let suggestion = parse_suggestion(body).unwrap();
        assert_eq!(suggestion.title, "Alpine Sunrise");
        assert_eq!(suggestion.category, "Nature");
        assert_eq!(suggestion.tags, vec!["alps", "sunrise"]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let suggestion = parse_suggestion(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(suggestion.title, "Only a title");
        assert_eq!(suggestion.description, "");
        assert_eq!(suggestion.category, "");
        assert!(suggestion.tags.is_empty());
    }

    #[test]
    fn malformed_json_is_a_hard_failure() {
        let err = parse_suggestion("Here is your metadata: ...").unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }

    #[tokio::test]
    async fn disabled_adapter_reports_unavailable() {
        let err = DisabledSuggestionAdapter
            .suggest_metadata("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unavailable(_)));
    }
}

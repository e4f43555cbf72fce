use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat message for the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Sequences that end generation.
    pub stop: Vec<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 1000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: vec![" END".to_string()],
        }
    }
}

/// Trait for LLM providers. Each backend implements this.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and return the assistant's response text,
    /// trimmed of surrounding whitespace.
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Pull `choices[0].message.content` out of a chat completion response.
pub(crate) fn extract_content(resp: &Value) -> Result<String, LlmError> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_options_are_deterministic() {
        let options = CompletionOptions::default();
        assert_eq!(options.temperature, 0.0);
        assert_eq!(options.max_tokens, 1000);
        assert_eq!(options.top_p, 1.0);
        assert_eq!(options.stop, vec![" END"]);
    }

    #[test]
    fn content_is_trimmed() {
        let resp = json!({ "choices": [{ "message": { "role": "assistant", "content": "\n  Cells divide.  \n" } }] });
        assert_eq!(extract_content(&resp).unwrap(), "Cells divide.");
    }

    #[test]
    fn missing_content_is_a_parse_error() {
        let err = extract_content(&json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[test]
    fn role_serializes_lowercase() {
        let value = serde_json::to_value(Message::system("be brief")).unwrap();
        assert_eq!(value, json!({ "role": "system", "content": "be brief" }));
    }
}

use async_trait::async_trait;
use tracing::debug;

use crate::provider::{extract_content, CompletionOptions, LlmError, LlmProvider, Message};

use super::chat_body;

/// Chat completions against an Azure OpenAI deployment.
pub struct AzureOpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAiProvider {
    pub fn new(endpoint: String, api_key: String, deployment: String, api_version: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            deployment,
            api_version,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let url = self.url();
        let body = chat_body(messages, options);

        debug!("Azure OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        extract_content(&resp)
    }
}

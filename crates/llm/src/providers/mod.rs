pub mod azure_openai;
pub mod openai;

use serde_json::{json, Value};

use docqa_core::LlmConfig;

use crate::provider::{CompletionOptions, LlmError, LlmProvider, Message, Role};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "azure" | "azure_openai" => {
            let endpoint = llm_config
                .azure_endpoint
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("AZURE_OPENAI_ENDPOINT not set".into()))?;
            let api_key = llm_config
                .azure_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("AZURE_OPENAI_KEY not set".into()))?;
            let deployment = llm_config.azure_deployment.as_ref().ok_or_else(|| {
                LlmError::NotConfigured("AZURE_OPENAI_DEPLOYMENT not set".into())
            })?;
            Ok(Box::new(azure_openai::AzureOpenAiProvider::new(
                endpoint.clone(),
                api_key.clone(),
                deployment.clone(),
                llm_config.azure_api_version.clone(),
            )))
        }
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

/// Chat completion body shared by the OpenAI-compatible backends.
pub(crate) fn chat_body(messages: &[Message], options: &CompletionOptions) -> Value {
    let api_messages: Vec<Value> = messages
        .iter()
        .map(|m| {
            json!({
                "role": match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                "content": m.content,
            })
        })
        .collect();

    json!({
        "messages": api_messages,
        "temperature": options.temperature,
        "max_tokens": options.max_tokens,
        "top_p": options.top_p,
        "frequency_penalty": options.frequency_penalty,
        "presence_penalty": options.presence_penalty,
        "stop": options.stop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            azure_endpoint: None,
            azure_api_key: None,
            azure_deployment: None,
            azure_api_version: "2023-05-15".into(),
            openai_api_key: None,
            openai_model: "gpt-4".into(),
            openai_base_url: None,
        }
    }

    #[test]
    fn body_carries_messages_and_sampling() {
        let messages = [Message::system("sys"), Message::user("hi")];
        let body = chat_body(&messages, &CompletionOptions::default());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"].as_f64(), Some(0.0));
        assert_eq!(body["top_p"].as_f64(), Some(1.0));
        assert_eq!(body["stop"], json!([" END"]));
        assert!(body.get("model").is_none());
    }

    #[test]
    fn azure_needs_endpoint_key_and_deployment() {
        let mut config = llm_config("azure");
        config.azure_endpoint = Some("https://x.openai.azure.com".into());
        config.azure_api_key = Some("k".into());
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("AZURE_OPENAI_DEPLOYMENT"));

        config.azure_deployment = Some("gpt4".into());
        assert!(create_provider(&config).is_ok());
    }

    #[test]
    fn openai_needs_api_key() {
        let mut config = llm_config("openai");
        assert!(matches!(
            create_provider(&config).err().unwrap(),
            LlmError::NotConfigured(_)
        ));
        config.openai_api_key = Some("sk".into());
        assert!(create_provider(&config).is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_provider(&llm_config("carrier-pigeon")).err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
    }
}

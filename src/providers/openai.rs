//! OpenAI Chat Completions provider

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LlmProvider, LlmResponse, TokenStream, sse_token_stream};
use crate::{Config, Error, Result};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SYSTEM_PROMPT: &str = "You are Doxibox, a concise voice assistant.";

/// Chat Completions backend with streaming support
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Registry identifier for this backend
    pub const NAME: &'static str = "openai";

    /// Create a provider with an explicit key and model
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Dependency(
                "OpenAI provider requires an API key; set OPENAI_API_KEY or \
                 provider_options.openai.api_key"
                    .to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    /// Create a provider from the configured option bag
    ///
    /// # Errors
    ///
    /// Returns error if no API key can be resolved
    pub fn from_options(config: &Config, options: &HashMap<String, String>) -> Result<Self> {
        let api_key = config
            .api_key_for(Self::NAME, "OPENAI_API_KEY")
            .unwrap_or_default();
        let model = options
            .get("model")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    fn request(&self, prompt: &str, context: Option<&str>, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: context.unwrap_or(DEFAULT_SYSTEM_PROMPT).to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream,
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{OPENAI_API_BASE}/chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "OpenAI API error");
            return Err(Error::Provider(format!("OpenAI API error {status}: {body}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<LlmResponse> {
        tracing::debug!(model = %self.model, "starting chat completion");
        let response = self.post(&self.request(prompt, context, false)).await?;
        let result: ChatResponse = response.json().await?;

        let text = result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(LlmResponse {
            text,
            provider: Self::NAME.to_string(),
        })
    }

    async fn generate_streaming(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<TokenStream> {
        tracing::debug!(model = %self.model, "starting streaming chat completion");
        let response = self.post(&self.request(prompt, context, true)).await?;
        Ok(sse_token_stream(response))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

//! OpenRouter provider
//!
//! OpenAI-compatible Chat Completions against openrouter.ai, useful for
//! routing to hosted open-weight models without a direct vendor account.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LlmProvider, LlmResponse, TokenStream, sse_token_stream};
use crate::{Config, Error, Result};

const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat Completions backend for openrouter.ai
#[derive(Debug)]
pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenRouterProvider {
    /// Registry identifier for this backend
    pub const NAME: &'static str = "openrouter";

    /// Create a provider with an explicit key and model
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Dependency(
                "OpenRouter provider requires an API key; set OPENROUTER_API_KEY or \
                 provider_options.openrouter.api_key"
                    .to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
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
            .api_key_for(Self::NAME, "OPENROUTER_API_KEY")
            .unwrap_or_default();
        let model = options
            .get("model")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    fn request(&self, prompt: &str, context: Option<&str>, stream: bool) -> ChatRequest {
        let mut messages = Vec::new();
        if let Some(context) = context {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: context.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });
        ChatRequest {
            model: self.model.clone(),
            messages,
            stream,
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{OPENROUTER_API_BASE}/chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "OpenRouter API error");
            return Err(Error::Provider(format!(
                "OpenRouter API error {status}: {body}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
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
            .map(|choice| choice.message.content)
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
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

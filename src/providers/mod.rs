//! LLM provider routing
//!
//! Providers are swappable backends behind the [`LlmProvider`] trait.
//! The router always registers the offline [`EchoProvider`] fallback and
//! selects the configured provider per call, degrading to the fallback
//! for unknown names. Remote backends are registered from
//! `provider_options` and validate their credentials at construction.

mod echo;
mod openai;
mod openrouter;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;

use crate::{Config, Result};

pub use echo::EchoProvider;
pub use openai::OpenAiProvider;
pub use openrouter::OpenRouterProvider;

/// Lazy sequence of generated text fragments
pub type TokenStream = BoxStream<'static, Result<String>>;

/// A single generation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// Generated text
    pub text: String,
    /// Identifier of the provider that produced it
    pub provider: String,
}

/// A pluggable text-generation backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Registry identifier for this backend
    fn name(&self) -> &'static str;

    /// Generate a response for a prompt
    ///
    /// # Errors
    ///
    /// Returns error if the underlying generation call fails
    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<LlmResponse>;

    /// Generate a lazy stream of response fragments
    ///
    /// # Errors
    ///
    /// Returns error if the underlying generation call fails
    async fn generate_streaming(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<TokenStream>;
}

/// Routes generation calls to a registered backend
///
/// Unknown provider names silently degrade to the fallback; a failing
/// *registered* provider propagates its error unchanged, with no retry
/// and no fallback substitution.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    selected: String,
}

impl ProviderRouter {
    /// Build a router from configuration
    ///
    /// Always registers the echo fallback. Backends named in
    /// `provider_options` are registered eagerly so that missing
    /// credentials fail here rather than on first use.
    ///
    /// # Errors
    ///
    /// Returns error if a requested backend cannot be constructed
    pub fn new(config: &Config) -> Result<Self> {
        let mut providers: HashMap<String, Arc<dyn LlmProvider>> = HashMap::new();
        providers.insert(
            EchoProvider::NAME.to_string(),
            Arc::new(EchoProvider::default()),
        );

        if let Some(options) = config.provider_options.get(OpenAiProvider::NAME) {
            let provider = OpenAiProvider::from_options(config, options)?;
            providers.insert(OpenAiProvider::NAME.to_string(), Arc::new(provider));
        }
        if let Some(options) = config.provider_options.get(OpenRouterProvider::NAME) {
            let provider = OpenRouterProvider::from_options(config, options)?;
            providers.insert(OpenRouterProvider::NAME.to_string(), Arc::new(provider));
        }

        tracing::debug!(
            selected = %config.llm_provider,
            registered = providers.len(),
            "provider router initialized"
        );

        Ok(Self {
            providers,
            selected: config.llm_provider.clone(),
        })
    }

    /// Register a backend under its name; last registration wins
    pub fn register(&mut self, provider: Arc<dyn LlmProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Whether a backend is registered under `name`
    #[must_use]
    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    fn select(&self) -> Arc<dyn LlmProvider> {
        self.providers
            .get(&self.selected)
            .or_else(|| self.providers.get(EchoProvider::NAME))
            .cloned()
            .unwrap_or_else(|| Arc::new(EchoProvider::default()))
    }

    /// Generate via the selected backend, falling back for unknown names
    ///
    /// # Errors
    ///
    /// Returns error if the selected backend's call fails
    pub async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<LlmResponse> {
        self.select().generate(prompt, context).await
    }

    /// Streaming variant of [`ProviderRouter::generate`]
    ///
    /// # Errors
    ///
    /// Returns error if the selected backend's call fails
    pub async fn generate_streaming(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<TokenStream> {
        self.select().generate_streaming(prompt, context).await
    }
}

/// One SSE chunk of an OpenAI-compatible streaming response
#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Relay an OpenAI-compatible SSE response as a token stream
///
/// A spawned task parses `data:` lines off the byte stream and forwards
/// delta content through a channel; transport errors are forwarded as
/// stream items.
pub(crate) fn sse_token_stream(response: reqwest::Response) -> TokenStream {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String>>(32);

    tokio::spawn(async move {
        let mut bytes = Box::pin(response.bytes_stream());
        let mut buffer = String::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    let _ = tx.send(Err(e.into())).await;
                    return;
                }
            };
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].trim_end_matches('\r').to_string();
                buffer.drain(..=pos);

                let Some(payload) = line.strip_prefix("data: ") else {
                    continue;
                };
                if payload == "[DONE]" {
                    return;
                }
                let token = match serde_json::from_str::<StreamChunk>(payload) {
                    Ok(parsed) => parsed
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content),
                    Err(e) => {
                        tracing::trace!(error = %e, "skipping unparseable stream line");
                        continue;
                    }
                };
                let Some(token) = token else { continue };
                if !token.is_empty() && tx.send(Ok(token)).await.is_err() {
                    return;
                }
            }
        }
    });

    Box::pin(ReceiverStream::new(rx))
}

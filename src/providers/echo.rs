//! Offline fallback provider
//!
//! Deterministic and network-free: the response is a pure function of
//! the prompt and context, which keeps the pipeline runnable (and
//! testable) with no credentials at all.

use async_trait::async_trait;

use super::{LlmProvider, LlmResponse, TokenStream};
use crate::Result;

/// Echoes the prompt back with a fixed prefix
pub struct EchoProvider {
    prefix: String,
}

impl EchoProvider {
    /// Registry identifier for the fallback backend
    pub const NAME: &'static str = "local-echo";

    /// Create an echo provider with a custom prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn render(&self, prompt: &str, context: Option<&str>) -> String {
        match context {
            Some(context) => format!("{} heard: {prompt} (context: {context})", self.prefix),
            None => format!("{} heard: {prompt}", self.prefix),
        }
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new("Doxibox")
    }
}

#[async_trait]
impl LlmProvider for EchoProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<LlmResponse> {
        Ok(LlmResponse {
            text: self.render(prompt, context),
            provider: Self::NAME.to_string(),
        })
    }

    async fn generate_streaming(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<TokenStream> {
        let words: Vec<Result<String>> = self
            .render(prompt, context)
            .split_whitespace()
            .map(|word| Ok(word.to_string()))
            .collect();
        Ok(Box::pin(tokio_stream::iter(words)))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn test_generate_is_deterministic() {
        let provider = EchoProvider::default();
        let first = provider.generate("tell me a joke", None).await.unwrap();
        let second = provider.generate("tell me a joke", None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.text, "Doxibox heard: tell me a joke");
        assert_eq!(first.provider, "local-echo");
    }

    #[tokio::test]
    async fn test_context_is_appended() {
        let provider = EchoProvider::default();
        let response = provider.generate("plan", Some("agent-mode")).await.unwrap();
        assert_eq!(response.text, "Doxibox heard: plan (context: agent-mode)");
    }

    #[tokio::test]
    async fn test_streaming_reassembles_to_generate_text() {
        let provider = EchoProvider::default();
        let expected = provider.generate("hello there", None).await.unwrap().text;

        let stream = provider.generate_streaming("hello there", None).await.unwrap();
        let tokens: Vec<String> = stream.map(Result::unwrap).collect().await;
        assert_eq!(tokens.join(" "), expected);
    }
}

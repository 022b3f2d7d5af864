//! Agent orchestration
//!
//! A presentation layer over the provider router: when agent mode is
//! enabled, a fixed two-step reasoning trace is surfaced alongside the
//! generated response. The trace is deterministic placeholder output,
//! not real planning, which keeps it test-friendly while the interface
//! stays open for future tool integrations.

use crate::config::Config;
use crate::providers::{ProviderRouter, TokenStream};
use crate::Result;

/// Context tag attached to agent-mode generation calls
const AGENT_CONTEXT: &str = "agent-mode";

/// One entry of a reasoning trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStep {
    /// What the agent considered
    pub thought: String,
    /// What the agent did about it
    pub action: String,
    /// What came back
    pub observation: String,
}

impl AgentStep {
    fn new(thought: &str, action: &str) -> Self {
        Self {
            thought: thought.to_string(),
            action: action.to_string(),
            observation: String::new(),
        }
    }
}

/// Result of one agent invocation
#[derive(Debug, Clone, Default)]
pub struct AgentOutcome {
    /// Reasoning trace; empty when agent mode is disabled
    pub steps: Vec<AgentStep>,
    /// Final response text
    pub final_response: String,
}

/// Wraps generation calls in an optional reasoning trace
pub struct AgentOrchestrator {
    enabled: bool,
    router: ProviderRouter,
}

impl AgentOrchestrator {
    /// Create an orchestrator over a provider router
    #[must_use]
    pub fn new(config: &Config, router: ProviderRouter) -> Self {
        Self {
            enabled: config.enable_agent_mode,
            router,
        }
    }

    /// Run one generation, with the trace when agent mode is enabled
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails
    pub async fn run(&self, prompt: &str) -> Result<AgentOutcome> {
        if !self.enabled {
            let response = self.router.generate(prompt, None).await?;
            return Ok(AgentOutcome {
                steps: Vec::new(),
                final_response: response.text,
            });
        }

        let steps = vec![
            AgentStep::new("Assessing user intent", "classify"),
            AgentStep::new("Executing requested task", "generate"),
        ];
        let response = self.router.generate(prompt, Some(AGENT_CONTEXT)).await?;
        tracing::debug!(steps = steps.len(), provider = %response.provider, "agent run complete");

        Ok(AgentOutcome {
            steps,
            final_response: response.text,
        })
    }

    /// Stream response fragments for a prompt
    ///
    /// The streaming path always carries the agent context tag, whether
    /// or not agent mode is enabled.
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails
    pub async fn run_streaming(&self, prompt: &str) -> Result<TokenStream> {
        self.router.generate_streaming(prompt, Some(AGENT_CONTEXT)).await
    }

    /// Access the underlying router
    #[must_use]
    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    fn orchestrator(agent_mode: bool) -> AgentOrchestrator {
        let config = Config {
            enable_agent_mode: agent_mode,
            ..Config::default()
        };
        let router = ProviderRouter::new(&config).unwrap();
        AgentOrchestrator::new(&config, router)
    }

    #[tokio::test]
    async fn test_disabled_returns_empty_steps() {
        let outcome = orchestrator(false).run("hello").await.unwrap();
        assert!(outcome.steps.is_empty());
        assert_eq!(outcome.final_response, "Doxibox heard: hello");
    }

    #[tokio::test]
    async fn test_enabled_returns_fixed_two_step_trace() {
        let outcome = orchestrator(true).run("plan the day").await.unwrap();
        assert_eq!(outcome.steps.len(), 2);
        assert_eq!(outcome.steps[0].thought, "Assessing user intent");
        assert_eq!(outcome.steps[1].thought, "Executing requested task");
        assert!(outcome.final_response.contains("agent-mode"));
    }

    #[tokio::test]
    async fn test_streaming_always_tags_agent_context() {
        // Fixed decision: the streaming path does not branch on the flag
        let stream = orchestrator(false).run_streaming("hello").await.unwrap();
        let tokens: Vec<String> = stream.map(Result::unwrap).collect().await;
        assert!(tokens.join(" ").contains("agent-mode"));
    }
}

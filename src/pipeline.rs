//! Pipeline driver
//!
//! Wires configuration, utterance source, wake word detection, agent
//! orchestration, and voice output into one strictly sequential pass:
//! capture, detect, generate on trigger, speak. The accumulated output
//! log is the return value of a run.

use crate::agent::AgentOrchestrator;
use crate::config::{Config, ConfigOverrides, InputMode};
use crate::providers::ProviderRouter;
use crate::voice::{SpeechToText, UtteranceSource, VoiceOutput, WakeWordDetector};
use crate::{Error, Result};

/// A configured assistant pipeline
pub struct Pipeline {
    config: Config,
    agent: AgentOrchestrator,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Build a pipeline, performing all fail-fast checks
    ///
    /// Ensures storage locations exist and constructs the provider
    /// router (which validates any backends named in
    /// `provider_options`).
    ///
    /// # Errors
    ///
    /// Returns error if directory creation or router construction fails
    pub fn new(config: Config) -> Result<Self> {
        config.ensure_dirs()?;
        let router = ProviderRouter::new(&config)?;
        let agent = AgentOrchestrator::new(&config, router);

        tracing::debug!(
            wake_word = %config.wake_word,
            provider = %config.llm_provider,
            agent_mode = config.enable_agent_mode,
            "pipeline initialized"
        );

        Ok(Self { config, agent })
    }

    /// Run one pass over the utterance stream
    ///
    /// With `prompts`, utterances are simulated from the list in order;
    /// without, microphone mode is used (and must be configured). Each
    /// triggered wake event produces exactly one spoken/logged line;
    /// non-triggered events produce nothing.
    ///
    /// # Errors
    ///
    /// Returns error if capture, generation, or output fails; partial
    /// output is not returned on failure
    pub async fn run(&self, prompts: Option<Vec<String>>) -> Result<Vec<String>> {
        let detector = WakeWordDetector::new(&self.config.wake_word);
        let mut output = VoiceOutput::new(&self.config);

        let mut source = match prompts {
            Some(prompts) => UtteranceSource::from_prompts(prompts),
            None => {
                if self.config.input_mode != InputMode::Microphone {
                    return Err(Error::Config(
                        "no prompts supplied and input mode is not 'microphone'".to_string(),
                    ));
                }
                let stt = SpeechToText::new(&self.config)?;
                UtteranceSource::microphone(&self.config, Some(stt))?
            }
        };

        while let Some(utterance) = source.next_utterance().await? {
            let event = detector.observe(&utterance.text);
            if !event.triggered {
                tracing::trace!(text = %event.text, "utterance without wake word");
                continue;
            }
            let outcome = self.agent.run(&event.text).await?;
            output.speak(&outcome.final_response).await?;
        }

        Ok(output.into_history())
    }

    /// The configuration this pipeline was built with
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Build a pipeline from overrides and run it once
///
/// Convenience entry point mirroring the CLI: construct the
/// configuration, run a single pass, and return the output log.
///
/// # Errors
///
/// Returns error if pipeline construction or the run fails
pub async fn run_pipeline(
    prompts: Option<Vec<String>>,
    overrides: Option<ConfigOverrides>,
) -> Result<Vec<String>> {
    let config = Config::from_overrides(overrides);
    let pipeline = Pipeline::new(config)?;
    pipeline.run(prompts).await
}

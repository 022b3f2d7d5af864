//! Text-to-speech synthesis
//!
//! Delegates to the hosted OpenAI speech API and returns MP3 bytes for
//! playback. Model and voice can be tuned through the openai option bag.

use crate::config::Config;
use crate::{Error, Result};

const SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";
const DEFAULT_MODEL: &str = "tts-1";
const DEFAULT_VOICE: &str = "alloy";
const DEFAULT_SPEED: f32 = 1.0;

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
    speed: f32,
}

impl TextToSpeech {
    /// Create a synthesizer from configuration
    ///
    /// # Errors
    ///
    /// Returns error if no API key can be resolved
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key_for("openai", "OPENAI_API_KEY")
            .ok_or_else(|| {
                Error::Dependency(
                    "text-to-speech requires an OpenAI API key; set OPENAI_API_KEY or \
                     provider_options.openai.api_key"
                        .to_string(),
                )
            })?;

        let options = config.provider_options.get("openai");
        let model = options
            .and_then(|opts| opts.get("tts_model"))
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let voice = options
            .and_then(|opts| opts.get("tts_voice"))
            .cloned()
            .unwrap_or_else(|| DEFAULT_VOICE.to_string());
        let speed = options
            .and_then(|opts| opts.get("tts_speed"))
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_SPEED);

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            voice,
            speed,
        })
    }

    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if the synthesis call fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        tracing::debug!(chars = text.len(), model = %self.model, voice = %self.voice, "starting synthesis");

        let response = self
            .client
            .post(SPEECH_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&SpeechRequest {
                model: &self.model,
                input: text,
                voice: &self.voice,
                speed: self.speed,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "speech API error");
            return Err(Error::Tts(format!("speech API error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_tune_voice() {
        let mut config = Config::default();
        config.provider_options.insert(
            "openai".to_string(),
            std::collections::HashMap::from([
                ("api_key".to_string(), "sk-test".to_string()),
                ("tts_voice".to_string(), "nova".to_string()),
                ("tts_speed".to_string(), "1.25".to_string()),
            ]),
        );
        let tts = TextToSpeech::new(&config).unwrap();
        assert_eq!(tts.model, "tts-1");
        assert_eq!(tts.voice, "nova");
        assert!((tts.speed - 1.25).abs() < f32::EPSILON);
    }
}

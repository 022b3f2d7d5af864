//! Speech-to-text transcription
//!
//! Delegates to the hosted Whisper transcription API; there is no local
//! model. Credentials are validated at construction so a misconfigured
//! microphone run fails before any audio is captured.

use std::path::Path;

use crate::config::Config;
use crate::{Error, Result};

const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Response from the transcription API
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes captured audio to text
#[derive(Debug)]
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    model: String,
    language: String,
}

impl SpeechToText {
    /// Create a transcriber from configuration
    ///
    /// # Errors
    ///
    /// Returns error if no API key can be resolved
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key_for("openai", "OPENAI_API_KEY")
            .ok_or_else(|| {
                Error::Dependency(
                    "transcription requires an OpenAI API key; set OPENAI_API_KEY or \
                     provider_options.openai.api_key"
                        .to_string(),
                )
            })?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model_size.clone(),
            language: config.language.clone(),
        })
    }

    /// Transcribe a WAV file on disk
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or transcription fails
    pub async fn transcribe_file(&self, path: &Path) -> Result<String> {
        let audio = tokio::fs::read(path).await?;
        self.transcribe(audio).await
    }

    /// Transcribe WAV bytes
    ///
    /// # Errors
    ///
    /// Returns error if the transcription call fails
    pub async fn transcribe(&self, audio: Vec<u8>) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), model = %self.model, "starting transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name("capture.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Stt(format!(
                "transcription API error {status}: {body}"
            )));
        }

        let result: TranscriptionResponse = response.json().await?;
        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text.trim().to_string())
    }
}

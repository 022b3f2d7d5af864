//! Utterance sources
//!
//! Produces the ordered utterance sequence a pipeline run consumes:
//! either an explicit prompt list (simulation/testing) or an interactive
//! capture-and-transcribe loop over the microphone.

use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, InputMode};
use crate::voice::capture::{AudioCapture, samples_to_wav};
use crate::voice::stt::SpeechToText;
use crate::{Error, Result};

/// File name for the current capture under the cache directory
const CAPTURE_FILE: &str = "capture.wav";

/// One unit of captured input
///
/// Text is filled directly in prompt mode, or via transcription for
/// microphone recordings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Utterance text
    pub text: String,
    /// Capture file backing this utterance, when recorded
    pub path: Option<PathBuf>,
    /// Capture sample rate, when recorded
    pub sample_rate: Option<u32>,
}

impl Utterance {
    /// Build a metadata-free utterance from plain text
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
            sample_rate: None,
        }
    }
}

enum SourceKind {
    Prompts(std::vec::IntoIter<String>),
    Microphone {
        capture: AudioCapture,
        stt: SpeechToText,
        cache_dir: PathBuf,
        sample_rate: u32,
        channels: u16,
        max_record_seconds: u64,
    },
}

/// Ordered sequence of utterances for one pipeline run
pub struct UtteranceSource {
    kind: SourceKind,
}

impl std::fmt::Debug for UtteranceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match &self.kind {
            SourceKind::Prompts(_) => "Prompts",
            SourceKind::Microphone { .. } => "Microphone",
        };
        f.debug_struct("UtteranceSource")
            .field("kind", &variant)
            .finish()
    }
}

impl UtteranceSource {
    /// Simulation mode: one utterance per prompt, in order
    #[must_use]
    pub fn from_prompts(prompts: Vec<String>) -> Self {
        Self {
            kind: SourceKind::Prompts(prompts.into_iter()),
        }
    }

    /// Microphone mode: capture, write to the cache dir, transcribe
    ///
    /// # Errors
    ///
    /// Returns error if the configured input mode is not "microphone",
    /// if no transcription backend is supplied, or if the input device
    /// cannot be opened
    pub fn microphone(config: &Config, stt: Option<SpeechToText>) -> Result<Self> {
        if config.input_mode != InputMode::Microphone {
            return Err(Error::Config(
                "input mode is not 'microphone'; provide prompts or switch modes".to_string(),
            ));
        }
        let stt = stt.ok_or_else(|| {
            Error::Config("microphone mode requires a transcription backend".to_string())
        })?;
        let capture = AudioCapture::new(config)?;

        println!("Press Enter to record. Type 'q' and Enter to quit.");

        Ok(Self {
            kind: SourceKind::Microphone {
                capture,
                stt,
                cache_dir: config.cache_dir.clone(),
                sample_rate: config.sample_rate,
                channels: config.channels,
                max_record_seconds: config.max_record_seconds,
            },
        })
    }

    /// Yield the next utterance, or `None` at exhaustion
    ///
    /// In microphone mode this prompts on stdin, captures, and
    /// transcribes; a literal `q` (or stdin EOF) ends the sequence.
    ///
    /// # Errors
    ///
    /// Returns error if capture, file IO, or transcription fails
    pub async fn next_utterance(&mut self) -> Result<Option<Utterance>> {
        match &mut self.kind {
            SourceKind::Prompts(prompts) => Ok(prompts.next().map(Utterance::from_text)),
            SourceKind::Microphone {
                capture,
                stt,
                cache_dir,
                sample_rate,
                channels,
                max_record_seconds,
            } => {
                print!(
                    ">>> Ready. Hit Enter to capture up to {max_record_seconds}s (q to quit): "
                );
                std::io::stdout().flush()?;

                let mut line = String::new();
                if std::io::stdin().read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                if line.trim().eq_ignore_ascii_case("q") {
                    return Ok(None);
                }

                let samples = capture.record_for(*max_record_seconds)?;
                let wav = samples_to_wav(&samples, *sample_rate, *channels)?;
                let path = cache_dir.join(CAPTURE_FILE);
                tokio::fs::write(&path, &wav).await?;

                let text = stt.transcribe_file(&path).await?;
                Ok(Some(Utterance {
                    text,
                    path: Some(path),
                    sample_rate: Some(*sample_rate),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prompts_yield_in_order() {
        let mut source =
            UtteranceSource::from_prompts(vec!["one".to_string(), "two".to_string()]);

        let first = source.next_utterance().await.unwrap().unwrap();
        assert_eq!(first.text, "one");
        assert_eq!(first.path, None);
        assert_eq!(first.sample_rate, None);

        assert_eq!(source.next_utterance().await.unwrap().unwrap().text, "two");
        assert!(source.next_utterance().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_prompt_list_is_exhausted_immediately() {
        let mut source = UtteranceSource::from_prompts(Vec::new());
        assert!(source.next_utterance().await.unwrap().is_none());
    }

    #[test]
    fn test_microphone_requires_microphone_mode() {
        let config = Config::default();
        let err = UtteranceSource::microphone(&config, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_microphone_requires_transcriber() {
        let config = Config {
            input_mode: InputMode::Microphone,
            ..Config::default()
        };
        let err = UtteranceSource::microphone(&config, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("transcription backend"));
    }
}

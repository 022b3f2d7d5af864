//! Spoken/logged output sink
//!
//! Every response becomes one rendered line in an append-only run log;
//! the log is the pipeline's return value. In TTS mode the synthesis
//! engine and output device are constructed lazily on first use and
//! cached for the sink's lifetime.

use crate::config::{Config, OutputMode};
use crate::voice::playback::AudioPlayback;
use crate::voice::tts::TextToSpeech;
use crate::Result;

struct SpeechEngine {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

/// Text logging plus optional spoken synthesis
pub struct VoiceOutput {
    config: Config,
    history: Vec<String>,
    queued: Vec<String>,
    engine: Option<SpeechEngine>,
}

impl VoiceOutput {
    /// Create an output sink for one pipeline run
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            history: Vec::new(),
            queued: Vec::new(),
            engine: None,
        }
    }

    /// Append a voice line; in TTS mode, speak it and block until done
    ///
    /// # Errors
    ///
    /// Returns error if the speech engine cannot be loaded or synthesis
    /// or playback fails
    pub async fn speak(&mut self, text: &str) -> Result<()> {
        let rendered = format!("[voice:{}] {}", self.config.language, text);
        tracing::debug!(line = %rendered, "output line");
        self.history.push(rendered);

        if self.config.output_mode == OutputMode::Tts {
            let engine = self.engine()?;
            let audio = engine.tts.synthesize(text).await?;
            engine.playback.play_mp3(&audio)?;
        }
        Ok(())
    }

    /// Append notification lines, deferring synthesis to one flush
    ///
    /// Each note is logged and (in TTS mode) queued without blocking;
    /// a single blocking flush runs at the end when anything was queued
    /// and the log is non-empty.
    ///
    /// # Errors
    ///
    /// Returns error if the speech engine cannot be loaded or the flush
    /// fails
    pub async fn play_notifications<I>(&mut self, notes: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        for note in notes {
            self.history.push(format!("[notification] {note}"));
            if self.config.output_mode == OutputMode::Tts {
                self.queued.push(note);
            }
        }
        if !self.queued.is_empty() && !self.history.is_empty() {
            self.flush_queued().await?;
        }
        Ok(())
    }

    /// View of the run log so far
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Consume the sink, yielding the full run log
    #[must_use]
    pub fn into_history(self) -> Vec<String> {
        self.history
    }

    async fn flush_queued(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.queued);
        let engine = self.engine()?;
        for note in &pending {
            let audio = engine.tts.synthesize(note).await?;
            engine.playback.play_mp3(&audio)?;
        }
        Ok(())
    }

    fn engine(&mut self) -> Result<&SpeechEngine> {
        if self.engine.is_none() {
            let tts = TextToSpeech::new(&self.config)?;
            let playback = AudioPlayback::new()?;
            self.engine = Some(SpeechEngine { tts, playback });
            tracing::debug!("speech engine loaded");
        }
        self.engine
            .as_ref()
            .ok_or_else(|| crate::Error::Tts("speech engine unavailable".to_string()))
    }
}

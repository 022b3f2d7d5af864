//! Wake word detection
//!
//! Tags utterances with a triggered flag via case-insensitive substring
//! matching. The interface stays narrow so a DSP-based detector can be
//! swapped in without touching consumers.

/// An utterance annotated with whether it contained the wake word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeEvent {
    /// Original utterance text, unmodified
    pub text: String,
    /// Whether the wake word was present
    pub triggered: bool,
}

/// Detects the configured wake word in utterance text
pub struct WakeWordDetector {
    wake_word: String,
}

impl WakeWordDetector {
    /// Create a detector for one wake word
    ///
    /// The wake word is lower-cased and trimmed once here. An empty wake
    /// word trivially matches every utterance; that is a configuration
    /// smell, not an error.
    #[must_use]
    pub fn new(wake_word: &str) -> Self {
        let normalized = wake_word.trim().to_lowercase();
        if normalized.is_empty() {
            tracing::warn!("empty wake word configured; every utterance will trigger");
        }
        tracing::debug!(wake_word = %normalized, "wake word detector initialized");
        Self {
            wake_word: normalized,
        }
    }

    /// Produce the wake event for one utterance
    ///
    /// One event per input, in input order; non-triggered events are
    /// still produced for the caller to filter.
    #[must_use]
    pub fn observe(&self, text: &str) -> WakeEvent {
        let normalized = text.trim().to_lowercase();
        let triggered = normalized.contains(&self.wake_word);
        if triggered {
            tracing::info!(wake_word = %self.wake_word, text, "wake word detected");
        }
        WakeEvent {
            text: text.to_string(),
            triggered,
        }
    }

    /// Get the normalized wake word
    #[must_use]
    pub fn wake_word(&self) -> &str {
        &self.wake_word
    }
}

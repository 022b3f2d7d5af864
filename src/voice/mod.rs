//! Voice processing module
//!
//! Utterance capture (text or microphone), wake word detection,
//! transcription, and spoken/logged output. LLM routing lives in
//! `providers` (see `pipeline.rs`).

mod capture;
mod input;
mod output;
mod playback;
mod stt;
mod tts;
mod wake_word;

pub use capture::{AudioCapture, samples_to_wav};
pub use input::{Utterance, UtteranceSource};
pub use output::VoiceOutput;
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use wake_word::{WakeEvent, WakeWordDetector};

//! Doxibox - wake-word voice assistant pipeline
//!
//! This library provides the core functionality of the assistant:
//! - Utterance capture (text simulation or microphone + transcription)
//! - Wake word detection
//! - LLM provider routing with a deterministic offline fallback
//! - Optional agent-mode reasoning traces
//! - Spoken/logged output
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Utterance Source                     │
//! │        prompt list  │  microphone + STT             │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │   Wake Word  →  Agent Orchestrator  →  Voice Output │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Provider Router                       │
//! │   local-echo  │  openai  │  openrouter              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The whole pipeline is a single sequential pass; see
//! [`pipeline::run_pipeline`] for the one-call entry point.

pub mod agent;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod voice;

pub use agent::{AgentOrchestrator, AgentOutcome, AgentStep};
pub use config::{Config, ConfigOverrides, InputMode, OutputMode};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, run_pipeline};
pub use providers::{
    EchoProvider, LlmProvider, LlmResponse, OpenAiProvider, OpenRouterProvider, ProviderRouter,
    TokenStream,
};
pub use voice::{
    AudioCapture, AudioPlayback, SpeechToText, TextToSpeech, Utterance, UtteranceSource,
    VoiceOutput, WakeEvent, WakeWordDetector, samples_to_wav,
};

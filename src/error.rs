//! Error types for the Doxibox pipeline

use thiserror::Error;

/// Result type alias for Doxibox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Doxibox pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// An optional external capability could not be loaded.
    /// The message carries a remediation hint.
    #[error("dependency unavailable: {0}")]
    Dependency(String),

    /// LLM provider error
    #[error("provider error: {0}")]
    Provider(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

//! Configuration for the Doxibox pipeline
//!
//! A `Config` is immutable for the duration of a pipeline run. Callers
//! construct it from an all-optional [`ConfigOverrides`] overlay; unset
//! fields take fixed defaults. An optional TOML file under the platform
//! config directory provides a persistent overlay, and environment
//! variables take precedence over file values for API keys.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::Result;

/// Where utterances come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Simulated utterances from an explicit prompt list
    #[default]
    Text,
    /// Live microphone capture plus transcription
    Microphone,
}

/// How responses are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Log lines only
    #[default]
    Text,
    /// Log lines plus spoken synthesis
    Tts,
}

/// Runtime configuration for the assistant
#[derive(Debug, Clone)]
pub struct Config {
    /// Wake word that activates the assistant
    pub wake_word: String,

    /// Transcription model identifier passed to the STT backend
    pub model_size: String,

    /// Selected LLM provider; unknown names fall back to "local-echo"
    pub llm_provider: String,

    /// Language code used for the output voice tag and transcription
    pub language: String,

    /// Directory for transcripts, created on demand
    pub transcript_dir: PathBuf,

    /// Directory for capture files, created on demand
    pub cache_dir: PathBuf,

    /// Per-provider option bags; an entry registers the optional backend
    pub provider_options: HashMap<String, HashMap<String, String>>,

    /// Input device selector ("auto" or an explicit device name)
    pub device: String,

    /// Surface a reasoning trace alongside responses
    pub enable_agent_mode: bool,

    /// Utterance source selection
    pub input_mode: InputMode,

    /// Response emission selection
    pub output_mode: OutputMode,

    /// Capture sample rate in Hz
    pub sample_rate: u32,

    /// Capture channel count
    pub channels: u16,

    /// Upper bound on a single microphone capture
    pub max_record_seconds: u64,

    /// Reserved for a future energy-based capture gate
    pub noise_floor: f32,

    /// Reserved for a future silence-based capture cutoff
    pub silence_timeout_s: f32,

    /// Log level hint for embedders; the CLI drives its own filter
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wake_word: "doxi".to_string(),
            model_size: "whisper-1".to_string(),
            llm_provider: "local-echo".to_string(),
            language: "en".to_string(),
            transcript_dir: PathBuf::from("transcripts"),
            cache_dir: PathBuf::from(".cache/doxibox"),
            provider_options: HashMap::new(),
            device: "auto".to_string(),
            enable_agent_mode: false,
            input_mode: InputMode::Text,
            output_mode: OutputMode::Text,
            sample_rate: 16000,
            channels: 1,
            max_record_seconds: 15,
            noise_floor: 0.01,
            silence_timeout_s: 7.0,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Build a configuration from an optional partial overlay
    #[must_use]
    pub fn from_overrides(overrides: Option<ConfigOverrides>) -> Self {
        let o = overrides.unwrap_or_default();
        let d = Self::default();
        Self {
            wake_word: o.wake_word.unwrap_or(d.wake_word),
            model_size: o.model_size.unwrap_or(d.model_size),
            llm_provider: o.llm_provider.unwrap_or(d.llm_provider),
            language: o.language.unwrap_or(d.language),
            transcript_dir: o.transcript_dir.unwrap_or(d.transcript_dir),
            cache_dir: o.cache_dir.unwrap_or(d.cache_dir),
            provider_options: o.provider_options.unwrap_or(d.provider_options),
            device: o.device.unwrap_or(d.device),
            enable_agent_mode: o.enable_agent_mode.unwrap_or(d.enable_agent_mode),
            input_mode: o.input_mode.unwrap_or(d.input_mode),
            output_mode: o.output_mode.unwrap_or(d.output_mode),
            sample_rate: o.sample_rate.unwrap_or(d.sample_rate),
            channels: o.channels.unwrap_or(d.channels),
            max_record_seconds: o.max_record_seconds.unwrap_or(d.max_record_seconds),
            noise_floor: o.noise_floor.unwrap_or(d.noise_floor),
            silence_timeout_s: o.silence_timeout_s.unwrap_or(d.silence_timeout_s),
            log_level: o.log_level.unwrap_or(d.log_level),
        }
    }

    /// Create the transcript and cache directories if absent
    ///
    /// Idempotent; a no-op when both already exist.
    ///
    /// # Errors
    ///
    /// Returns error if a directory cannot be created
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.transcript_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }

    /// Resolve the API key for a provider, env var first
    ///
    /// Falls back to the `api_key` entry of the provider's option bag.
    #[must_use]
    pub fn api_key_for(&self, provider: &str, env_var: &str) -> Option<String> {
        std::env::var(env_var)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| {
                self.provider_options
                    .get(provider)
                    .and_then(|opts| opts.get("api_key"))
                    .filter(|key| !key.is_empty())
                    .cloned()
            })
    }
}

/// Partial configuration overlay
///
/// All fields are optional; the struct deserializes from TOML and maps
/// onto [`Config`] via [`Config::from_overrides`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub wake_word: Option<String>,
    pub model_size: Option<String>,
    pub llm_provider: Option<String>,
    pub language: Option<String>,
    pub transcript_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub provider_options: Option<HashMap<String, HashMap<String, String>>>,
    pub device: Option<String>,
    pub enable_agent_mode: Option<bool>,
    pub input_mode: Option<InputMode>,
    pub output_mode: Option<OutputMode>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub max_record_seconds: Option<u64>,
    pub noise_floor: Option<f32>,
    pub silence_timeout_s: Option<f32>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Load an overlay from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load the overlay from the platform config directory, if present
    ///
    /// Looks for `config.toml` under the per-user config dir.
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be read or parsed
    pub fn load_default_file() -> Result<Option<Self>> {
        let Some(dirs) = ProjectDirs::from("", "", "doxibox") else {
            return Ok(None);
        };
        let path = dirs.config_dir().join("config.toml");
        if !path.exists() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "loading config overlay");
        Ok(Some(Self::load_file(&path)?))
    }
}

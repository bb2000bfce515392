//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML
//! tables; every field has a serde default so partial files load
//! cleanly.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Pipeline processing settings.
    #[serde(default)]
    pub processing: ProcessingSettings,

    /// Recognition service settings.
    #[serde(default)]
    pub recognition: RecognitionSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Filesystem locations used by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder for temporary artifacts.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            temp_root: default_temp_root(),
        }
    }
}

/// Pipeline processing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSettings {
    /// Size budget above which video is re-encoded before extraction.
    /// Distinct from (and smaller than) the transport upload limit.
    #[serde(default = "default_size_budget")]
    pub size_budget_bytes: u64,

    /// Default language hint for recognition.
    #[serde(default = "default_language")]
    pub language: String,

    /// Sample rate audio is decoded to before recognition.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Bitrate for the extracted audio artifact.
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate_kbps: u32,
}

fn default_size_budget() -> u64 {
    45 * 1024 * 1024
}

fn default_language() -> String {
    "ru".to_string()
}

fn default_sample_rate() -> u32 {
    16_000
}

fn default_audio_bitrate() -> u32 {
    128
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            size_budget_bytes: default_size_budget(),
            language: default_language(),
            sample_rate: default_sample_rate(),
            audio_bitrate_kbps: default_audio_bitrate(),
        }
    }
}

/// Recognition service endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionSettings {
    /// Endpoint URL for the speech service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent with each request. Empty means none.
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    crate::recognition::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default tracing filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

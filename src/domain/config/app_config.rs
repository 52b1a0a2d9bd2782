//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;
use crate::domain::voice::OutputDevice;

/// Default recording sample rate (speech-optimized)
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Audio device configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub output: Option<String>,
    pub earpiece_device: Option<String>,
    pub sample_rate: Option<u32>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub base_dir: Option<String>,
    pub record_duration: Option<String>,
    pub log_level: Option<String>,
    pub audio: Option<AudioConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            base_dir: None,
            record_duration: Some("10s".to_string()),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            audio: Some(AudioConfig {
                output: Some("speaker".to_string()),
                earpiece_device: None,
                sample_rate: Some(DEFAULT_SAMPLE_RATE),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            base_dir: other.base_dir.or(self.base_dir),
            record_duration: other.record_duration.or(self.record_duration),
            log_level: other.log_level.or(self.log_level),
            audio: Self::merge_audio_config(self.audio, other.audio),
        }
    }

    fn merge_audio_config(
        base: Option<AudioConfig>,
        other: Option<AudioConfig>,
    ) -> Option<AudioConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(AudioConfig {
                output: o.output.or(b.output),
                earpiece_device: o.earpiece_device.or(b.earpiece_device),
                sample_rate: o.sample_rate.or(b.sample_rate),
            }),
        }
    }

    /// Base directory for relative sources, or the current directory
    pub fn base_dir_or_default(&self) -> PathBuf {
        self.base_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get record_duration as parsed Duration, or default if not set/invalid
    pub fn record_duration_or_default(&self) -> Duration {
        self.record_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_duration)
    }

    /// Get log level, or "warn" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Get the initial output route, or speaker if not set/invalid
    pub fn output_or_default(&self) -> OutputDevice {
        self.audio
            .as_ref()
            .and_then(|a| a.output.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Name of the output device used for the earpiece route
    pub fn earpiece_device(&self) -> Option<&str> {
        self.audio
            .as_ref()
            .and_then(|a| a.earpiece_device.as_deref())
    }

    /// Get recording sample rate, or 16kHz if not set
    pub fn sample_rate_or_default(&self) -> u32 {
        self.audio
            .as_ref()
            .and_then(|a| a.sample_rate)
            .filter(|rate| *rate > 0)
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }
}

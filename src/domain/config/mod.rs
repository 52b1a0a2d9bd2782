//! Configuration value objects

mod app_config;

pub use app_config::{AppConfig, AudioConfig, DEFAULT_LOG_LEVEL, DEFAULT_SAMPLE_RATE};

//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, AudioConfig};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;
use crate::domain::voice::OutputDevice;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS, VALID_LOG_LEVELS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    presenter.output(read_value(&config, key).as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Write a validated value into the config
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "base_dir" => config.base_dir = Some(value.to_string()),
        "record_duration" => config.record_duration = Some(value.to_string()),
        "log_level" => config.log_level = Some(value.to_lowercase()),
        "audio.output" => audio_mut(config).output = Some(value.to_lowercase()),
        "audio.earpiece_device" => audio_mut(config).earpiece_device = Some(value.to_string()),
        "audio.sample_rate" => audio_mut(config).sample_rate = Some(parse_sample_rate(key, value)?),
        _ => return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Key cannot be set".to_string(),
        }),
    }
    Ok(())
}

fn audio_mut(config: &mut AppConfig) -> &mut AudioConfig {
    config.audio.get_or_insert_with(AudioConfig::default)
}

/// Current value of a key, formatted for display
fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    let audio = config.audio.as_ref();
    match key {
        "base_dir" => config.base_dir.clone(),
        "record_duration" => config.record_duration.clone(),
        "log_level" => config.log_level.clone(),
        "audio.output" => audio.and_then(|a| a.output.clone()),
        "audio.earpiece_device" => audio.and_then(|a| a.earpiece_device.clone()),
        "audio.sample_rate" => audio.and_then(|a| a.sample_rate).map(|r| r.to_string()),
        _ => None,
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "record_duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "audio.output" => {
            value
                .parse::<OutputDevice>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "log_level" => {
            let lower = value.to_lowercase();
            if !VALID_LOG_LEVELS.contains(&lower.as_str()) {
                return Err(invalid(format!(
                    "Invalid value '{}'. Valid options: {}",
                    value,
                    VALID_LOG_LEVELS.join(", ")
                )));
            }
        }
        "audio.sample_rate" => {
            parse_sample_rate(key, value)?;
        }
        "base_dir" | "audio.earpiece_device" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Sample rates accepted for recording (8 kHz to 192 kHz)
fn parse_sample_rate(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|rate| (8_000..=192_000).contains(rate))
        .ok_or_else(|| ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be a sample rate between 8000 and 192000".to_string(),
        })
}

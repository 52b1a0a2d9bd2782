//! App runners for the play, record, duration and exec subcommands

use std::process::ExitCode;
use std::time::{Duration as StdDuration, Instant};

use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::application::ports::{ConfigStore, RoutingError};
use crate::application::{VoiceHandler, VoiceHandlerError};
use crate::domain::config::AppConfig;
use crate::domain::recording::{human_readable_size, Duration};
use crate::domain::voice::{CommandError, VoiceCommand, VoiceReply, VoiceState, ACTIONS};
use crate::infrastructure::{
    CpalAudioRouting, FsResourceResolver, NativeVoiceFactory, XdgConfigStore,
};

use super::presenter::Presenter;
use super::signals::{ControlSignal, SignalListener};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Session id used by the play/record/duration subcommands
pub const CLI_SESSION: &str = "cli";

const POLL_INTERVAL: StdDuration = StdDuration::from_millis(100);

/// Handler wired to the native adapters
pub type NativeHandler = VoiceHandler<NativeVoiceFactory, FsResourceResolver, CpalAudioRouting>;

/// Build a handler from merged config.
/// Fails if the configured route names an output device that is not present.
pub fn build_handler(config: &AppConfig) -> Result<NativeHandler, RoutingError> {
    let routing = CpalAudioRouting::open(
        config.output_or_default(),
        config.earpiece_device().map(str::to_string),
    )?;
    let factory = NativeVoiceFactory::new(routing.clone(), config.sample_rate_or_default());
    let resolver = FsResourceResolver::new(config.base_dir_or_default());

    Ok(VoiceHandler::new(factory, resolver, routing))
}

/// Install the stderr tracing subscriber.
/// RUST_LOG wins, then `--verbose`, then the configured level.
pub fn init_tracing(verbose: bool, config: &AppConfig) {
    let fallback = if verbose {
        "debug"
    } else {
        config.log_level_or_default()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config(cli_config: AppConfig, presenter: &Presenter) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            presenter.warn(&format!("Ignoring config file: {}", e));
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Play a source in the foreground
pub async fn run_play(
    source: &str,
    volume: Option<&str>,
    seek_ms: Option<i64>,
    config: &AppConfig,
) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut handler = match build_handler(config) {
        Ok(handler) => handler,
        Err(e) => return report_error(&presenter, &VoiceHandlerError::from(e)),
    };

    let mut signals = match SignalListener::new() {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let target = handler.resolve_target(source);
    handler.create(CLI_SESSION, &target);

    let mut setup = Vec::new();
    if let Some(level) = volume {
        setup.push(VoiceCommand::SetVolume {
            id: CLI_SESSION.to_string(),
            level: level.to_string(),
        });
    }
    if let Some(milliseconds) = seek_ms {
        setup.push(VoiceCommand::SeekTo {
            id: CLI_SESSION.to_string(),
            milliseconds,
        });
    }
    setup.push(VoiceCommand::StartPlaying {
        id: CLI_SESSION.to_string(),
        target: source.to_string(),
    });

    for command in setup {
        if let Err(e) = handler.execute(command) {
            return report_error(&presenter, &e);
        }
    }

    match drive_playback(&mut handler, CLI_SESSION, &mut signals, &mut presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.stop_spinner();
            report_error(&presenter, &e)
        }
    }
}

/// Record to a target for a fixed duration or until Ctrl+C
pub async fn run_record(target: &str, duration: Duration, config: &AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut handler = match build_handler(config) {
        Ok(handler) => handler,
        Err(e) => return report_error(&presenter, &VoiceHandlerError::from(e)),
    };

    let mut signals = match SignalListener::new() {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let path = handler.resolve_target(target);
    let start = VoiceCommand::StartRecording {
        id: CLI_SESSION.to_string(),
        target: target.to_string(),
    };
    if let Err(e) = handler.execute(start) {
        return report_error(&presenter, &e);
    }

    if let Err(e) =
        drive_recording(&mut handler, CLI_SESSION, duration, &mut signals, &mut presenter).await
    {
        presenter.stop_spinner();
        return report_error(&presenter, &e);
    }

    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    presenter.success(&format!(
        "Saved {} ({})",
        path,
        human_readable_size(size)
    ));
    ExitCode::from(EXIT_SUCCESS)
}

/// Print the duration of a source
pub async fn run_duration(source: &str, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let mut handler = match build_handler(config) {
        Ok(handler) => handler,
        Err(e) => return report_error(&presenter, &VoiceHandlerError::from(e)),
    };

    let target = handler.resolve_target(source);
    let query = VoiceCommand::GetDuration {
        id: CLI_SESSION.to_string(),
        target,
    };

    match handler.execute(query) {
        Ok(VoiceReply::Duration(secs)) if secs >= 0.0 => {
            presenter.output(&format!("{:.3}", secs));
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(_) => {
            presenter.error(&format!("Duration of {} is unknown", source));
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => report_error(&presenter, &e),
    }
}

/// Run one raw host action and print its JSON reply.
///
/// Each invocation is its own process, so start actions run to completion
/// (playback to its end, recording for the configured duration) before the
/// reply is printed.
pub async fn run_exec(action: &str, args: &[String], config: &AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut handler = match build_handler(config) {
        Ok(handler) => handler,
        Err(e) => return report_error(&presenter, &VoiceHandlerError::from(e)),
    };

    let values: Vec<Value> = args.iter().map(|arg| parse_exec_arg(arg)).collect();
    let command = match VoiceCommand::decode(action, &values) {
        Ok(command) => command,
        Err(e) => return report_error(&presenter, &VoiceHandlerError::from(e)),
    };
    debug!(?command, "exec");

    let follow_up = command.clone();
    let reply = match handler.execute(command) {
        Ok(reply) => reply,
        Err(e) => return report_error(&presenter, &e),
    };

    let completed = match follow_up {
        VoiceCommand::StartPlaying { ref id, .. } | VoiceCommand::StartRecording { ref id, .. } => {
            let mut signals = match SignalListener::new() {
                Ok(signals) => signals,
                Err(e) => {
                    presenter.error(&format!("Failed to setup signal handler: {}", e));
                    return ExitCode::from(EXIT_ERROR);
                }
            };
            if matches!(follow_up, VoiceCommand::StartPlaying { .. }) {
                drive_playback(&mut handler, id, &mut signals, &mut presenter).await
            } else {
                let limit = config.record_duration_or_default();
                drive_recording(&mut handler, id, limit, &mut signals, &mut presenter).await
            }
        }
        _ => Ok(()),
    };

    if let Err(e) = completed {
        presenter.stop_spinner();
        return report_error(&presenter, &e);
    }

    presenter.output(&reply.to_json().to_string());
    ExitCode::from(EXIT_SUCCESS)
}

/// Decode a CLI argument as a JSON literal, falling back to a plain string
pub fn parse_exec_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}

/// Wait for playback to finish, routing phone signals into the handler
async fn drive_playback(
    handler: &mut NativeHandler,
    id: &str,
    signals: &mut SignalListener,
    presenter: &mut Presenter,
) -> Result<(), VoiceHandlerError> {
    let source = handler
        .session(id)
        .map(|session| session.source().to_string())
        .unwrap_or_default();
    let total_secs = handler.duration(id, &source);
    let total_ms = if total_secs > 0.0 {
        (total_secs * 1000.0) as u64
    } else {
        0
    };

    presenter.start_spinner("Playing");
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                None | Some(ControlSignal::Shutdown) => {
                    handler.stop_playing(id)?;
                    presenter.spinner_fail("Playback interrupted");
                    return Ok(());
                }
                Some(control) => {
                    if let Some((channel, data)) = control.as_message() {
                        handler.on_message(channel, data)?;
                        presenter.info(&format!(
                            "Phone {}: {} session(s) held",
                            data,
                            handler.paused_for_interruption().len()
                        ));
                    }
                }
            },
            _ = ticker.tick() => {
                let state = handler.session_state(id);
                if matches!(state, None | Some(VoiceState::Stopped)) {
                    presenter.spinner_success("Playback finished");
                    return Ok(());
                }

                let position_ms = (handler.current_position(id).max(0.0) * 1000.0) as u64;
                let label = if state == Some(VoiceState::Paused) { "Paused " } else { "Playing" };
                presenter.update_spinner(&format!(
                    "{} {}",
                    label,
                    presenter.format_progress(position_ms, total_ms)
                ));
            }
        }
    }
}

/// Record until the limit elapses or a shutdown signal arrives, then save
async fn drive_recording(
    handler: &mut NativeHandler,
    id: &str,
    limit: Duration,
    signals: &mut SignalListener,
    presenter: &mut Presenter,
) -> Result<(), VoiceHandlerError> {
    let started = Instant::now();
    let total_ms = limit.as_millis();

    presenter.start_spinner("Recording");
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                None | Some(ControlSignal::Shutdown) => break,
                Some(control) => {
                    if let Some((channel, data)) = control.as_message() {
                        handler.on_message(channel, data)?;
                    }
                }
            },
            _ = ticker.tick() => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if limit.is_reached(elapsed_ms) {
                    break;
                }
                presenter.update_spinner(&format!(
                    "Recording {} {}",
                    presenter.format_progress(elapsed_ms, total_ms),
                    presenter.format_level(handler.power(id))
                ));
            }
        }
    }

    presenter.stop_spinner();
    handler.stop_recording(id)?;
    Ok(())
}

/// Print a handler error and pick the exit code
fn report_error(presenter: &Presenter, error: &VoiceHandlerError) -> ExitCode {
    match error {
        VoiceHandlerError::Command(CommandError::Unrecognized(_)) => {
            presenter.error(&format!(
                "{}. Valid actions: {}",
                error,
                ACTIONS.join(", ")
            ));
            ExitCode::from(EXIT_USAGE_ERROR)
        }
        VoiceHandlerError::Command(_) => {
            presenter.error(&error.to_string());
            ExitCode::from(EXIT_USAGE_ERROR)
        }
        VoiceHandlerError::Session(e) => {
            presenter.error(&format!("{} (code {})", e, e.code()));
            ExitCode::from(EXIT_ERROR)
        }
        VoiceHandlerError::Routing(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

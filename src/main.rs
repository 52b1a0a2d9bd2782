//! Voice Bridge CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_bridge::cli::{
    app::{init_tracing, load_merged_config, run_duration, run_exec, run_play, run_record},
    app::{EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_bridge::domain::config::{AppConfig, AudioConfig};
use voice_bridge::domain::recording::Duration;
use voice_bridge::domain::voice::OutputDevice;
use voice_bridge::infrastructure::XdgConfigStore;

// rodio output streams are !Send, so the handler stays on one thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    let command = match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        command => command,
    };

    let cli_config = AppConfig {
        base_dir: cli.base_dir.clone(),
        audio: cli.output.map(|output| AudioConfig {
            output: Some(OutputDevice::from(output).as_str().to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let config = load_merged_config(cli_config, &presenter).await;
    init_tracing(cli.verbose, &config);

    match command {
        Commands::Play {
            source,
            volume,
            seek,
        } => run_play(&source, volume.as_deref(), seek, &config).await,
        Commands::Record { target, duration } => {
            let duration = match duration {
                Some(s) => match s.parse::<Duration>() {
                    Ok(d) => d,
                    Err(e) => {
                        presenter.error(&format!("Invalid duration: {}", e));
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => config.record_duration_or_default(),
            };
            run_record(&target, duration, &config).await
        }
        Commands::Duration { source } => run_duration(&source, &config).await,
        Commands::Exec { action, args } => run_exec(&action, &args, &config).await,
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}

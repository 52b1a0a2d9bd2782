//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::voice::OutputDevice;

/// Voice Bridge - record and play voice clips with phone-call interruption handling
#[derive(Parser, Debug)]
#[command(name = "voice-bridge")]
#[command(version)]
#[command(about = "Record and play voice clips through a multi-session voice bridge")]
#[command(long_about = None)]
pub struct Cli {
    /// Base directory for relative sources and targets
    #[arg(long, global = true, value_name = "DIR", env = "VOICE_BRIDGE_BASE_DIR")]
    pub base_dir: Option<String>,

    /// Audio output route
    #[arg(short = 'o', long, global = true, value_name = "ROUTE")]
    pub output: Option<OutputArg>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a source until it ends (SIGUSR1 simulates a ringing phone, SIGUSR2 hangs up)
    Play {
        /// File path or file:// URI
        source: String,

        /// Playback volume 0.0-1.0
        #[arg(long, value_name = "LEVEL")]
        volume: Option<String>,

        /// Start position in milliseconds
        #[arg(long, value_name = "MS")]
        seek: Option<i64>,
    },
    /// Record from the default input device
    Record {
        /// Target file (.wav or .flac)
        target: String,

        /// Recording duration (e.g., 10s, 1m, 2m30s)
        #[arg(short = 'd', long, value_name = "TIME")]
        duration: Option<String>,
    },
    /// Print the duration of a source in seconds
    Duration {
        /// File path or file:// URI
        source: String,
    },
    /// Run a single host action and print its JSON reply
    Exec {
        /// Action name (e.g., getCurrentPosition, release, setVolume)
        action: String,

        /// Positional arguments; JSON literals are decoded, anything else is a string
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Output route argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Earpiece,
    Speaker,
}

impl From<OutputArg> for OutputDevice {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Earpiece => OutputDevice::Earpiece,
            OutputArg::Speaker => OutputDevice::Speaker,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "base_dir",
    "record_duration",
    "log_level",
    "audio.output",
    "audio.earpiece_device",
    "audio.sample_rate",
];

/// Accepted `log_level` values
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_play() {
        let cli = Cli::parse_from(["voice-bridge", "play", "memo.wav"]);
        match cli.command {
            Commands::Play {
                source,
                volume,
                seek,
            } => {
                assert_eq!(source, "memo.wav");
                assert!(volume.is_none());
                assert!(seek.is_none());
            }
            other => panic!("Expected Play, got {:?}", other),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_play_options() {
        let cli = Cli::parse_from([
            "voice-bridge",
            "play",
            "memo.wav",
            "--volume",
            "0.5",
            "--seek",
            "1500",
        ]);
        assert!(matches!(
            cli.command,
            Commands::Play { volume: Some(ref v), seek: Some(1500), .. } if v == "0.5"
        ));
    }

    #[test]
    fn cli_parses_record_duration() {
        let cli = Cli::parse_from(["voice-bridge", "record", "out.flac", "-d", "30s"]);
        assert!(matches!(
            cli.command,
            Commands::Record { ref target, duration: Some(ref d) } if target == "out.flac" && d == "30s"
        ));
    }

    #[test]
    fn cli_parses_exec_with_negative_numbers() {
        let cli = Cli::parse_from(["voice-bridge", "exec", "seekTo", "a", "-5"]);
        if let Commands::Exec { action, args } = cli.command {
            assert_eq!(action, "seekTo");
            assert_eq!(args, vec!["a".to_string(), "-5".to_string()]);
        } else {
            panic!("Expected Exec command");
        }
    }

    #[test]
    fn cli_parses_global_options() {
        let cli = Cli::parse_from([
            "voice-bridge",
            "duration",
            "a.wav",
            "--output",
            "earpiece",
            "--base-dir",
            "/srv",
            "-v",
        ]);
        assert_eq!(cli.output, Some(OutputArg::Earpiece));
        assert_eq!(cli.base_dir, Some("/srv".to_string()));
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voice-bridge", "config", "set", "audio.output", "earpiece"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "audio.output");
            assert_eq!(value, "earpiece");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn output_arg_converts() {
        assert_eq!(OutputDevice::from(OutputArg::Earpiece), OutputDevice::Earpiece);
        assert_eq!(OutputDevice::from(OutputArg::Speaker), OutputDevice::Speaker);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("record_duration"));
        assert!(is_valid_config_key("audio.sample_rate"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}

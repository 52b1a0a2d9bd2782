//! Host commands and replies
//!
//! The host bridge delivers an action name plus a positional JSON argument
//! array. Both are decoded once into [`VoiceCommand`]; everything past this
//! point matches on the enum.

use serde_json::Value;
use thiserror::Error;

use super::output::OutputDevice;

/// Command decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unrecognized action: {0}")]
    Unrecognized(String),

    #[error("Invalid argument {index} for '{action}': {message}")]
    InvalidArgument {
        action: String,
        index: usize,
        message: String,
    },
}

/// A decoded host command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCommand {
    StartRecording { id: String, target: String },
    StopRecording { id: String },
    StartPlaying { id: String, target: String },
    SeekTo { id: String, milliseconds: i64 },
    PausePlaying { id: String },
    StopPlaying { id: String },
    /// The level stays raw; an unparsable level is a logged no-op, not a decode error
    SetVolume { id: String, level: String },
    GetCurrentPosition { id: String },
    GetDuration { id: String, target: String },
    Create { id: String, target: String },
    Release { id: String },
    GetPower { id: String },
    GetOutputDevice,
    SetOutputDevice { code: i64 },
}

/// All action names understood by [`VoiceCommand::decode`]
pub const ACTIONS: &[&str] = &[
    "startRecording",
    "stopRecording",
    "startPlaying",
    "seekTo",
    "pausePlaying",
    "stopPlaying",
    "setVolume",
    "getCurrentPosition",
    "getDuration",
    "create",
    "release",
    "getPower",
    "getOutputDevice",
    "setOutputDevice",
];

impl VoiceCommand {
    /// Decode an action name and its positional arguments
    pub fn decode(action: &str, args: &[Value]) -> Result<Self, CommandError> {
        let args = Args { action, args };

        let command = match action {
            "startRecording" => Self::StartRecording {
                id: args.string(0)?,
                target: args.string(1)?,
            },
            "stopRecording" => Self::StopRecording { id: args.string(0)? },
            "startPlaying" => Self::StartPlaying {
                id: args.string(0)?,
                target: args.string(1)?,
            },
            "seekTo" => Self::SeekTo {
                id: args.string(0)?,
                milliseconds: args.int(1)?,
            },
            "pausePlaying" => Self::PausePlaying { id: args.string(0)? },
            "stopPlaying" => Self::StopPlaying { id: args.string(0)? },
            "setVolume" => Self::SetVolume {
                id: args.string(0)?,
                level: args.string(1)?,
            },
            "getCurrentPosition" => Self::GetCurrentPosition { id: args.string(0)? },
            "getDuration" => Self::GetDuration {
                id: args.string(0)?,
                target: args.string(1)?,
            },
            "create" => Self::Create {
                id: args.string(0)?,
                target: args.string(1)?,
            },
            "release" => Self::Release { id: args.string(0)? },
            "getPower" => Self::GetPower { id: args.string(0)? },
            "getOutputDevice" => Self::GetOutputDevice,
            "setOutputDevice" => Self::SetOutputDevice { code: args.int(0)? },
            other => return Err(CommandError::Unrecognized(other.to_string())),
        };

        Ok(command)
    }

    /// Host action name of this command
    pub const fn action(&self) -> &'static str {
        match self {
            Self::StartRecording { .. } => "startRecording",
            Self::StopRecording { .. } => "stopRecording",
            Self::StartPlaying { .. } => "startPlaying",
            Self::SeekTo { .. } => "seekTo",
            Self::PausePlaying { .. } => "pausePlaying",
            Self::StopPlaying { .. } => "stopPlaying",
            Self::SetVolume { .. } => "setVolume",
            Self::GetCurrentPosition { .. } => "getCurrentPosition",
            Self::GetDuration { .. } => "getDuration",
            Self::Create { .. } => "create",
            Self::Release { .. } => "release",
            Self::GetPower { .. } => "getPower",
            Self::GetOutputDevice => "getOutputDevice",
            Self::SetOutputDevice { .. } => "setOutputDevice",
        }
    }

    /// Session id this command targets, if any
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::StartRecording { id, .. }
            | Self::StopRecording { id }
            | Self::StartPlaying { id, .. }
            | Self::SeekTo { id, .. }
            | Self::PausePlaying { id }
            | Self::StopPlaying { id }
            | Self::SetVolume { id, .. }
            | Self::GetCurrentPosition { id }
            | Self::GetDuration { id, .. }
            | Self::Create { id, .. }
            | Self::Release { id }
            | Self::GetPower { id } => Some(id),
            Self::GetOutputDevice | Self::SetOutputDevice { .. } => None,
        }
    }
}

/// Positional argument accessor with the bridge's lenient coercions
struct Args<'a> {
    action: &'a str,
    args: &'a [Value],
}

impl Args<'_> {
    fn get(&self, index: usize) -> Result<&Value, CommandError> {
        self.args
            .get(index)
            .filter(|v| !v.is_null())
            .ok_or_else(|| self.invalid(index, "missing"))
    }

    /// Strings are taken as-is; numbers and booleans are stringified
    fn string(&self, index: usize) -> Result<String, CommandError> {
        match self.get(index)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(self.invalid(index, "expected a string")),
        }
    }

    /// Integers, floats (truncated) and numeric strings
    fn int(&self, index: usize) -> Result<i64, CommandError> {
        let value = self.get(index)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(index, "expected an integer"))
    }

    fn invalid(&self, index: usize, message: &str) -> CommandError {
        CommandError::InvalidArgument {
            action: self.action.to_string(),
            index,
            message: message.to_string(),
        }
    }
}

/// Result of a successfully executed command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceReply {
    /// Plain acknowledgement (an empty string on the host side)
    Ack,
    /// Playback position in seconds, -1 for an unknown session
    Position(f32),
    /// Duration in seconds, -1 when not known
    Duration(f32),
    /// Input level 0.0-1.0, -1 for an unknown session
    Power(f32),
    /// Whether a session existed and was released
    Released(bool),
    OutputDevice(OutputDevice),
}

impl VoiceReply {
    /// JSON value handed back to the host
    pub fn to_json(&self) -> Value {
        match self {
            Self::Ack => Value::String(String::new()),
            Self::Position(v) | Self::Duration(v) | Self::Power(v) => {
                serde_json::Number::from_f64(f64::from(*v))
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
            Self::Released(b) => Value::Bool(*b),
            Self::OutputDevice(device) => Value::from(device.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(action: &str, args: Value) -> Result<VoiceCommand, CommandError> {
        let args = args.as_array().cloned().unwrap_or_default();
        VoiceCommand::decode(action, &args)
    }

    #[test]
    fn decodes_start_playing() {
        let cmd = decode("startPlaying", json!(["a", "file:///x.wav", {}])).unwrap();
        assert_eq!(
            cmd,
            VoiceCommand::StartPlaying {
                id: "a".into(),
                target: "file:///x.wav".into()
            }
        );
    }

    #[test]
    fn decodes_seek_from_number_and_string() {
        assert_eq!(
            decode("seekTo", json!(["a", 1500])).unwrap(),
            VoiceCommand::SeekTo { id: "a".into(), milliseconds: 1500 }
        );
        assert_eq!(
            decode("seekTo", json!(["a", "250"])).unwrap(),
            VoiceCommand::SeekTo { id: "a".into(), milliseconds: 250 }
        );
        assert_eq!(
            decode("seekTo", json!(["a", 99.9])).unwrap(),
            VoiceCommand::SeekTo { id: "a".into(), milliseconds: 99 }
        );
    }

    #[test]
    fn volume_number_is_stringified() {
        assert_eq!(
            decode("setVolume", json!(["a", 0.5])).unwrap(),
            VoiceCommand::SetVolume { id: "a".into(), level: "0.5".into() }
        );
    }

    #[test]
    fn volume_garbage_still_decodes() {
        assert_eq!(
            decode("setVolume", json!(["a", "abc"])).unwrap(),
            VoiceCommand::SetVolume { id: "a".into(), level: "abc".into() }
        );
    }

    #[test]
    fn unknown_action_is_unrecognized() {
        let err = decode("fastForward", json!(["a"])).unwrap_err();
        assert_eq!(err, CommandError::Unrecognized("fastForward".into()));
    }

    #[test]
    fn missing_argument_is_invalid() {
        let err = decode("startRecording", json!(["a"])).unwrap_err();
        assert!(matches!(
            err,
            CommandError::InvalidArgument { index: 1, .. }
        ));
    }

    #[test]
    fn null_argument_is_invalid() {
        assert!(decode("release", json!([null])).is_err());
    }

    #[test]
    fn non_numeric_seek_is_invalid() {
        assert!(decode("seekTo", json!(["a", "soon"])).is_err());
    }

    #[test]
    fn every_listed_action_decodes() {
        let args = json!(["1", "2", "x"]);
        for action in ACTIONS {
            let cmd = decode(action, args.clone()).unwrap();
            assert_eq!(cmd.action(), *action);
        }
    }

    #[test]
    fn session_id_of_commands() {
        assert_eq!(
            VoiceCommand::Release { id: "x".into() }.session_id(),
            Some("x")
        );
        assert_eq!(VoiceCommand::GetOutputDevice.session_id(), None);
    }

    #[test]
    fn reply_json_shapes() {
        assert_eq!(VoiceReply::Ack.to_json(), json!(""));
        assert_eq!(VoiceReply::Released(true).to_json(), json!(true));
        assert_eq!(VoiceReply::Position(-1.0).to_json(), json!(-1.0));
        assert_eq!(VoiceReply::Duration(2.5).to_json(), json!(2.5));
        assert_eq!(
            VoiceReply::OutputDevice(OutputDevice::Earpiece).to_json(),
            json!(1)
        );
    }
}

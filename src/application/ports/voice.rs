//! Voice session port interfaces
//!
//! A session owns exactly one native player/recorder handle. Sessions are
//! driven from a single dispatch thread, so the traits carry no `Send`
//! bound and take `&mut self` for anything that changes the handle.

use thiserror::Error;

use crate::domain::voice::{VoiceState, Volume};

/// Errors raised by the native audio layer
#[derive(Debug, Clone, Error)]
pub enum VoiceError {
    #[error("Operation aborted: {0}")]
    Aborted(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Source not supported: {0}")]
    NotSupported(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Cannot {action} while {state}")]
    InvalidState { action: String, state: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl VoiceError {
    /// Host error code (1 aborted, 2 network, 3 decode, 4 not supported)
    pub const fn code(&self) -> u8 {
        match self {
            Self::Network(_) => 2,
            Self::Decode(_) => 3,
            Self::NotSupported(_) => 4,
            Self::Aborted(_)
            | Self::DeviceNotAvailable(_)
            | Self::InvalidState { .. }
            | Self::Io(_) => 1,
        }
    }
}

/// Port for one native voice player/recorder
pub trait VoiceSession {
    /// Caller-supplied session id
    fn id(&self) -> &str;

    /// Current lifecycle state
    fn state(&self) -> VoiceState;

    /// True only while audio is actively playing (not recording, not paused)
    fn is_playing(&self) -> bool;

    /// Begin recording into `file`
    fn start_recording(&mut self, file: &str) -> Result<(), VoiceError>;

    /// Stop recording and write the file chosen at start
    fn stop_recording(&mut self) -> Result<(), VoiceError>;

    /// Start or resume playback. `None` resumes the previously set source.
    fn start_playing(&mut self, file: Option<&str>) -> Result<(), VoiceError>;

    /// Move the playback position
    fn seek_to(&mut self, milliseconds: i64) -> Result<(), VoiceError>;

    fn pause_playing(&mut self) -> Result<(), VoiceError>;

    /// Stop playback. The session stays usable.
    fn stop_playing(&mut self) -> Result<(), VoiceError>;

    fn set_volume(&mut self, volume: Volume) -> Result<(), VoiceError>;

    /// Playback position in milliseconds
    fn current_position_ms(&self) -> i64;

    /// Duration of `file` in seconds, or -1 if not (yet) known
    fn duration(&mut self, file: &str) -> f32;

    /// Recording input level 0.0-1.0
    fn power(&self) -> f32;

    /// Release the native handle. The session must not be used afterwards.
    fn destroy(&mut self);
}

/// Port for creating sessions
pub trait VoiceSessionFactory {
    type Session: VoiceSession;

    /// Create a session for `id` with an initial source reference.
    /// Nothing is opened until the session is started.
    fn create(&self, id: &str, source: &str) -> Self::Session;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_match_host_constants() {
        assert_eq!(VoiceError::Aborted("x".into()).code(), 1);
        assert_eq!(VoiceError::Network("x".into()).code(), 2);
        assert_eq!(VoiceError::Decode("x".into()).code(), 3);
        assert_eq!(VoiceError::NotSupported("x".into()).code(), 4);
        assert_eq!(VoiceError::Io("x".into()).code(), 1);
    }

    #[test]
    fn invalid_state_display() {
        let err = VoiceError::InvalidState {
            action: "play".into(),
            state: "recording".into(),
        };
        assert_eq!(err.to_string(), "Cannot play while recording");
    }
}

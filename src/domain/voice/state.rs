//! Voice session states

use std::fmt;

/// Lifecycle state of a voice session.
///
/// The numeric codes are the ones the host side understands, so they must
/// stay stable.
///
/// State machine:
///   NONE -> STARTING -> RUNNING (start recording / start playing)
///   RUNNING -> PAUSED (pause playing)
///   PAUSED -> RUNNING (start playing)
///   RUNNING | PAUSED -> STOPPED (stop, or playback reached the end)
///   STOPPED -> RUNNING (start again)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoiceState {
    #[default]
    None,
    Starting,
    Running,
    Paused,
    Stopped,
}

impl VoiceState {
    /// Numeric state code reported to the host
    pub const fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Starting => 1,
            Self::Running => 2,
            Self::Paused => 3,
            Self::Stopped => 4,
        }
    }

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for VoiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

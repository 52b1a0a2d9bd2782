//! Audio output routing

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidOutputDevice;

/// Where playback is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputDevice {
    Earpiece,
    #[default]
    Speaker,
}

impl OutputDevice {
    /// Host device code (1 = earpiece, 2 = speaker)
    pub const fn code(&self) -> i64 {
        match self {
            Self::Earpiece => 1,
            Self::Speaker => 2,
        }
    }

    /// Look up a device by host code
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Earpiece),
            2 => Some(Self::Speaker),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Earpiece => "earpiece",
            Self::Speaker => "speaker",
        }
    }
}

impl fmt::Display for OutputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputDevice {
    type Err = InvalidOutputDevice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "earpiece" | "1" => Ok(Self::Earpiece),
            "speaker" | "2" => Ok(Self::Speaker),
            _ => Err(InvalidOutputDevice {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        assert_eq!(OutputDevice::from_code(1), Some(OutputDevice::Earpiece));
        assert_eq!(OutputDevice::from_code(2), Some(OutputDevice::Speaker));
        assert_eq!(OutputDevice::Earpiece.code(), 1);
        assert_eq!(OutputDevice::Speaker.code(), 2);
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(OutputDevice::from_code(0), None);
        assert_eq!(OutputDevice::from_code(3), None);
    }

    #[test]
    fn parse_names_and_codes() {
        assert_eq!("Speaker".parse::<OutputDevice>().unwrap(), OutputDevice::Speaker);
        assert_eq!("1".parse::<OutputDevice>().unwrap(), OutputDevice::Earpiece);
        assert!("headphones".parse::<OutputDevice>().is_err());
    }

    #[test]
    fn default_is_speaker() {
        assert_eq!(OutputDevice::default(), OutputDevice::Speaker);
    }
}

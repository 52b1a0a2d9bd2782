//! Volume value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::VolumeParseError;

/// Output level between 0.0 (silent) and 1.0 (full).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    /// Full output level
    pub const MAX: Volume = Volume(1.0);

    /// Create a volume, clamping into 0.0..=1.0.
    /// Returns None for NaN.
    pub fn new(level: f32) -> Option<Self> {
        if level.is_nan() {
            return None;
        }
        Some(Self(level.clamp(0.0, 1.0)))
    }

    /// Get the level as f32
    pub const fn level(&self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::MAX
    }
}

impl FromStr for Volume {
    type Err = VolumeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f32>()
            .ok()
            .and_then(Volume::new)
            .ok_or_else(|| VolumeParseError {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

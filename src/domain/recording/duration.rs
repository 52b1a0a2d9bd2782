//! Recording length value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default length of a timed recording (10 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// How long a timed recording runs. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// True once `elapsed_ms` has covered the whole length
    pub const fn is_reached(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.milliseconds
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Accepts `<n>m`, `<n>s` or `<n>m<n>s`, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_ascii_lowercase();

        let (minutes, rest) = match input.split_once('m') {
            Some((m, rest)) => (Some(m), rest),
            None => (None, input.as_str()),
        };
        let seconds = match rest {
            "" => None,
            r => Some(r.strip_suffix('s').ok_or_else(err)?),
        };
        if minutes.is_none() && seconds.is_none() {
            return Err(err());
        }

        let number = |part: Option<&str>| -> Result<u64, DurationParseError> {
            match part {
                None => Ok(0),
                Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                    digits.parse().map_err(|_| err())
                }
                Some(_) => Err(err()),
            }
        };

        let total_secs = number(minutes)?
            .checked_mul(60)
            .and_then(|m| m.checked_add(number(seconds).ok()?))
            .ok_or_else(err)?;
        if total_secs == 0 {
            return Err(err());
        }

        total_secs
            .checked_mul(1000)
            .map(Self::from_millis)
            .ok_or_else(err)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.as_secs() / 60, self.as_secs() % 60) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_form() {
        assert_eq!("30s".parse::<Duration>().unwrap().as_millis(), 30_000);
        assert_eq!("2m".parse::<Duration>().unwrap().as_secs(), 120);
        assert_eq!("2m30s".parse::<Duration>().unwrap().as_secs(), 150);
        assert_eq!("  1M30S ".parse::<Duration>().unwrap().as_secs(), 90);
    }

    #[test]
    fn rejects_zero_and_empty() {
        for input in ["", "0s", "0m0s", "m", "s", "ms"] {
            assert!(input.parse::<Duration>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn rejects_malformed() {
        for input in ["30", "abc", "30x", "1s2m", "-5s", "1.5s", "99999999999999999999s"] {
            assert!(input.parse::<Duration>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn error_echoes_input() {
        let err = "soon".parse::<Duration>().unwrap_err();
        assert_eq!(err.input, "soon");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for secs in [30, 120, 150] {
            let d = Duration::from_secs(secs);
            assert_eq!(d.to_string().parse::<Duration>().unwrap(), d);
        }
        assert_eq!(Duration::from_secs(150).to_string(), "2m30s");
    }

    #[test]
    fn elapsed_checks() {
        let d = Duration::from_secs(2);
        assert!(!d.is_reached(1999));
        assert!(d.is_reached(2000));
    }

    #[test]
    fn default_is_ten_seconds() {
        assert_eq!(Duration::default(), Duration::from_secs(10));
        assert_eq!(Duration::default().as_std(), StdDuration::from_secs(10));
    }
}

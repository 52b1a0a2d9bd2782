//! Phone-call interruption messages

/// Channel on which the platform broadcasts telephony state
pub const TELEPHONE_CHANNEL: &str = "telephone";

/// Interruption edge decoded from a platform message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneSignal {
    /// Phone is ringing or a call is in progress
    Started,
    /// Phone went back to idle
    Ended,
}

impl PhoneSignal {
    /// Decode a platform message. Anything that is not a telephony
    /// state on the telephone channel yields None.
    pub fn from_message(channel: &str, data: &str) -> Option<Self> {
        if channel != TELEPHONE_CHANNEL {
            return None;
        }
        match data {
            "ringing" | "offhook" => Some(Self::Started),
            "idle" => Some(Self::Ended),
            _ => None,
        }
    }

    /// Message data string for this signal
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "ringing",
            Self::Ended => "idle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ringing_and_offhook_start_interruption() {
        assert_eq!(
            PhoneSignal::from_message("telephone", "ringing"),
            Some(PhoneSignal::Started)
        );
        assert_eq!(
            PhoneSignal::from_message("telephone", "offhook"),
            Some(PhoneSignal::Started)
        );
    }

    #[test]
    fn idle_ends_interruption() {
        assert_eq!(
            PhoneSignal::from_message("telephone", "idle"),
            Some(PhoneSignal::Ended)
        );
    }

    #[test]
    fn other_channels_ignored() {
        assert_eq!(PhoneSignal::from_message("network", "ringing"), None);
    }

    #[test]
    fn unknown_data_ignored() {
        assert_eq!(PhoneSignal::from_message("telephone", "busy"), None);
    }

    #[test]
    fn as_str_decodes_back() {
        for signal in [PhoneSignal::Started, PhoneSignal::Ended] {
            assert_eq!(
                PhoneSignal::from_message(TELEPHONE_CHANNEL, signal.as_str()),
                Some(signal)
            );
        }
    }
}

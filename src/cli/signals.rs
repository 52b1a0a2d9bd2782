//! Signal handling for the foreground play/record loops
//!
//! SIGINT and SIGTERM end the loop. SIGUSR1 and SIGUSR2 stand in for the
//! platform's telephony broadcasts, so interruption handling can be driven
//! from a shell: `kill -USR1 <pid>` rings, `kill -USR2 <pid>` hangs up.

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::voice::{PhoneSignal, TELEPHONE_CHANNEL};

/// Signals delivered to the foreground loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Stop and exit (SIGINT/SIGTERM)
    Shutdown,
    /// Telephony state change
    Phone(PhoneSignal),
}

impl ControlSignal {
    /// Host message `(channel, data)` this signal corresponds to
    pub fn as_message(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Shutdown => None,
            Self::Phone(PhoneSignal::Started) => Some((TELEPHONE_CHANNEL, "ringing")),
            Self::Phone(PhoneSignal::Ended) => Some((TELEPHONE_CHANNEL, "idle")),
        }
    }
}

/// Listens for OS signals and forwards them over a channel
pub struct SignalListener {
    receiver: mpsc::Receiver<ControlSignal>,
}

impl SignalListener {
    /// Install handlers. Must be called from within a tokio runtime.
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        for (kind, control, repeat) in [
            (SignalKind::interrupt(), ControlSignal::Shutdown, false),
            (SignalKind::terminate(), ControlSignal::Shutdown, false),
            (SignalKind::user_defined1(), ControlSignal::Phone(PhoneSignal::Started), true),
            (SignalKind::user_defined2(), ControlSignal::Phone(PhoneSignal::Ended), true),
        ] {
            let mut stream = signal(kind)?;
            let tx = tx.clone();
            tokio::spawn(async move {
                while stream.recv().await.is_some() {
                    debug!(signal = ?control, "received signal");
                    if tx.send(control).await.is_err() || !repeat {
                        break;
                    }
                }
            });
        }

        Ok(Self { receiver: rx })
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<ControlSignal> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_signals_map_to_telephone_messages() {
        assert_eq!(
            ControlSignal::Phone(PhoneSignal::Started).as_message(),
            Some(("telephone", "ringing"))
        );
        assert_eq!(
            ControlSignal::Phone(PhoneSignal::Ended).as_message(),
            Some(("telephone", "idle"))
        );
        assert_eq!(ControlSignal::Shutdown.as_message(), None);
    }

    #[test]
    fn messages_decode_back_to_phone_signals() {
        for signal in [PhoneSignal::Started, PhoneSignal::Ended] {
            let (channel, data) = ControlSignal::Phone(signal).as_message().unwrap();
            assert_eq!(PhoneSignal::from_message(channel, data), Some(signal));
        }
    }

    #[tokio::test]
    async fn listener_installs_inside_runtime() {
        assert!(SignalListener::new().is_ok());
    }
}

//! Domain layer - Core business logic
//!
//! Contains value objects and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod voice;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recording::{Duration, RecordingFormat};
pub use voice::{OutputDevice, PhoneSignal, VoiceCommand, VoiceReply, VoiceState, Volume};

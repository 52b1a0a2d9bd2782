//! Application layer - Voice dispatcher and port interfaces
//!
//! Contains the command dispatcher and the trait definitions
//! for the native audio, resource and routing backends.

pub mod ports;
pub mod voice_handler;

pub use voice_handler::{VoiceHandler, VoiceHandlerError, UNKNOWN_SESSION};

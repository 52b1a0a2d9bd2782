//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with audio devices, the filesystem and config storage.

pub mod config;
pub mod resource;
pub mod routing;
pub mod voice;

// Re-export adapters
pub use config::XdgConfigStore;
pub use resource::FsResourceResolver;
pub use routing::CpalAudioRouting;
pub use voice::{NativeVoice, NativeVoiceFactory};

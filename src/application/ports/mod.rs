//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod resource;
pub mod routing;
pub mod voice;

// Re-export common types
pub use config::ConfigStore;
pub use resource::{ResolveError, ResourceResolver};
pub use routing::{AudioRouting, RoutingError};
pub use voice::{VoiceError, VoiceSession, VoiceSessionFactory};

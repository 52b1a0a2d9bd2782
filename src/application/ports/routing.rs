//! Audio output routing port interface

use thiserror::Error;

use crate::domain::voice::OutputDevice;

/// Routing errors
#[derive(Debug, Clone, Error)]
pub enum RoutingError {
    #[error("Output device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port for switching playback between earpiece and speaker
pub trait AudioRouting {
    /// Currently selected route
    fn output_device(&self) -> OutputDevice;

    /// Select a route for subsequent playback
    fn set_output_device(&mut self, device: OutputDevice) -> Result<(), RoutingError>;
}

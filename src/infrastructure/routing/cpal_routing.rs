//! Output routing over cpal output devices
//!
//! The speaker route is the host's default output device. The earpiece
//! route is a named output device from config, falling back to the
//! default device when no name is configured.
//!
//! Clones share the selected route, so the handler's routing and the
//! sessions opening playback streams always agree.

use std::cell::Cell;
use std::rc::Rc;

use rodio::cpal::traits::{DeviceTrait, HostTrait};
use rodio::cpal::{self, Device};
use tracing::{debug, warn};

use crate::application::ports::{AudioRouting, RoutingError};
use crate::domain::voice::OutputDevice;

#[derive(Debug, Clone)]
pub struct CpalAudioRouting {
    current: Rc<Cell<OutputDevice>>,
    earpiece_device: Option<String>,
}

impl CpalAudioRouting {
    pub fn new(initial: OutputDevice, earpiece_device: Option<String>) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
            earpiece_device,
        }
    }

    /// Build a router and select `initial`, failing if that route names
    /// an output device that is not present
    pub fn open(
        initial: OutputDevice,
        earpiece_device: Option<String>,
    ) -> Result<Self, RoutingError> {
        let mut routing = Self::new(OutputDevice::Speaker, earpiece_device);
        routing.set_output_device(initial)?;
        Ok(routing)
    }

    /// Output device for the current route.
    ///
    /// `None` means the caller should open the host default stream.
    pub fn resolve_output_device(&self) -> Option<Device> {
        match (self.current.get(), self.earpiece_device.as_deref()) {
            (OutputDevice::Earpiece, Some(name)) => {
                let found = find_output_device(name);
                if found.is_none() {
                    warn!(device = name, "earpiece device not found, using default output");
                }
                found
            }
            _ => None,
        }
    }
}

impl Default for CpalAudioRouting {
    fn default() -> Self {
        Self::new(OutputDevice::default(), None)
    }
}

impl AudioRouting for CpalAudioRouting {
    fn output_device(&self) -> OutputDevice {
        self.current.get()
    }

    fn set_output_device(&mut self, device: OutputDevice) -> Result<(), RoutingError> {
        if device == OutputDevice::Earpiece {
            if let Some(name) = self.earpiece_device.as_deref() {
                if find_output_device(name).is_none() {
                    return Err(RoutingError::DeviceNotAvailable(name.to_string()));
                }
            }
        }

        debug!(route = %device, "switching audio output");
        self.current.set(device);
        Ok(())
    }
}

/// Find an output device by exact name on the default host
fn find_output_device(name: &str) -> Option<Device> {
    let host = cpal::default_host();
    let mut devices = host.output_devices().ok()?;
    devices.find(|device| device.name().map(|n| n == name).unwrap_or(false))
}

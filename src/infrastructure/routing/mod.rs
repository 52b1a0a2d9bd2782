//! Audio output routing module

mod cpal_routing;

pub use cpal_routing::CpalAudioRouting;

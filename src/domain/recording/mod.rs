//! Recording value objects

mod duration;
mod format;

pub use duration::{Duration, DEFAULT_DURATION_SECS};
pub use format::{human_readable_size, RecordingFormat};

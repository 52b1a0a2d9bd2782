//! Native voice backend
//!
//! Playback goes through rodio, capture through cpal. Recordings are
//! resampled with rubato and written by hound (WAV) or flacenc (FLAC).

mod capture;
mod encoder;
mod native;
mod playback;

pub use capture::CpalCapture;
pub use encoder::{encode_flac, write_recording, CapturedAudio, EncodingError};
pub use native::{NativeVoice, NativeVoiceFactory};
pub use playback::{read_duration, RodioPlayback};

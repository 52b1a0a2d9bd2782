//! Microphone capture using cpal
//!
//! `cpal::Stream` is not `Send`, so the stream lives on its own thread for
//! the lifetime of a capture. The thread reports the negotiated sample rate
//! (or the failure) over a channel before the caller returns from `start`.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tracing::{debug, error};

use super::encoder::{downmix, peak_level, CapturedAudio};
use crate::application::ports::VoiceError;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// State shared with the capture thread and the stream callback
#[derive(Default)]
struct Shared {
    buffer: Mutex<Vec<i16>>,
    active: AtomicBool,
    /// f32 bits of the latest callback's peak level
    level: AtomicU32,
}

impl Shared {
    fn push(&self, interleaved: &[i16], channels: u16) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        let mono = downmix(interleaved, channels);
        self.level
            .store(peak_level(&mono).to_bits(), Ordering::Relaxed);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.extend_from_slice(&mono);
        }
    }
}

/// A running capture
pub struct CpalCapture {
    shared: Arc<Shared>,
    sample_rate: u32,
    thread: Option<JoinHandle<()>>,
}

impl CpalCapture {
    /// Open the default input device and start capturing.
    ///
    /// `preferred_rate` is used when the device supports it, otherwise the
    /// device's lowest rate is used and the audio is resampled on write.
    pub fn start(preferred_rate: u32) -> Result<Self, VoiceError> {
        let shared = Arc::new(Shared::default());
        shared.active.store(true, Ordering::SeqCst);

        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, VoiceError>>();
        let thread_shared = Arc::clone(&shared);

        let thread = std::thread::Builder::new()
            .name("voice-capture".into())
            .spawn(move || run_capture(thread_shared, preferred_rate, ready_tx))
            .map_err(|e| VoiceError::Aborted(format!("Failed to spawn capture thread: {}", e)))?;

        let sample_rate = match ready_rx.recv_timeout(STARTUP_TIMEOUT) {
            Ok(Ok(rate)) => rate,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                shared.active.store(false, Ordering::SeqCst);
                return Err(VoiceError::DeviceNotAvailable(
                    "Input stream did not start".into(),
                ));
            }
        };

        debug!(sample_rate, "capture started");
        Ok(Self {
            shared,
            sample_rate,
            thread: Some(thread),
        })
    }

    /// Latest input peak level, 0.0-1.0
    pub fn level(&self) -> f32 {
        f32::from_bits(self.shared.level.load(Ordering::Relaxed))
    }

    /// Stop the stream and hand back everything captured
    pub fn stop(mut self) -> CapturedAudio {
        self.halt();
        let samples = self
            .shared
            .buffer
            .lock()
            .map(|mut buffer| std::mem::take(&mut *buffer))
            .unwrap_or_default();

        CapturedAudio {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    fn halt(&mut self) {
        self.shared.active.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("capture thread panicked");
            }
        }
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        self.halt();
    }
}

fn run_capture(shared: Arc<Shared>, preferred_rate: u32, ready: mpsc::Sender<Result<u32, VoiceError>>) {
    let (stream, sample_rate) = match open_stream(&shared, preferred_rate) {
        Ok(opened) => opened,
        Err(e) => {
            shared.active.store(false, Ordering::SeqCst);
            let _ = ready.send(Err(e));
            return;
        }
    };

    let _ = ready.send(Ok(sample_rate));

    while shared.active.load(Ordering::SeqCst) {
        std::thread::sleep(POLL_INTERVAL);
    }

    drop(stream);
}

fn open_stream(shared: &Arc<Shared>, preferred_rate: u32) -> Result<(cpal::Stream, u32), VoiceError> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or_else(|| VoiceError::DeviceNotAvailable("No input device".into()))?;

    let (config, sample_format) = input_config(&device, preferred_rate)?;
    let channels = config.channels;
    let sample_rate = config.sample_rate.0;

    let on_error = |err: cpal::StreamError| error!(error = %err, "input stream error");

    let stream = match sample_format {
        SampleFormat::I16 => {
            let shared = Arc::clone(shared);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| shared.push(data, channels),
                on_error,
                None,
            )
        }
        SampleFormat::F32 => {
            let shared = Arc::clone(shared);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let converted: Vec<i16> = data
                        .iter()
                        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                        .collect();
                    shared.push(&converted, channels)
                },
                on_error,
                None,
            )
        }
        other => {
            return Err(VoiceError::NotSupported(format!(
                "Input sample format {:?}",
                other
            )))
        }
    }
    .map_err(|e| VoiceError::DeviceNotAvailable(e.to_string()))?;

    stream
        .play()
        .map_err(|e| VoiceError::Aborted(e.to_string()))?;

    Ok((stream, sample_rate))
}

/// Pick an i16/f32 input config, preferring fewer channels and
/// ranges that contain `preferred_rate`
fn input_config(
    device: &cpal::Device,
    preferred_rate: u32,
) -> Result<(StreamConfig, SampleFormat), VoiceError> {
    let ranges = device
        .supported_input_configs()
        .map_err(|e| VoiceError::DeviceNotAvailable(format!("Failed to get configs: {}", e)))?;

    let contains = |range: &cpal::SupportedStreamConfigRange| {
        range.min_sample_rate().0 <= preferred_rate && range.max_sample_rate().0 >= preferred_rate
    };

    let best = ranges
        .filter(|range| matches!(range.sample_format(), SampleFormat::I16 | SampleFormat::F32))
        .min_by_key(|range| (!contains(range), range.channels()))
        .ok_or_else(|| VoiceError::NotSupported("No suitable input config".into()))?;

    let sample_rate = if contains(&best) {
        SampleRate(preferred_rate)
    } else {
        best.min_sample_rate()
    };

    let config = StreamConfig {
        channels: best.channels(),
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    Ok((config, best.sample_format()))
}

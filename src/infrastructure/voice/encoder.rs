//! Recording encoders
//!
//! Captured audio arrives as mono i16 at the device rate. It is resampled
//! to the configured rate and written as:
//! - 16-bit PCM WAV (hound) by default
//! - FLAC (flacenc) when the target ends in `.flac`

use std::path::Path;

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

use crate::domain::recording::RecordingFormat;

const BITS_PER_SAMPLE: u16 = 16;
const CHANNELS: u16 = 1;
const RESAMPLER_CHUNK: usize = 1024;

/// Encoding errors
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("FLAC encoding failed: {0}")]
    Flac(String),

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("Failed to write recording: {0}")]
    Io(#[from] std::io::Error),
}

/// Mono PCM captured from an input device
#[derive(Debug, Clone, Default)]
pub struct CapturedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl CapturedAudio {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Resample and write a recording to `path` in the format its extension selects
pub fn write_recording(
    path: &Path,
    audio: &CapturedAudio,
    target_rate: u32,
) -> Result<RecordingFormat, EncodingError> {
    let samples = resample(&audio.samples, audio.sample_rate, target_rate)?;
    let format = RecordingFormat::for_path(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        RecordingFormat::Wav => write_wav(path, &samples, target_rate)?,
        RecordingFormat::Flac => std::fs::write(path, encode_flac(&samples, target_rate)?)?,
    }

    Ok(format)
}

fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<(), EncodingError> {
    let spec = hound::WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Encode mono i16 samples to FLAC bytes
pub fn encode_flac(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let widened: Vec<i32> = samples.iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::Flac(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &widened,
        CHANNELS as usize,
        BITS_PER_SAMPLE as usize,
        sample_rate as usize,
    );

    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Flac(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Flac(e.to_string()))?;

    Ok(sink.into_inner())
}

/// Resample mono i16 audio between rates
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Result<Vec<i16>, EncodingError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(EncodingError::Resample(format!(
            "invalid rate conversion {} -> {}",
            from_rate, to_rate
        )));
    }

    let input: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();
    let expected_len = (input.len() as f64 * to_rate as f64 / from_rate as f64).ceil() as usize;

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, RESAMPLER_CHUNK, 2, 1)
            .map_err(|e| EncodingError::Resample(e.to_string()))?;

    let mut output = Vec::with_capacity(expected_len);
    let mut pos = 0;

    while pos < input.len() {
        let needed = resampler.input_frames_next();
        let end = (pos + needed).min(input.len());

        let mut chunk = input[pos..end].to_vec();
        chunk.resize(needed, 0.0);

        let resampled = resampler
            .process(std::slice::from_ref(&chunk), None)
            .map_err(|e| EncodingError::Resample(e.to_string()))?;

        output.extend(
            resampled[0]
                .iter()
                .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16),
        );
        pos = end;
    }

    output.truncate(expected_len);
    Ok(output)
}

/// Mix interleaved frames down to mono
pub fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

/// Peak level of a buffer, 0.0-1.0
pub fn peak_level(samples: &[i16]) -> f32 {
    samples
        .iter()
        .map(|&s| (s as i32).unsigned_abs())
        .max()
        .map(|peak| (peak as f32 / 32768.0).min(1.0))
        .unwrap_or(0.0)
}

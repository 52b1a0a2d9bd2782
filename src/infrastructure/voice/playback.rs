//! Rodio-based playback of local audio files

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::cpal::Device;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::application::ports::VoiceError;
use crate::domain::voice::Volume;

/// One loaded source on its own output stream
pub struct RodioPlayback {
    // Dropping the stream silences the sink
    _stream: OutputStream,
    sink: Sink,
    duration: Option<Duration>,
}

impl RodioPlayback {
    /// Decode `path` and queue it paused on `device` (default output when `None`)
    pub fn open(path: &Path, device: Option<&Device>, volume: Volume) -> Result<Self, VoiceError> {
        let decoder = open_decoder(path)?;
        let duration = decoder.total_duration();

        let (stream, handle) = match device {
            Some(device) => OutputStream::try_from_device(device),
            None => OutputStream::try_default(),
        }
        .map_err(|e| VoiceError::DeviceNotAvailable(e.to_string()))?;

        let sink = Sink::try_new(&handle).map_err(|e| VoiceError::Aborted(e.to_string()))?;
        sink.pause();
        sink.set_volume(volume.level());
        sink.append(decoder);

        Ok(Self {
            _stream: stream,
            sink,
            duration,
        })
    }

    pub fn play(&self) {
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    /// True once the queued source has played out
    pub fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    pub fn set_volume(&self, volume: Volume) {
        self.sink.set_volume(volume.level());
    }

    pub fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    pub fn seek(&self, position: Duration) -> Result<(), VoiceError> {
        self.sink
            .try_seek(position)
            .map_err(|e| VoiceError::Aborted(format!("Seek failed: {}", e)))
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        self.sink.stop();
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, VoiceError> {
    let file = File::open(path)
        .map_err(|e| VoiceError::Io(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| VoiceError::Decode(e.to_string()))
}

/// Read the duration of a local file without opening an output stream
pub fn read_duration(path: &Path) -> Result<Option<Duration>, VoiceError> {
    Ok(open_decoder(path)?.total_duration())
}

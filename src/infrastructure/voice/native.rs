//! Native voice sessions: rodio playback and cpal capture
//!
//! A session holds at most one native handle at a time, either a loaded
//! playback or a running capture. Recording and playback are mutually
//! exclusive on one session.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::capture::CpalCapture;
use super::encoder::write_recording;
use super::playback::{read_duration, RodioPlayback};
use crate::application::ports::{VoiceError, VoiceSession, VoiceSessionFactory};
use crate::domain::voice::{is_network_reference, VoiceState, Volume};
use crate::infrastructure::routing::CpalAudioRouting;

/// Duration reply when the source length is unknown
const UNKNOWN_DURATION: f32 = -1.0;

enum Handle {
    Idle,
    Playback(RodioPlayback),
    Capture { capture: CpalCapture, target: PathBuf },
}

/// Creates [`NativeVoice`] sessions sharing one routing selection
#[derive(Debug, Clone)]
pub struct NativeVoiceFactory {
    routing: CpalAudioRouting,
    sample_rate: u32,
}

impl NativeVoiceFactory {
    pub fn new(routing: CpalAudioRouting, sample_rate: u32) -> Self {
        Self {
            routing,
            sample_rate,
        }
    }
}

impl VoiceSessionFactory for NativeVoiceFactory {
    type Session = NativeVoice;

    fn create(&self, id: &str, source: &str) -> NativeVoice {
        NativeVoice {
            id: id.to_string(),
            source: source.to_string(),
            state: VoiceState::None,
            handle: Handle::Idle,
            volume: Volume::default(),
            pending_seek: None,
            routing: self.routing.clone(),
            sample_rate: self.sample_rate,
        }
    }
}

pub struct NativeVoice {
    id: String,
    source: String,
    state: VoiceState,
    handle: Handle,
    volume: Volume,
    /// Seek requested before a source was loaded
    pending_seek: Option<Duration>,
    routing: CpalAudioRouting,
    sample_rate: u32,
}

impl NativeVoice {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    fn is_recording(&self) -> bool {
        matches!(self.handle, Handle::Capture { .. })
    }

    fn invalid(&self, action: &str) -> VoiceError {
        VoiceError::InvalidState {
            action: action.to_string(),
            state: if self.is_recording() {
                "recording".to_string()
            } else {
                self.state().to_string()
            },
        }
    }

    fn load(&mut self) -> Result<(), VoiceError> {
        if is_network_reference(&self.source) {
            return Err(VoiceError::NotSupported(format!(
                "streaming {}",
                self.source
            )));
        }

        let device = self.routing.resolve_output_device();
        let playback = RodioPlayback::open(Path::new(&self.source), device.as_ref(), self.volume)?;
        if let Some(position) = self.pending_seek.take() {
            playback.seek(position)?;
        }

        debug!(id = %self.id, source = %self.source, "loaded playback");
        self.handle = Handle::Playback(playback);
        Ok(())
    }

    fn finish_capture(&mut self) -> Result<(), VoiceError> {
        let Handle::Capture { capture, target } = std::mem::replace(&mut self.handle, Handle::Idle)
        else {
            return Ok(());
        };

        self.state = VoiceState::Stopped;
        let audio = capture.stop();
        if audio.is_empty() {
            warn!(id = %self.id, "no audio captured");
        }

        let format = write_recording(&target, &audio, self.sample_rate)
            .map_err(|e| VoiceError::Io(e.to_string()))?;
        info!(
            id = %self.id,
            target = %target.display(),
            format = %format,
            seconds = audio.duration_secs(),
            "recording saved"
        );
        Ok(())
    }
}

impl VoiceSession for NativeVoice {
    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> VoiceState {
        match &self.handle {
            Handle::Playback(playback)
                if self.state == VoiceState::Running && playback.is_finished() =>
            {
                VoiceState::Stopped
            }
            _ => self.state,
        }
    }

    fn is_playing(&self) -> bool {
        match &self.handle {
            Handle::Playback(playback) => {
                self.state == VoiceState::Running && !playback.is_paused() && !playback.is_finished()
            }
            _ => false,
        }
    }

    fn start_recording(&mut self, file: &str) -> Result<(), VoiceError> {
        if self.is_recording() || self.is_playing() {
            return Err(self.invalid("start recording"));
        }
        if is_network_reference(file) {
            return Err(VoiceError::NotSupported(format!("recording to {}", file)));
        }

        self.state = VoiceState::Starting;
        let capture = match CpalCapture::start(self.sample_rate) {
            Ok(capture) => capture,
            Err(e) => {
                self.state = VoiceState::Stopped;
                return Err(e);
            }
        };

        self.source = file.to_string();
        self.handle = Handle::Capture {
            capture,
            target: PathBuf::from(file),
        };
        self.state = VoiceState::Running;
        debug!(id = %self.id, target = file, "recording started");
        Ok(())
    }

    fn stop_recording(&mut self) -> Result<(), VoiceError> {
        self.finish_capture()
    }

    fn start_playing(&mut self, file: Option<&str>) -> Result<(), VoiceError> {
        if self.is_recording() {
            return Err(self.invalid("start playing"));
        }

        if let Some(file) = file.filter(|f| *f != self.source) {
            self.source = file.to_string();
            self.handle = Handle::Idle;
        }

        let reload = match &self.handle {
            Handle::Playback(playback) => playback.is_finished(),
            _ => true,
        };
        if reload {
            self.state = VoiceState::Starting;
            if let Err(e) = self.load() {
                self.state = VoiceState::Stopped;
                return Err(e);
            }
        }

        if let Handle::Playback(playback) = &self.handle {
            playback.play();
        }
        self.state = VoiceState::Running;
        Ok(())
    }

    fn seek_to(&mut self, milliseconds: i64) -> Result<(), VoiceError> {
        let position = Duration::from_millis(milliseconds.max(0) as u64);
        match &self.handle {
            Handle::Playback(playback) => playback.seek(position),
            _ => {
                self.pending_seek = Some(position);
                Ok(())
            }
        }
    }

    fn pause_playing(&mut self) -> Result<(), VoiceError> {
        if let Handle::Playback(playback) = &self.handle {
            if self.state == VoiceState::Running {
                playback.pause();
                self.state = VoiceState::Paused;
            }
        }
        Ok(())
    }

    fn stop_playing(&mut self) -> Result<(), VoiceError> {
        if let Handle::Playback(_) = self.handle {
            self.handle = Handle::Idle;
            self.pending_seek = None;
            self.state = VoiceState::Stopped;
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), VoiceError> {
        self.volume = volume;
        if let Handle::Playback(playback) = &self.handle {
            playback.set_volume(volume);
        }
        Ok(())
    }

    fn current_position_ms(&self) -> i64 {
        match &self.handle {
            Handle::Playback(playback) => playback.position().as_millis() as i64,
            _ => self
                .pending_seek
                .map(|p| p.as_millis() as i64)
                .unwrap_or(0),
        }
    }

    fn duration(&mut self, file: &str) -> f32 {
        if let Handle::Playback(playback) = &self.handle {
            if file == self.source {
                return playback
                    .duration()
                    .map(|d| d.as_secs_f32())
                    .unwrap_or(UNKNOWN_DURATION);
            }
        }

        if is_network_reference(file) {
            return UNKNOWN_DURATION;
        }

        match read_duration(Path::new(file)) {
            Ok(Some(duration)) => duration.as_secs_f32(),
            Ok(None) => UNKNOWN_DURATION,
            Err(e) => {
                debug!(id = %self.id, file, error = %e, "duration lookup failed");
                UNKNOWN_DURATION
            }
        }
    }

    fn power(&self) -> f32 {
        match &self.handle {
            Handle::Capture { capture, .. } => capture.level(),
            _ => 0.0,
        }
    }

    fn destroy(&mut self) {
        if let Err(e) = self.finish_capture() {
            warn!(id = %self.id, error = %e, "recording lost on release");
        }
        self.handle = Handle::Idle;
        self.state = VoiceState::Stopped;
    }
}

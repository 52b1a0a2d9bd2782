//! Voice command dispatcher
//!
//! [`VoiceHandler`] owns the registry of voice sessions keyed by the
//! caller's id, translates host commands into session calls and pauses
//! playback across phone-call interruptions.
//!
//! Error posture:
//! - control commands on an unknown id are logged no-ops
//! - position and power queries on an unknown id return -1
//! - an unparsable volume is logged and ignored
//! - a reference the resolver rejects is used raw
//! - native session failures propagate to the caller

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::voice::{
    strip_file_protocol, CommandError, OutputDevice, PhoneSignal, VoiceCommand, VoiceReply,
    VoiceState, Volume,
};

use super::ports::{
    AudioRouting, ResourceResolver, RoutingError, VoiceError, VoiceSession, VoiceSessionFactory,
};

/// Sentinel returned by numeric queries on an unknown session
pub const UNKNOWN_SESSION: f32 = -1.0;

/// Errors from command execution
#[derive(Debug, Error)]
pub enum VoiceHandlerError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Voice session failed: {0}")]
    Session(#[from] VoiceError),

    #[error("Audio routing failed: {0}")]
    Routing(#[from] RoutingError),
}

impl VoiceHandlerError {
    /// True when the action name was not recognized, so the outer
    /// layer should report its generic "not handled" error
    pub fn is_unhandled(&self) -> bool {
        matches!(self, Self::Command(CommandError::Unrecognized(_)))
    }
}

/// Dispatcher and session registry
pub struct VoiceHandler<F, R, O>
where
    F: VoiceSessionFactory,
    R: ResourceResolver,
    O: AudioRouting,
{
    factory: F,
    resolver: R,
    routing: O,
    players: HashMap<String, F::Session>,
    paused_for_phone: Vec<String>,
}

impl<F, R, O> VoiceHandler<F, R, O>
where
    F: VoiceSessionFactory,
    R: ResourceResolver,
    O: AudioRouting,
{
    /// Create a handler with an empty registry
    pub fn new(factory: F, resolver: R, routing: O) -> Self {
        Self {
            factory,
            resolver,
            routing,
            players: HashMap::new(),
            paused_for_phone: Vec::new(),
        }
    }

    /// Decode and execute a raw host action
    pub fn execute_action(
        &mut self,
        action: &str,
        args: &[Value],
    ) -> Result<VoiceReply, VoiceHandlerError> {
        let command = VoiceCommand::decode(action, args)?;
        self.execute(command)
    }

    /// Execute a decoded command
    pub fn execute(&mut self, command: VoiceCommand) -> Result<VoiceReply, VoiceHandlerError> {
        debug!(action = command.action(), id = ?command.session_id(), "executing voice command");

        let reply = match command {
            VoiceCommand::StartRecording { id, target } => {
                let file = self.resolve_target(&target);
                self.start_recording(&id, &file)?;
                VoiceReply::Ack
            }
            VoiceCommand::StopRecording { id } => {
                self.stop_recording(&id)?;
                VoiceReply::Ack
            }
            VoiceCommand::StartPlaying { id, target } => {
                let file = self.resolve_target(&target);
                self.start_playing(&id, &file)?;
                VoiceReply::Ack
            }
            VoiceCommand::SeekTo { id, milliseconds } => {
                self.seek_to(&id, milliseconds)?;
                VoiceReply::Ack
            }
            VoiceCommand::PausePlaying { id } => {
                self.pause_playing(&id)?;
                VoiceReply::Ack
            }
            VoiceCommand::StopPlaying { id } => {
                self.stop_playing(&id)?;
                VoiceReply::Ack
            }
            VoiceCommand::SetVolume { id, level } => {
                self.set_volume(&id, &level)?;
                VoiceReply::Ack
            }
            VoiceCommand::GetCurrentPosition { id } => {
                VoiceReply::Position(self.current_position(&id))
            }
            VoiceCommand::GetDuration { id, target } => {
                let file = strip_file_protocol(&target);
                VoiceReply::Duration(self.duration(&id, &file))
            }
            VoiceCommand::Create { id, target } => {
                self.create(&id, &target);
                VoiceReply::Ack
            }
            VoiceCommand::Release { id } => VoiceReply::Released(self.release(&id)),
            VoiceCommand::GetPower { id } => VoiceReply::Power(self.power(&id)),
            VoiceCommand::GetOutputDevice => VoiceReply::OutputDevice(self.output_device()),
            VoiceCommand::SetOutputDevice { code } => {
                self.set_output_device_code(code)?;
                VoiceReply::Ack
            }
        };

        Ok(reply)
    }

    /// Remap a target through the resolver (raw on failure), then strip `file://`
    pub fn resolve_target(&self, target: &str) -> String {
        let remapped = match self.resolver.remap(target) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!(target, error = %e, "resource not resolved, using raw reference");
                target.to_string()
            }
        };
        strip_file_protocol(&remapped)
    }

    /// The single place sessions are created lazily
    fn session_or_create(&mut self, id: &str, source: &str) -> &mut F::Session {
        let factory = &self.factory;
        self.players.entry(id.to_string()).or_insert_with(|| {
            debug!(id, source, "creating voice session");
            factory.create(id, source)
        })
    }

    fn existing(&mut self, id: &str, action: &str) -> Option<&mut F::Session> {
        let session = self.players.get_mut(id);
        if session.is_none() {
            debug!(id, action, "unknown voice session, ignoring");
        }
        session
    }

    /// Start recording into `file`, creating the session if needed
    pub fn start_recording(&mut self, id: &str, file: &str) -> Result<(), VoiceError> {
        self.session_or_create(id, file).start_recording(file)
    }

    pub fn stop_recording(&mut self, id: &str) -> Result<(), VoiceError> {
        match self.existing(id, "stopRecording") {
            Some(session) => session.stop_recording(),
            None => Ok(()),
        }
    }

    /// Start or resume playing `file`, creating the session if needed
    pub fn start_playing(&mut self, id: &str, file: &str) -> Result<(), VoiceError> {
        self.session_or_create(id, file).start_playing(Some(file))
    }

    pub fn seek_to(&mut self, id: &str, milliseconds: i64) -> Result<(), VoiceError> {
        match self.existing(id, "seekTo") {
            Some(session) => session.seek_to(milliseconds),
            None => Ok(()),
        }
    }

    pub fn pause_playing(&mut self, id: &str) -> Result<(), VoiceError> {
        match self.existing(id, "pausePlaying") {
            Some(session) => session.pause_playing(),
            None => Ok(()),
        }
    }

    /// Stop playback; the session is kept
    pub fn stop_playing(&mut self, id: &str) -> Result<(), VoiceError> {
        match self.existing(id, "stopPlaying") {
            Some(session) => session.stop_playing(),
            None => Ok(()),
        }
    }

    /// Set the output level from its raw string form
    pub fn set_volume(&mut self, id: &str, level: &str) -> Result<(), VoiceError> {
        let volume = match level.parse::<Volume>() {
            Ok(volume) => volume,
            Err(e) => {
                warn!(id, error = %e, "ignoring volume change");
                return Ok(());
            }
        };

        match self.players.get_mut(id) {
            Some(session) => session.set_volume(volume),
            None => {
                warn!(id, "setVolume on unknown voice session");
                Ok(())
            }
        }
    }

    /// Playback position in seconds, or -1 for an unknown session
    pub fn current_position(&self, id: &str) -> f32 {
        match self.players.get(id) {
            Some(session) => session.current_position_ms() as f32 / 1000.0,
            None => UNKNOWN_SESSION,
        }
    }

    /// Duration as reported by the session, creating it if needed
    pub fn duration(&mut self, id: &str, file: &str) -> f32 {
        self.session_or_create(id, file).duration(file)
    }

    /// Register a session without starting it. A session already
    /// registered under `id` is destroyed and replaced.
    pub fn create(&mut self, id: &str, source: &str) {
        let source = strip_file_protocol(source);
        let session = self.factory.create(id, &source);
        if let Some(mut replaced) = self.players.insert(id.to_string(), session) {
            debug!(id, "replacing existing voice session");
            replaced.destroy();
            self.paused_for_phone.retain(|paused| paused != id);
        }
    }

    /// Destroy and remove a session. Returns false if there was none.
    pub fn release(&mut self, id: &str) -> bool {
        let Some(mut session) = self.players.remove(id) else {
            return false;
        };
        session.destroy();
        self.paused_for_phone.retain(|paused| paused != id);
        true
    }

    /// Recording input level, or -1 for an unknown session
    pub fn power(&self, id: &str) -> f32 {
        self.players
            .get(id)
            .map(|session| session.power())
            .unwrap_or(UNKNOWN_SESSION)
    }

    pub fn output_device(&self) -> OutputDevice {
        self.routing.output_device()
    }

    pub fn set_output_device(&mut self, device: OutputDevice) -> Result<(), RoutingError> {
        self.routing.set_output_device(device)
    }

    /// Set routing from a host device code; unknown codes are logged and ignored
    pub fn set_output_device_code(&mut self, code: i64) -> Result<(), RoutingError> {
        match OutputDevice::from_code(code) {
            Some(device) => self.set_output_device(device),
            None => {
                error!(code, "unknown output device");
                Ok(())
            }
        }
    }

    /// Handle a platform message. Only telephony state changes
    /// on the telephone channel have an effect.
    pub fn on_message(&mut self, channel: &str, data: &str) -> Result<(), VoiceError> {
        match PhoneSignal::from_message(channel, data) {
            Some(signal) => self.on_phone_signal(signal),
            None => Ok(()),
        }
    }

    /// Pause or resume every affected session. A session that fails is
    /// logged and skipped; the first failure is returned once all
    /// sessions have been visited.
    pub fn on_phone_signal(&mut self, signal: PhoneSignal) -> Result<(), VoiceError> {
        let mut first_error = None;
        match signal {
            PhoneSignal::Started => {
                for (id, session) in self.players.iter_mut() {
                    if !session.is_playing() {
                        continue;
                    }
                    debug!(id = %id, "pausing for phone call");
                    match session.pause_playing() {
                        Ok(()) => {
                            if !self.paused_for_phone.contains(id) {
                                self.paused_for_phone.push(id.clone());
                            }
                        }
                        Err(e) => {
                            warn!(id = %id, error = %e, "failed to pause for phone call");
                            first_error.get_or_insert(e);
                        }
                    }
                }
            }
            PhoneSignal::Ended => {
                for id in &self.paused_for_phone {
                    let Some(session) = self.players.get_mut(id) else {
                        continue;
                    };
                    debug!(id = %id, "resuming after phone call");
                    if let Err(e) = session.start_playing(None) {
                        warn!(id = %id, error = %e, "failed to resume after phone call");
                        first_error.get_or_insert(e);
                    }
                }
                self.paused_for_phone.clear();
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Destroy every session and clear the registry
    pub fn on_destroy(&mut self) {
        for (_, mut session) in self.players.drain() {
            session.destroy();
        }
        self.paused_for_phone.clear();
    }

    /// Navigation reset tears down like destroy
    pub fn on_reset(&mut self) {
        self.on_destroy();
    }

    pub fn has_session(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    pub fn session(&self, id: &str) -> Option<&F::Session> {
        self.players.get(id)
    }

    pub fn session_state(&self, id: &str) -> Option<VoiceState> {
        self.players.get(id).map(|session| session.state())
    }

    pub fn session_count(&self) -> usize {
        self.players.len()
    }

    /// Ids of sessions paused by an ongoing interruption
    pub fn paused_for_interruption(&self) -> &[String] {
        &self.paused_for_phone
    }
}

impl<F, R, O> Drop for VoiceHandler<F, R, O>
where
    F: VoiceSessionFactory,
    R: ResourceResolver,
    O: AudioRouting,
{
    fn drop(&mut self) {
        self.on_destroy();
    }
}

//! Voice session domain: states, commands, sources and interruption signals

pub mod command;
pub mod interruption;
pub mod output;
pub mod source;
pub mod state;
pub mod volume;

pub use command::{CommandError, VoiceCommand, VoiceReply, ACTIONS};
pub use interruption::{PhoneSignal, TELEPHONE_CHANNEL};
pub use output::OutputDevice;
pub use source::{is_network_reference, strip_file_protocol};
pub use state::VoiceState;
pub use volume::Volume;

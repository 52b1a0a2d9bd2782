//! Voice Bridge - multi-session voice recording and playback
//!
//! A host-facing bridge that keeps a registry of voice sessions keyed by
//! caller-chosen ids, dispatches record/playback commands to them, and
//! pauses playback while a phone call is in progress.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Commands, replies, session states, volume and config value objects
//! - **Application**: The voice dispatcher and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (rodio, cpal, filesystem, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

//! shufflebox - playlist-driven audio playback engine.
//!
//! Scans a folder of `.wav` files into an ordered playlist, plays entries
//! through an audio sink one at a time, keeps a per-track dB gain that
//! travels with its entry through reshuffles, and persists playlist state
//! to a sorted text report and a JSON document.
//!
//! The UI layer (tables, key handling, file dialogs) is deliberately
//! external: it drives [`PlayerEngine`] through its command surface and
//! calls [`PlayerEngine::pump`] periodically to let auto-advance run.

pub mod audio;
pub mod config;
pub mod error;
pub mod gain;
pub mod library;
pub mod persist;

pub use audio::{
    AudioOutput, AudioSink, AudioSource, Cursor, PlayerEngine, RodioOutput, TransitionReason,
};
pub use config::Settings;
pub use error::{EngineError, Result};
pub use library::{Entry, Playlist};

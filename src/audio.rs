//! Playback engine: sink abstraction, background streaming and the
//! state machine that drives which entry is current.

mod engine;
mod sink;
mod stream;
mod types;

pub use engine::PlayerEngine;
pub use sink::{AudioOutput, AudioSink, AudioSource, RodioOutput};
pub use types::{Cursor, TransitionReason};

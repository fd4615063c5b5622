//! Audio-related small types.
//!
//! This module defines the playback cursor, the transition-reason tag
//! attached to every play call and the events the background streaming
//! task reports back to the engine.

/// Why a play transition happened.
///
/// Attached to each play call and surfaced in logs. Auto-advance
/// suppression itself is carried by the stream generation (stale
/// completions) and by [`Cursor::suspended_by_user`] (pause), so a
/// manually started track still auto-advances when it ends naturally.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransitionReason {
    /// Natural completion advanced or wrapped the cursor.
    Auto,
    /// `next()` / `previous()`.
    Manual,
    /// Resume via the pause toggle when no sink was open.
    UserPause,
    /// Direct selection of an entry.
    DirectSelect,
}

/// Playback position within the current playlist.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Current entry index. Defaults to 0 before first playback, even on
    /// an empty playlist; valid once playback has started at least once.
    pub index: usize,
    /// Whether a sink is open and streaming (not paused).
    pub playing: bool,
    /// Set by a user pause; a natural completion that arrives while this
    /// is set does not auto-advance.
    pub suspended_by_user: bool,
}

/// How a streaming task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StreamOutcome {
    /// Source fully drained and the sink flushed its buffered frames.
    Completed,
    /// The sink was closed underneath the task (superseded track).
    Interrupted,
    /// Source read failed mid-stream.
    Failed(String),
}

/// Sent by a streaming task when it exits, tagged with the track
/// generation it was started for so stale completions can be ignored.
#[derive(Debug, Clone)]
pub(crate) struct StreamEvent {
    pub generation: u64,
    pub outcome: StreamOutcome,
}

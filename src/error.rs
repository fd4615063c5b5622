//! Error taxonomy for the playback engine.
//!
//! Every command-surface operation returns one of these instead of
//! aborting; background streaming failures are reported through the
//! stream event channel and logged, never propagated as panics.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Folder missing or unreadable during a scan. The caller ends up
    /// with an empty playlist.
    #[error("cannot scan folder {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file is not a valid/supported audio stream.
    #[error("cannot decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Output device unavailable, sink open failure, or rejected gain.
    #[error("audio device error: {0}")]
    Device(String),

    /// Read/write failure on an export/import file.
    #[error("persistence failure on {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("playlist is empty")]
    EmptyPlaylist,

    #[error("playlist index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Export requires a folder to have been opened first.
    #[error("no folder open")]
    NoFolderOpen,
}

pub type Result<T> = std::result::Result<T, EngineError>;

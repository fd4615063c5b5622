use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/shufflebox/config.toml` or
/// `~/.config/shufflebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SHUFFLEBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Samples copied from source to sink per write.
    pub chunk_samples: usize,
    /// Lower bound of the sink's gain control, in dB.
    pub gain_floor_db: f32,
    /// Upper bound of the sink's gain control, in dB.
    pub gain_ceiling_db: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            chunk_samples: 4096,
            gain_floor_db: -80.0,
            gain_ceiling_db: 6.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extension to treat as audio (without dot).
    ///
    /// The filter is a case-sensitive suffix match on the file name,
    /// mirroring how saved reports were produced historically.
    pub extension: String,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extension: "wav".to_string(),
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// dB step applied per gain up/down command.
    pub gain_step: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { gain_step: 0.1 }
    }
}

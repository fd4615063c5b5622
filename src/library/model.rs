use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::thread_rng;

/// One playlist row: a playable file plus its associated gain.
///
/// `name` is derived from the file name at scan time and does not change;
/// `gain` is device dB, mutated only through gain operations. Because the
/// gain lives inside the entry, it travels with the entry through any
/// reorder.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub gain: f32,
}

impl Entry {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            path,
            name,
            gain: 0.0,
        }
    }
}

/// Ordered collection of entries plus the folder they were scanned from.
///
/// Replaced wholesale on folder-open or import; shuffles and gain edits
/// never change its length.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    entries: Vec<Entry>,
    folder: Option<PathBuf>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_scan(folder: PathBuf, entries: Vec<Entry>) -> Self {
        Self {
            entries,
            folder: Some(folder),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    /// Re-order the entries with a uniformly random permutation.
    /// Each entry keeps its own gain through the move.
    pub fn shuffle(&mut self) {
        self.entries.shuffle(&mut thread_rng());
    }

    /// Add `delta` to the stored gain at `index`. The stored value is not
    /// clamped; clamping happens when the gain is applied to a sink.
    pub fn adjust_gain(&mut self, index: usize, delta: f32) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.gain += delta;
        }
    }

    /// Overwrite gains from `(name, gain)` pairs by exact name match.
    ///
    /// The first entry with a matching name wins; entries without a match
    /// keep their current gain. Returns how many pairs found a match.
    pub fn merge_gains<I, S>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (S, f32)>,
        S: AsRef<str>,
    {
        let mut matched = 0;
        for (name, gain) in pairs {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name.as_ref()) {
                entry.gain = gain;
                matched += 1;
            }
        }
        matched
    }
}

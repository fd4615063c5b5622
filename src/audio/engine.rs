//! The playback state machine.
//!
//! `PlayerEngine` owns the playlist, the cursor and at most one open
//! sink. All commands run on the caller's thread; the only background
//! work is the per-track streaming task, which reports back over an
//! mpsc channel. Callers pump that channel periodically so natural
//! completions can auto-advance the cursor.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{EngineError, Result};
use crate::gain;
use crate::library::{self, Playlist};
use crate::persist;

use super::sink::{AudioOutput, AudioSink};
use super::stream::spawn_stream_task;
use super::types::{Cursor, StreamEvent, StreamOutcome, TransitionReason};

struct ActiveStream<S> {
    sink: Arc<S>,
    reason: TransitionReason,
    join: Option<JoinHandle<()>>,
}

pub struct PlayerEngine<O: AudioOutput> {
    output: O,
    settings: Settings,
    playlist: Playlist,
    cursor: Cursor,
    active: Option<ActiveStream<O::Sink>>,
    /// Bumped whenever a sink is opened or closed; completions carrying
    /// an older generation belong to a superseded track and are ignored.
    generation: u64,
    events_tx: Sender<StreamEvent>,
    events_rx: Receiver<StreamEvent>,
}

impl<O: AudioOutput> PlayerEngine<O> {
    pub fn new(output: O, settings: Settings) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            output,
            settings,
            playlist: Playlist::new(),
            cursor: Cursor::default(),
            active: None,
            generation: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Replace the playlist with a fresh scan of `dir`, gains reset to
    /// zero, shuffled, cursor back at the top, playback stopped.
    ///
    /// A failed scan leaves an empty playlist and surfaces the error.
    pub fn open_folder(&mut self, dir: &Path) -> Result<()> {
        self.close_active();
        self.cursor = Cursor::default();

        let entries = match library::scan(dir, &self.settings.library) {
            Ok(entries) => entries,
            Err(err) => {
                self.playlist = Playlist::new();
                return Err(err);
            }
        };

        self.playlist = Playlist::from_scan(dir.to_path_buf(), entries);
        self.playlist.shuffle();
        info!(count = self.playlist.len(), "opened folder {}", dir.display());
        Ok(())
    }

    /// Start playing the entry at `index`.
    pub fn play_at(&mut self, index: usize) -> Result<()> {
        self.start_track(index, TransitionReason::DirectSelect)
    }

    /// Pause/resume. With no sink open this behaves like
    /// `play_at(cursor.index)`.
    pub fn toggle_pause(&mut self) -> Result<()> {
        match &self.active {
            None => self.start_track(self.cursor.index, TransitionReason::UserPause),
            Some(active) if self.cursor.playing => {
                active.sink.stop();
                self.cursor.playing = false;
                self.cursor.suspended_by_user = true;
                Ok(())
            }
            Some(active) => {
                active.sink.start();
                self.cursor.playing = true;
                self.cursor.suspended_by_user = false;
                Ok(())
            }
        }
    }

    /// Advance the cursor by one and play. Out of bounds is a no-op.
    pub fn next(&mut self) -> Result<()> {
        if self.cursor.index + 1 < self.playlist.len() {
            self.start_track(self.cursor.index + 1, TransitionReason::Manual)
        } else {
            Ok(())
        }
    }

    /// Retreat the cursor by one and play. Out of bounds is a no-op.
    pub fn previous(&mut self) -> Result<()> {
        if self.cursor.index > 0 && !self.playlist.is_empty() {
            self.start_track(self.cursor.index - 1, TransitionReason::Manual)
        } else {
            Ok(())
        }
    }

    /// Adjust the current entry's stored gain by `delta` dB and, if a
    /// sink is open, apply it immediately so the change is audible
    /// without restarting playback.
    pub fn adjust_gain(&mut self, delta: f32) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(EngineError::EmptyPlaylist);
        }
        let index = self.cursor.index;
        self.playlist.adjust_gain(index, delta);
        if let (Some(active), Some(entry)) = (&self.active, self.playlist.entry(index)) {
            gain::apply(entry.gain, &*active.sink);
        }
        Ok(())
    }

    /// Export the playlist as a sorted plain-text report.
    pub fn save_report(&self, path: &Path) -> Result<()> {
        persist::write_report(path, self.playlist.entries())
    }

    /// Export folder + per-file gains as a JSON state document.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let folder = self.playlist.folder().ok_or(EngineError::NoFolderOpen)?;
        persist::write_document(path, folder, self.playlist.entries())
    }

    /// Restore state from a JSON document: rescan its folder (order
    /// comes from the fresh scan, not the document), then merge gains
    /// onto the new entries by exact file name. Either section may be
    /// absent; whichever is present is applied.
    pub fn import_state(&mut self, path: &Path) -> Result<()> {
        let doc = persist::read_document(path)?;

        if let Some(folder) = &doc.folder_path {
            self.open_folder(Path::new(folder))?;
        }
        if !doc.files.is_empty() {
            let matched = self.playlist.merge_gains(doc.files);
            info!(matched, "merged gains from {}", path.display());
        }
        Ok(())
    }

    /// Suggested file name for `save_report`, `<folder>.txt`.
    pub fn suggested_report_name(&self) -> Option<String> {
        persist::suggested_file_name(self.playlist.folder()?, "txt")
    }

    /// Suggested file name for `export_state`, `<folder>.json`.
    pub fn suggested_document_name(&self) -> Option<String> {
        persist::suggested_file_name(self.playlist.folder()?, "json")
    }

    /// Process completions reported by streaming tasks and run the
    /// auto-advance rule. Call this periodically.
    pub fn pump(&mut self) {
        let events: Vec<StreamEvent> = self.events_rx.try_iter().collect();
        for event in events {
            self.handle_stream_event(event);
        }
    }

    fn handle_stream_event(&mut self, event: StreamEvent) {
        if event.generation != self.generation {
            debug!(
                generation = event.generation,
                current = self.generation,
                "ignoring stale stream event"
            );
            return;
        }

        match event.outcome {
            StreamOutcome::Interrupted => {
                // Close raced with the event; nothing left to do but go idle.
                self.close_active();
            }
            StreamOutcome::Failed(message) => {
                // The track is abandoned; no retry, no skip-ahead.
                warn!(index = self.cursor.index, "stream failed: {message}");
                self.close_active();
            }
            StreamOutcome::Completed => {
                let reason = self.active.as_ref().map(|a| a.reason);
                debug!(index = self.cursor.index, ?reason, "track completed");
                self.close_active();

                if self.cursor.suspended_by_user {
                    // Completion slipped in around a user pause; stay put.
                    self.cursor.suspended_by_user = false;
                    return;
                }
                self.auto_advance();
            }
        }
    }

    /// Natural-completion rule: step to the next entry, or wrap by
    /// reshuffling the whole playlist and restarting at the top. A
    /// one-entry playlist reshuffles too (a no-op) and the same track
    /// starts again.
    fn auto_advance(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        let target = if self.cursor.index + 1 < self.playlist.len() {
            self.cursor.index + 1
        } else {
            self.playlist.shuffle();
            0
        };
        if let Err(err) = self.start_track(target, TransitionReason::Auto) {
            warn!(index = target, "auto-advance failed: {err}");
        }
    }

    fn start_track(&mut self, index: usize, reason: TransitionReason) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(EngineError::EmptyPlaylist);
        }
        let entry = self
            .playlist
            .entry(index)
            .ok_or(EngineError::IndexOutOfBounds(index))?
            .clone();

        // Mutual exclusion: the old sink is fully closed and its task
        // joined before the new sink opens.
        self.close_active();

        let (sink, source) = self.output.open(&entry)?;
        self.generation += 1;

        self.cursor.index = index;
        self.cursor.suspended_by_user = false;

        // Gain goes in after open, before any samples flow.
        gain::apply(entry.gain, &*sink);
        sink.start();

        let join = spawn_stream_task(
            source,
            Arc::clone(&sink),
            self.generation,
            self.settings.audio.chunk_samples,
            self.events_tx.clone(),
        );
        self.active = Some(ActiveStream {
            sink,
            reason,
            join: Some(join),
        });
        self.cursor.playing = true;
        info!(index, name = %entry.name, ?reason, "starting track");
        Ok(())
    }

    /// Close the open sink, if any, and wait for its streaming task to
    /// exit. Bumps the generation so anything that task still reported
    /// is recognizably stale.
    fn close_active(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.sink.close();
            if let Some(join) = active.join.take() {
                let _ = join.join();
            }
            self.generation += 1;
        }
        self.cursor.playing = false;
    }
}

impl<O: AudioOutput> Drop for PlayerEngine<O> {
    fn drop(&mut self) {
        self.close_active();
    }
}

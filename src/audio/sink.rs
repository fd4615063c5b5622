//! Sink and source abstractions plus the `rodio`-backed implementation.
//!
//! The engine never talks to the device directly: it opens one sink per
//! track through [`AudioOutput`], applies gain, and hands the sink to a
//! background task that copies samples from the [`AudioSource`] in
//! chunks. Closing a sink must make a blocked `write`/`drain` fail
//! promptly; that is the only cancellation mechanism.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::config::AudioSettings;
use crate::error::{EngineError, Result};
use crate::library::Entry;

/// Decoded sample stream for one track. `Ok(0)` means end of stream.
pub trait AudioSource: Send {
    fn read_chunk(&mut self, buf: &mut [f32]) -> Result<usize>;
}

/// Destination for decoded audio frames, owned exclusively by the
/// currently playing track. Opened per track, never reused.
pub trait AudioSink: Send + Sync {
    /// Gain control range as `(min_db, max_db)`.
    fn gain_range(&self) -> (f32, f32);
    /// Set the gain control. Values outside the range may be rejected.
    fn set_gain(&self, db: f32) -> Result<()>;
    /// Resume consumption of buffered frames.
    fn start(&self);
    /// Suspend consumption; buffered frames are retained.
    fn stop(&self);
    /// Queue a chunk of samples, blocking while the device is backed up.
    /// Fails promptly once the sink is closed.
    fn write(&self, samples: &[f32]) -> Result<()>;
    /// Block until all queued frames have been consumed.
    fn drain(&self) -> Result<()>;
    /// Stop and release the sink. Unblocks any pending `write`/`drain`.
    fn close(&self);
}

/// Opens sinks on some audio device. The device handle itself outlives
/// individual tracks; the sinks it produces do not.
pub trait AudioOutput {
    type Sink: AudioSink + 'static;

    fn open(&mut self, entry: &Entry) -> Result<(Arc<Self::Sink>, Box<dyn AudioSource>)>;
}

/// Chunks queued ahead of the mixer before `write` starts blocking.
/// Small so pause and close take effect within a chunk or two.
const MAX_QUEUED_CHUNKS: usize = 3;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// `rodio`-backed output: one `OutputStream` for the process lifetime,
/// one `Sink` per track.
pub struct RodioOutput {
    stream: OutputStream,
    settings: AudioSettings,
}

impl RodioOutput {
    pub fn new(settings: AudioSettings) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Device(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when OutputStream is dropped. Useful in
        // debugging, noisy otherwise.
        stream.log_on_drop(false);
        Ok(Self { stream, settings })
    }
}

impl AudioOutput for RodioOutput {
    type Sink = RodioSink;

    fn open(&mut self, entry: &Entry) -> Result<(Arc<RodioSink>, Box<dyn AudioSource>)> {
        let file = File::open(&entry.path).map_err(|e| EngineError::Decode {
            path: entry.path.clone(),
            message: e.to_string(),
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
            path: entry.path.clone(),
            message: e.to_string(),
        })?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();

        let inner = Sink::connect_new(self.stream.mixer());
        // The engine applies gain and starts the sink explicitly.
        inner.pause();

        let sink = Arc::new(RodioSink {
            inner,
            channels,
            sample_rate,
            gain_range: (self.settings.gain_floor_db, self.settings.gain_ceiling_db),
            closed: AtomicBool::new(false),
        });
        Ok((sink, Box::new(RodioSource { decoder })))
    }
}

pub struct RodioSink {
    inner: Sink,
    channels: u16,
    sample_rate: u32,
    gain_range: (f32, f32),
    closed: AtomicBool,
}

impl RodioSink {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl AudioSink for RodioSink {
    fn gain_range(&self) -> (f32, f32) {
        self.gain_range
    }

    fn set_gain(&self, db: f32) -> Result<()> {
        if self.is_closed() {
            return Err(EngineError::Device("sink is closed".to_string()));
        }
        // dB -> linear amplitude for rodio's volume control.
        self.inner.set_volume(10f32.powf(db / 20.0));
        Ok(())
    }

    fn start(&self) {
        self.inner.play();
    }

    fn stop(&self) {
        self.inner.pause();
    }

    fn write(&self, samples: &[f32]) -> Result<()> {
        loop {
            if self.is_closed() {
                return Err(EngineError::Device("sink closed during write".to_string()));
            }
            if self.inner.len() <= MAX_QUEUED_CHUNKS {
                break;
            }
            // Device backed up (or paused): wait for room.
            std::thread::sleep(POLL_INTERVAL);
        }
        self.inner.append(SamplesBuffer::new(
            self.channels,
            self.sample_rate,
            samples.to_vec(),
        ));
        Ok(())
    }

    fn drain(&self) -> Result<()> {
        loop {
            if self.is_closed() {
                return Err(EngineError::Device("sink closed during drain".to_string()));
            }
            if self.inner.empty() {
                return Ok(());
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.inner.stop();
    }
}

struct RodioSource {
    decoder: Decoder<BufReader<File>>,
}

impl AudioSource for RodioSource {
    fn read_chunk(&mut self, buf: &mut [f32]) -> Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.decoder.next() {
                Some(sample) => {
                    buf[n] = sample;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

//! Background streaming task.
//!
//! Copies decoded samples from source to sink in fixed-size chunks until
//! end-of-stream or until the sink is closed underneath it, then reports
//! how it ended together with the track generation it was started for.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::debug;

use super::sink::{AudioSink, AudioSource};
use super::types::{StreamEvent, StreamOutcome};

pub(super) fn spawn_stream_task<S>(
    mut source: Box<dyn AudioSource>,
    sink: Arc<S>,
    generation: u64,
    chunk_samples: usize,
    events: Sender<StreamEvent>,
) -> JoinHandle<()>
where
    S: AudioSink + 'static,
{
    thread::spawn(move || {
        let outcome = run_stream(source.as_mut(), &*sink, chunk_samples);
        debug!(generation, ?outcome, "stream task exiting");
        // The engine may already be gone on shutdown; nothing to do then.
        let _ = events.send(StreamEvent {
            generation,
            outcome,
        });
    })
}

fn run_stream(
    source: &mut dyn AudioSource,
    sink: &dyn AudioSink,
    chunk_samples: usize,
) -> StreamOutcome {
    let mut buf = vec![0.0f32; chunk_samples.max(1)];
    loop {
        match source.read_chunk(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if sink.write(&buf[..n]).is_err() {
                    // Closed underneath us: the track was superseded.
                    return StreamOutcome::Interrupted;
                }
            }
            Err(err) => return StreamOutcome::Failed(err.to_string()),
        }
    }
    match sink.drain() {
        Ok(()) => StreamOutcome::Completed,
        Err(_) => StreamOutcome::Interrupted,
    }
}

//! Progress checkpoints and where they are delivered.

use std::{
    fmt::{self, Display, Formatter},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
        mpsc::Sender,
    },
};

use log::info;

use crate::pipeline::PipelineState;

/// One checkpoint, emitted just before a stage runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// One-based
    pub step: usize,
    pub total: usize,
    pub state: PipelineState,
    pub message: String,
}

impl Display for ProgressEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.step, self.total, self.message)
    }
}

/// Receives the checkpoints of one job.
///
/// Called on the pipeline thread; implementations must not block.
pub trait ProgressSink {
    fn report(&self, event: ProgressEvent);
}

impl<T: ProgressSink + ?Sized> ProgressSink for Arc<T> {
    fn report(&self, event: ProgressEvent) {
        (**self).report(event);
    }
}

/// Forwards events over an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelSink(Sender<ProgressEvent>);

impl ChannelSink {
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self(sender)
    }
}

impl ProgressSink for ChannelSink {
    fn report(&self, event: ProgressEvent) {
        // a receiver that went away is not the job's problem
        let _ = self.0.send(event);
    }
}

/// Logs every event at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn report(&self, event: ProgressEvent) {
        info!("{event}");
    }
}

/// Keeps only the latest step number.
#[derive(Debug, Default)]
pub struct AtomicProgress {
    step: AtomicUsize,
}

impl AtomicProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported step, 0 before the first checkpoint.
    pub fn current(&self) -> usize {
        self.step.load(Ordering::Acquire)
    }
}

impl ProgressSink for AtomicProgress {
    fn report(&self, event: ProgressEvent) {
        self.step.store(event.step, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::*;

    fn event(step: usize) -> ProgressEvent {
        ProgressEvent {
            step,
            total: 6,
            state: PipelineState::Merging,
            message: "Merging fonts".to_string(),
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(event(4).to_string(), "[4/6] Merging fonts");
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (tx, rx) = channel();
        let sink = ChannelSink::new(tx);
        sink.report(event(1));
        sink.report(event(2));
        let steps: Vec<usize> = rx.try_iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![1, 2]);
    }

    #[test]
    fn test_channel_sink_ignores_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        ChannelSink::new(tx).report(event(1));
    }

    #[test]
    fn test_atomic_progress_through_arc() {
        let progress = Arc::new(AtomicProgress::new());
        assert_eq!(progress.current(), 0);
        let sink: Arc<AtomicProgress> = Arc::clone(&progress);
        sink.report(event(3));
        sink.report(event(5));
        assert_eq!(progress.current(), 5);
    }
}

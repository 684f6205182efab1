//! duofont core - merge a Latin and an Arabic font into one and prove it
//! renders both scripts.
//!
//! A [`MergeJob`] names the two inputs and the output directory;
//! [`Pipeline::run`] takes it through six stages (unitsPerEm reconciliation,
//! two subsets, merge, light and dark previews), reporting each checkpoint to
//! a [`ProgressSink`] and ending with one [`PipelineResult`].

pub mod config;
pub mod io;
mod job;
pub mod pipeline;
mod progress;
mod result;

pub use config::{ConfigError, PipelineConfig};
pub use job::{JobError, MergeJob};
pub use pipeline::{JobHandle, Pipeline, PipelineState, spawn};
pub use progress::{AtomicProgress, ChannelSink, LogSink, ProgressEvent, ProgressSink};
pub use result::{FailureKind, PipelineResult, Warning};

pub use duofont_font_ops::{FontAsset, FontParseError, inspect, reconcile};
pub use duofont_font_subsetter::{CodepointRangeSet, Subsetter};

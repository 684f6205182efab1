//! Job execution: the stage state machine, progress checkpoints, and the
//! background thread a job runs on.

mod cleanup;
mod steps;

use std::{
    fmt::{self, Display, Formatter},
    thread::{self, JoinHandle},
    time::Instant,
};

use anyhow::{Context, Result};
use log::{debug, error, info};
use tempfile::TempDir;

use crate::{
    config::{TOTAL_STEPS, WORKDIR_PREFIX},
    job::MergeJob,
    progress::{ProgressEvent, ProgressSink},
    result::{FailureKind, PipelineResult},
};
use steps::{JobContext, PipelineStep, STEPS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Init,
    UnifyingUnits,
    SubsettingLatin,
    SubsettingArabic,
    Merging,
    RenderingPreviewLight,
    RenderingPreviewDark,
    Done,
    Failed,
}

impl PipelineState {
    /// Checkpoint text shown when entering the state.
    pub fn description(self) -> &'static str {
        match self {
            PipelineState::Init => "Starting",
            PipelineState::UnifyingUnits => "Unifying unitsPerEm",
            PipelineState::SubsettingLatin => "Subsetting Latin font",
            PipelineState::SubsettingArabic => "Subsetting Arabic font",
            PipelineState::Merging => "Merging fonts",
            PipelineState::RenderingPreviewLight => "Rendering light preview",
            PipelineState::RenderingPreviewDark => "Rendering dark preview",
            PipelineState::Done => "Done",
            PipelineState::Failed => "Failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Run `job` to completion on the calling thread.
    ///
    /// Reports one checkpoint per stage to `sink`, six in all when the job
    /// succeeds; a disabled dark preview still gets its checkpoint. On
    /// failure the remaining stages are skipped and anything already
    /// written to the output directory is removed. The working directory is
    /// removed either way.
    pub fn run(job: &MergeJob, sink: &dyn ProgressSink) -> PipelineResult {
        let start = Instant::now();
        info!(
            "Merging {} + {} into {}",
            job.latin_path().display(),
            job.arabic_path().display(),
            job.output_dir().display()
        );
        debug!("state: {}", PipelineState::Init);

        match execute(job, sink) {
            Ok(result) => {
                info!(
                    "{} in {:.2}s, {} warnings",
                    PipelineState::Done,
                    start.elapsed().as_secs_f64(),
                    result.warnings().len()
                );
                result
            }
            Err(err) => {
                let result = PipelineResult::failure(&err);
                error!("{}: {err:#}", PipelineState::Failed);
                result
            }
        }
    }
}

fn execute(job: &MergeJob, sink: &dyn ProgressSink) -> Result<PipelineResult> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(WORKDIR_PREFIX);
    let workdir = match job.work_root() {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .context("Failed to create working directory")?;
    debug!("Working directory: {}", workdir.path().display());

    let mut ctx = JobContext::new(job, workdir.path());
    for (i, step) in STEPS.iter().enumerate() {
        run_step(step, i + 1, sink, &mut ctx)?;
    }
    let result = ctx.finish()?;
    close(workdir);
    Ok(result)
}

fn run_step(
    (state, step_fn): &PipelineStep,
    step_num: usize,
    sink: &dyn ProgressSink,
    ctx: &mut JobContext,
) -> Result<()> {
    let message = if *state == PipelineState::RenderingPreviewDark && !ctx.job.dark_preview() {
        "Skipping dark preview (disabled)".to_string()
    } else {
        state.description().to_string()
    };
    debug!("[{step_num}/{TOTAL_STEPS}] {message}");
    sink.report(ProgressEvent { step: step_num, total: TOTAL_STEPS, state: *state, message });

    let start = Instant::now();
    step_fn(ctx)?;
    debug!("  {state} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(())
}

/// Remove the working directory, logging instead of failing a finished job.
fn close(workdir: TempDir) {
    let path = workdir.path().to_path_buf();
    if let Err(err) = workdir.close() {
        error!("Failed to remove working directory {}: {err}", path.display());
    }
}

/// A job running on its own thread.
#[derive(Debug)]
pub struct JobHandle {
    thread: JoinHandle<PipelineResult>,
}

impl JobHandle {
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the job's result.
    pub fn join(self) -> PipelineResult {
        self.thread.join().unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "job thread panicked".to_string());
            PipelineResult::Failure { kind: FailureKind::Internal, message }
        })
    }
}

/// Run `job` on a dedicated thread.
///
/// There is no cancellation: once spawned, the job runs until it succeeds or
/// fails. Callers submit one job at a time.
pub fn spawn<S>(job: MergeJob, sink: S) -> JobHandle
where
    S: ProgressSink + Send + 'static,
{
    let thread = thread::spawn(move || Pipeline::run(&job, &sink));
    JobHandle { thread }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_cover_every_stage_once() {
        let states: Vec<PipelineState> = STEPS.iter().map(|(state, _)| *state).collect();
        assert_eq!(
            states,
            vec![
                PipelineState::UnifyingUnits,
                PipelineState::SubsettingLatin,
                PipelineState::SubsettingArabic,
                PipelineState::Merging,
                PipelineState::RenderingPreviewLight,
                PipelineState::RenderingPreviewDark,
            ]
        );
        assert_eq!(STEPS.len(), TOTAL_STEPS);
        assert!(states.iter().all(|s| !s.is_terminal()));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Merging.to_string(), "Merging fonts");
        assert!(PipelineState::Failed.is_terminal());
    }
}

use std::{path::PathBuf, sync::mpsc::channel};

use anyhow::{Result, bail};
use duofont_core::{ChannelSink, MergeJob, PipelineConfig, PipelineResult, spawn};
use duofont_font_subsetter::CodepointRangeSet;

#[derive(Debug, Clone)]
pub struct MergeArgs {
    pub latin: PathBuf,
    pub arabic: PathBuf,
    pub output_dir: PathBuf,
    pub dark: bool,
    pub latin_ranges: Option<CodepointRangeSet>,
    pub arabic_ranges: Option<CodepointRangeSet>,
}

impl MergeArgs {
    pub fn job(self) -> Result<MergeJob> {
        let mut config = PipelineConfig::new();
        if let Some(ranges) = self.latin_ranges {
            config = config.with_latin_ranges(ranges);
        }
        if let Some(ranges) = self.arabic_ranges {
            config = config.with_arabic_ranges(ranges);
        }
        Ok(MergeJob::new(self.latin, self.arabic, self.output_dir)?
            .with_dark_preview(self.dark)
            .with_config(config)?)
    }
}

/// Run the pipeline on a background thread, printing checkpoints as they arrive.
pub fn merge(args: MergeArgs) -> Result<()> {
    let job = args.job()?;
    println!("Merging {} + {}", job.latin_path().display(), job.arabic_path().display());

    let (tx, rx) = channel();
    let handle = spawn(job, ChannelSink::new(tx));
    for event in rx {
        println!("{event}");
    }

    match handle.join() {
        result @ PipelineResult::Success { .. } => {
            println!("{result}");
            Ok(())
        }
        PipelineResult::Failure { kind, message } => bail!("{kind} error: {message}"),
    }
}

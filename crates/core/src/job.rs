use std::{
    fs::canonicalize,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::config::{ConfigError, PipelineConfig};

#[derive(Error, Debug)]
pub enum JobError {
    #[error("cannot merge {} with itself", .0.display())]
    SelfMerge(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One request to merge a Latin and an Arabic font.
#[derive(Debug, Clone)]
pub struct MergeJob {
    latin_path: PathBuf,
    arabic_path: PathBuf,
    output_dir: PathBuf,
    dark_preview: bool,
    config: PipelineConfig,
    work_root: Option<PathBuf>,
}

impl MergeJob {
    /// Fails when both inputs are the same file.
    pub fn new(
        latin_path: impl Into<PathBuf>,
        arabic_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, JobError> {
        let latin_path = latin_path.into();
        let arabic_path = arabic_path.into();
        if same_file(&latin_path, &arabic_path) {
            return Err(JobError::SelfMerge(latin_path));
        }
        Ok(Self {
            latin_path,
            arabic_path,
            output_dir: output_dir.into(),
            dark_preview: false,
            config: PipelineConfig::default(),
            work_root: None,
        })
    }

    pub fn with_dark_preview(mut self, dark_preview: bool) -> Self {
        self.dark_preview = dark_preview;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Result<Self, JobError> {
        self.config = config.validate()?;
        Ok(self)
    }

    /// Create the job's working directory under `dir` instead of the
    /// system temporary directory.
    pub fn with_work_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_root = Some(dir.into());
        self
    }

    pub fn latin_path(&self) -> &Path {
        &self.latin_path
    }

    pub fn arabic_path(&self) -> &Path {
        &self.arabic_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn dark_preview(&self) -> bool {
        self.dark_preview
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn work_root(&self) -> Option<&Path> {
        self.work_root.as_deref()
    }
}

/// Compares canonical paths when both exist, the paths as given otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (canonicalize(a), canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use duofont_font_subsetter::CodepointRangeSet;

    use super::*;

    #[test]
    fn test_self_merge_rejected() {
        let err = MergeJob::new("a.ttf", "a.ttf", "out").unwrap_err();
        assert!(matches!(err, JobError::SelfMerge(_)));
    }

    #[test]
    fn test_self_merge_through_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("font.ttf");
        write(&font, b"").unwrap();
        let dotted = dir.path().join(".").join("font.ttf");
        assert!(matches!(MergeJob::new(&font, &dotted, "out"), Err(JobError::SelfMerge(_))));
    }

    #[test]
    fn test_defaults() {
        let job = MergeJob::new("latin.ttf", "arabic.ttf", "out").unwrap();
        assert!(!job.dark_preview());
        assert_eq!(job.config(), &PipelineConfig::default());
        assert!(job.with_dark_preview(true).dark_preview());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig::new().with_arabic_ranges(CodepointRangeSet::latin());
        let err = MergeJob::new("latin.ttf", "arabic.ttf", "out")
            .unwrap()
            .with_config(config)
            .unwrap_err();
        assert!(matches!(err, JobError::Config(ConfigError::OverlappingRanges { .. })));
    }
}

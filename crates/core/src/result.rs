use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use duofont_font_merger::{MergeError, MergeWarning};
use duofont_font_ops::{FontParseError, UnitsRewrite};
use duofont_font_subsetter::SubsetFailure;
use duofont_preview::RenderFallback;

/// The single outcome of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Success { merged_font_path: PathBuf, preview_paths: Vec<PathBuf>, warnings: Vec<Warning> },
    Failure { kind: FailureKind, message: String },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            PipelineResult::Success { warnings, .. } => warnings,
            PipelineResult::Failure { .. } => &[],
        }
    }

    pub(crate) fn failure(err: &anyhow::Error) -> Self {
        PipelineResult::Failure { kind: FailureKind::classify(err), message: format!("{err:#}") }
    }
}

impl Display for PipelineResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PipelineResult::Success { merged_font_path, preview_paths, warnings } => {
                write!(f, "Merged font: {}", merged_font_path.display())?;
                for path in preview_paths {
                    write!(f, "\nPreview: {}", path.display())?;
                }
                for warning in warnings {
                    write!(f, "\nWarning: {warning}")?;
                }
                Ok(())
            }
            PipelineResult::Failure { kind, message } => write!(f, "{kind} error: {message}"),
        }
    }
}

/// Degraded behavior the job recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// unitsPerEm was rewritten in the header only.
    UnitsRewritten(UnitsRewrite),
    /// Subsetting failed and the full font went into the merge.
    Subset(SubsetFailure),
    Merge(MergeWarning),
    /// The preview was not drawn with the merged font.
    Render(RenderFallback),
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnitsRewritten(rewrite) => Display::fmt(rewrite, f),
            Warning::Subset(failure) => Display::fmt(failure, f),
            Warning::Merge(warning) => Display::fmt(warning, f),
            Warning::Render(fallback) => write!(f, "preview: {fallback}"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// An input is not a readable font
    FontParse,
    /// The fonts cannot be combined
    Merge,
    /// Reading or writing files failed, including preview encoding
    Io,
    /// The job thread panicked
    Internal,
}

impl FailureKind {
    /// Kind of the innermost typed error in `err`'s chain.
    pub fn classify(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<FontParseError>().is_some() {
            FailureKind::FontParse
        } else if err.downcast_ref::<MergeError>().is_some() {
            FailureKind::Merge
        } else {
            FailureKind::Io
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::FontParse => "font parse",
            FailureKind::Merge => "merge",
            FailureKind::Io => "I/O",
            FailureKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

//! The six stages of a job, in order.
//!
//! Stages hand fonts to each other through files in the job's working
//! directory; only the merged font and the previews go to the output
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use duofont_font_merger::Merger;
use duofont_font_ops::{FontAsset, inspect, reconcile_report};
use duofont_font_subsetter::{CodepointRangeSet, Subsetter};
use duofont_preview::{ColorScheme, PreviewRequest, render};
use log::{debug, info, warn};

use super::{PipelineState, cleanup::OutputGuard};
use crate::{
    config::{MERGED_FONT_NAME, preview_file_name},
    io::FontFile,
    job::MergeJob,
    result::{PipelineResult, Warning},
};

pub(crate) type PipelineStep = (PipelineState, fn(&mut JobContext) -> Result<()>);

pub(crate) const STEPS: &[PipelineStep] = &[
    (PipelineState::UnifyingUnits, unify_units),
    (PipelineState::SubsettingLatin, subset_latin),
    (PipelineState::SubsettingArabic, subset_arabic),
    (PipelineState::Merging, merge),
    (PipelineState::RenderingPreviewLight, preview_light),
    (PipelineState::RenderingPreviewDark, preview_dark),
];

#[derive(Clone, Copy)]
enum Script {
    Latin,
    Arabic,
}

impl Script {
    fn name(self) -> &'static str {
        match self {
            Script::Latin => "Latin",
            Script::Arabic => "Arabic",
        }
    }
}

/// Everything a running job accumulates.
pub(crate) struct JobContext<'a> {
    pub job: &'a MergeJob,
    workdir: &'a Path,
    outputs: OutputGuard,
    merged_font_path: Option<PathBuf>,
    merged_font: Option<FontAsset>,
    preview_paths: Vec<PathBuf>,
    warnings: Vec<Warning>,
}

impl<'a> JobContext<'a> {
    pub fn new(job: &'a MergeJob, workdir: &'a Path) -> Self {
        Self {
            job,
            workdir,
            outputs: OutputGuard::new(job.output_dir()),
            merged_font_path: None,
            merged_font: None,
            preview_paths: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Keep the outputs and turn them into a result.
    pub fn finish(mut self) -> Result<PipelineResult> {
        let merged_font_path =
            self.merged_font_path.take().context("Merge step did not produce a font")?;
        self.outputs.commit();
        Ok(PipelineResult::Success {
            merged_font_path,
            preview_paths: std::mem::take(&mut self.preview_paths),
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    fn source(&self, script: Script) -> &'a Path {
        match script {
            Script::Latin => self.job.latin_path(),
            Script::Arabic => self.job.arabic_path(),
        }
    }

    fn ranges(&self, script: Script) -> &'a CodepointRangeSet {
        match script {
            Script::Latin => self.job.config().latin_ranges(),
            Script::Arabic => self.job.config().arabic_ranges(),
        }
    }

    /// Font after unitsPerEm reconciliation.
    fn unified(&self, script: Script) -> FontFile {
        FontFile::new(self.workdir.join(format!("{}.ttf", script.name().to_lowercase())))
    }

    fn subset(&self, script: Script) -> FontFile {
        FontFile::new(self.workdir.join(format!("{}_subset.ttf", script.name().to_lowercase())))
    }
}

fn unify_units(ctx: &mut JobContext) -> Result<()> {
    let mut assets = Vec::with_capacity(2);
    for script in [Script::Latin, Script::Arabic] {
        let asset = inspect(ctx.source(script))
            .with_context(|| format!("Failed to inspect {} font", script.name()))?;
        match asset.summary() {
            Ok(summary) => debug!("{} font {}:\n{summary}", script.name(), asset.path().display()),
            Err(err) => warn!("Cannot summarize {} font: {err}", script.name()),
        }
        assets.push(asset);
    }

    let (assets, rewrites) = reconcile_report(assets);
    ctx.warnings.extend(rewrites.into_iter().map(Warning::UnitsRewritten));

    for (asset, script) in assets.iter().zip([Script::Latin, Script::Arabic]) {
        ctx.unified(script).write(asset.to_bytes())?;
    }
    Ok(())
}

fn subset_latin(ctx: &mut JobContext) -> Result<()> {
    subset_script(ctx, Script::Latin)
}

fn subset_arabic(ctx: &mut JobContext) -> Result<()> {
    subset_script(ctx, Script::Arabic)
}

/// Best effort: a failed subset passes the full font on with a warning.
fn subset_script(ctx: &mut JobContext, script: Script) -> Result<()> {
    let asset = inspect(ctx.unified(script).path())
        .with_context(|| format!("Failed to reload {} font", script.name()))?
        .with_path(ctx.source(script));

    let outcome = Subsetter::new().with_ranges(ctx.ranges(script).clone()).subset(asset);
    if let Some(failure) = outcome.warning() {
        ctx.warnings.push(Warning::Subset(failure));
    }
    ctx.subset(script).write(outcome.into_asset().to_bytes())
}

fn merge(ctx: &mut JobContext) -> Result<()> {
    let latin = ctx.subset(Script::Latin).read()?;
    let arabic = ctx.subset(Script::Arabic).read()?;

    let output = Merger::default().merge(&[&latin, &arabic]).context("Failed to merge fonts")?;
    ctx.warnings.extend(output.warnings.into_iter().map(Warning::Merge));

    let path = ctx.outputs.write(MERGED_FONT_NAME, &output.data)?;
    info!("Merged font: {} ({:.1} KB)", path.display(), output.data.len() as f64 / 1024.0);
    let asset = FontAsset::from_bytes(&path, &output.data).context("Merged font is unreadable")?;
    ctx.merged_font = Some(asset);
    ctx.merged_font_path = Some(path);
    Ok(())
}

fn preview_light(ctx: &mut JobContext) -> Result<()> {
    render_preview(ctx, ColorScheme::LIGHT)
}

fn preview_dark(ctx: &mut JobContext) -> Result<()> {
    if !ctx.job.dark_preview() {
        info!("Dark preview disabled");
        return Ok(());
    }
    render_preview(ctx, ColorScheme::DARK)
}

fn render_preview(ctx: &mut JobContext, scheme: ColorScheme) -> Result<()> {
    let asset = ctx.merged_font.as_ref().context("No merged font to preview")?;

    let config = ctx.job.config();
    let request = PreviewRequest::new(config.latin_sample(), config.arabic_sample(), scheme);
    let rendered = render(asset, &request)
        .with_context(|| format!("Failed to render {} preview", scheme.name()))?;
    if let Some(fallback) = rendered.warning {
        ctx.warnings.push(Warning::Render(fallback));
    }

    let name = preview_file_name(scheme.name(), &asset.stem());
    let path = ctx.outputs.write(&name, &rendered.jpeg)?;
    info!("Preview: {}", path.display());
    ctx.preview_paths.push(path);
    Ok(())
}

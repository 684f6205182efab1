use std::{
    fs::{create_dir_all, write},
    path::Path,
};

use anyhow::{Context, Result};
use duofont_core::config::{ARABIC_SAMPLE, LATIN_SAMPLE};
use duofont_font_ops::inspect;
use duofont_preview::{ColorScheme, PreviewRequest, render};
use log::warn;

pub fn preview(font: &Path, output: &Path, dark: bool) -> Result<()> {
    let asset = inspect(font).with_context(|| format!("Failed to inspect {}", font.display()))?;
    let scheme = if dark { ColorScheme::DARK } else { ColorScheme::LIGHT };

    let rendered = render(&asset, &PreviewRequest::new(LATIN_SAMPLE, ARABIC_SAMPLE, scheme))
        .context("Failed to render preview")?;
    if let Some(fallback) = &rendered.warning {
        warn!("{fallback}");
    }

    if let Some(parent) = output.parent() {
        create_dir_all(parent)?;
    }
    write(output, &rendered.jpeg)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Preview: {}", output.display());
    Ok(())
}

use std::path::Path;

use anyhow::{Context, Result};
use duofont_core::io::FontFile;
use duofont_font_ops::inspect;
use duofont_font_subsetter::{CodepointRangeSet, Subsetter};
use log::{info, warn};

/// Subset a font file to `ranges`; a failed subset copies the font unchanged.
pub fn subset_file(input: &Path, ranges: &CodepointRangeSet, output: &Path) -> Result<()> {
    let asset = inspect(input).with_context(|| format!("Failed to inspect {}", input.display()))?;
    let input_size = asset.to_bytes().len() as f64 / 1024.0;

    let outcome = Subsetter::new().with_ranges(ranges.clone()).subset(asset);
    if let Some(failure) = outcome.warning() {
        warn!("{failure}");
    }
    let data = outcome.into_asset().to_bytes();

    let file = FontFile::new(output);
    file.ensure_parent_dir()?;
    file.write(&data)?;

    let output_size = data.len() as f64 / 1024.0;
    info!(
        "Subset {} -> {} ({input_size:.1} KB -> {output_size:.1} KB)",
        input.file_name().unwrap_or_default().to_string_lossy(),
        output.file_name().unwrap_or_default().to_string_lossy(),
    );
    println!("Subset font: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::{read, write};

    use duofont_font_ops::{FontAsset, fixture::TestFont};

    use super::*;

    #[test]
    fn test_subset_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mixed.ttf");
        let output = dir.path().join("sub/latin.ttf");
        write(&input, TestFont::new("Mixed").glyph("A", 0x41).glyph("alef", 0x0627).build())
            .unwrap();

        subset_file(&input, &CodepointRangeSet::latin(), &output).unwrap();

        let asset = FontAsset::from_bytes(&output, &read(&output).unwrap()).unwrap();
        assert_eq!(asset.summary().unwrap().codepoints, 1);
    }
}

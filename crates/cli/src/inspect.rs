use std::path::Path;

use anyhow::{Context, Result};
use duofont_font_ops::inspect;

pub fn inspect_fonts(paths: &[impl AsRef<Path>]) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        let asset =
            inspect(path).with_context(|| format!("Failed to inspect {}", path.display()))?;
        println!("{}", path.display());
        println!("{}", asset.summary()?);
    }
    Ok(())
}

//! Merge TrueType fonts into one, after fontTools `merge.Merger`.
//!
//! Fonts are merged in priority order. The first font keeps its glyph IDs and
//! wins every codepoint and table it shares with a later font.

mod context;
mod error;
mod glyph_order;
mod merger;
mod options;
mod strategies;
mod tables;
mod types;
mod warning;

pub use context::{GidRemap, MergeContext};
pub use error::{MergeError, Result};
pub use glyph_order::{GlyphName, GlyphOrder};
pub use merger::Merger;
pub use options::Options;
pub use types::{Codepoint, FontIndex, GlyphId, MegaGlyphId, TableTag};
pub use warning::{MergeOutput, MergeWarning};

/// Merge fonts from raw byte slices using default options.
///
/// # Example
///
/// ```no_run
/// use duofont_font_merger::merge_fonts_bytes;
///
/// let latin = std::fs::read("latin.ttf").unwrap();
/// let arabic = std::fs::read("arabic.ttf").unwrap();
/// let merged = merge_fonts_bytes(&[&latin, &arabic]).unwrap();
/// for warning in &merged.warnings {
///     eprintln!("{warning}");
/// }
/// std::fs::write("merged.ttf", merged.data).unwrap();
/// ```
pub fn merge_fonts_bytes(fonts: &[&[u8]]) -> Result<MergeOutput> {
    Merger::default().merge(fonts)
}

//! Best-effort font subsetting by Unicode range.
//!
//! The subsetter keeps `.notdef`, every glyph the font maps from a codepoint in
//! the requested ranges, and the components those glyphs are built from. Glyphs
//! are renumbered in their original order, hinting is stripped, and tables
//! that index glyphs but cannot be rewritten here are dropped.
//!
//! Subsetting never fails outright. When a font cannot be subset the original
//! asset comes back inside [`SubsetOutcome::Degraded`] together with the
//! reason, and callers carry on with the full font.
//!
//! # Example
//!
//! ```no_run
//! use duofont_font_ops::inspect;
//! use duofont_font_subsetter::{CodepointRangeSet, Subsetter};
//!
//! let font = inspect("Amiri-Regular.ttf").unwrap();
//! let outcome = Subsetter::new().with_ranges(CodepointRangeSet::arabic()).subset(font);
//! if let Some(warning) = outcome.warning() {
//!     eprintln!("{warning}");
//! }
//! let subset = outcome.into_asset();
//! ```

mod error;
mod ranges;
mod subset;

use std::fmt::{self, Display, Formatter};

use duofont_font_ops::{FontAsset, OutlineFlavor};
use log::{info, warn};

pub use error::SubsetError;
pub use ranges::{ARABIC_RANGES, CodepointRangeSet, LATIN_RANGES, RangeParseError};

/// Hinting tables, dropped together with per-glyph instructions.
pub const HINTING_TABLES: &[&[u8; 4]] = &[b"fpgm", b"prep", b"cvt ", b"hdmx", b"LTSH", b"VDMX"];

/// Tables that index glyphs and are not rewritten, so cannot survive renumbering.
pub const UNREWRITABLE_TABLES: &[&[u8; 4]] = &[
    b"GSUB", b"GPOS", b"GDEF", b"JSTF", b"MATH", b"kern", b"vmtx", b"vhea", b"VORG", b"DSIG",
    b"gvar", b"cvar", b"HVAR", b"VVAR", b"COLR", b"sbix", b"CBDT", b"CBLC", b"EBDT", b"EBLC",
    b"SVG ",
];

/// Result of subsetting one font.
#[derive(Debug)]
pub enum SubsetOutcome {
    Subset(FontAsset),
    /// Subsetting failed; `asset` is the untouched input.
    Degraded { asset: FontAsset, reason: SubsetError },
}

impl SubsetOutcome {
    pub fn into_asset(self) -> FontAsset {
        match self {
            SubsetOutcome::Subset(asset) | SubsetOutcome::Degraded { asset, .. } => asset,
        }
    }

    pub fn asset(&self) -> &FontAsset {
        match self {
            SubsetOutcome::Subset(asset) | SubsetOutcome::Degraded { asset, .. } => asset,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SubsetOutcome::Degraded { .. })
    }

    /// Describes the fallback, if one happened.
    pub fn warning(&self) -> Option<SubsetFailure> {
        match self {
            SubsetOutcome::Subset(_) => None,
            SubsetOutcome::Degraded { asset, reason } => Some(SubsetFailure {
                path: asset.path().display().to_string(),
                reason: reason.to_string(),
            }),
        }
    }
}

/// A subsetting failure that was recovered from by keeping the full font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetFailure {
    pub path: String,
    pub reason: String,
}

impl Display for SubsetFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: subsetting failed ({}), using the full font", self.path, self.reason)
    }
}

/// Font subsetter with builder pattern.
#[derive(Debug, Clone, Default)]
pub struct Subsetter {
    ranges: CodepointRangeSet,
}

impl Subsetter {
    /// A subsetter with no ranges; it keeps only `.notdef`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A subsetter preset to [`LATIN_RANGES`].
    pub fn latin() -> Self {
        Self::new().with_ranges(CodepointRangeSet::latin())
    }

    /// A subsetter preset to [`ARABIC_RANGES`].
    pub fn arabic() -> Self {
        Self::new().with_ranges(CodepointRangeSet::arabic())
    }

    /// Replace the retained ranges.
    pub fn with_ranges(mut self, ranges: CodepointRangeSet) -> Self {
        self.ranges = ranges;
        self
    }

    /// Add `(start, end)` ranges, inclusive, to the retained set.
    pub fn with_unicode_ranges(mut self, ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.ranges = CodepointRangeSet::new(self.ranges.iter().chain(ranges));
        self
    }

    pub fn ranges(&self) -> &CodepointRangeSet {
        &self.ranges
    }

    /// Subset `asset`, falling back to it unchanged on any failure.
    pub fn subset(&self, asset: FontAsset) -> SubsetOutcome {
        let result = match asset.flavor() {
            OutlineFlavor::TrueType => subset::subset_truetype(&asset, &self.ranges),
            flavor => Err(SubsetError::UnsupportedFlavor(flavor)),
        };

        match result {
            Ok(subset) => {
                info!(
                    "Subset {} to {}: {} tables",
                    asset.path().display(),
                    self.ranges,
                    subset.table_count()
                );
                SubsetOutcome::Subset(subset)
            }
            Err(reason) => {
                warn!("Keeping full font {}: {reason}", asset.path().display());
                SubsetOutcome::Degraded { asset, reason }
            }
        }
    }
}

/// Subset `asset` to `ranges` (convenience function).
///
/// This is equivalent to `Subsetter::new().with_ranges(ranges.clone()).subset(asset)`.
pub fn subset(asset: FontAsset, ranges: &CodepointRangeSet) -> SubsetOutcome {
    Subsetter::new().with_ranges(ranges.clone()).subset(asset)
}

#[cfg(test)]
mod tests {
    use duofont_font_ops::fixture::TestFont;
    use read_fonts::{FontRef, TableProvider, types::Tag};

    use super::*;

    fn asset(data: &[u8]) -> FontAsset {
        FontAsset::from_bytes("test.ttf", data).unwrap()
    }

    fn mixed_font() -> FontAsset {
        asset(
            &TestFont::new("Mixed")
                .hinted()
                .glyph("A", 0x41)
                .glyph("B", 0x42)
                .glyph("alef", 0x0627)
                .glyph("beh", 0x0628)
                .unmapped_glyph("dot")
                .composite("beh.dotted", Some(0x067B), &["beh", "dot"])
                .table(b"GSUB", &[0, 1, 0, 0, 0, 10, 0, 10, 0, 10])
                .table(b"gasp", &[0, 1, 0, 1, 0xFF, 0xFF, 0, 0x0F])
                .build(),
        )
    }

    fn codepoints(asset: &FontAsset) -> Vec<u32> {
        let data = asset.to_bytes();
        let font = FontRef::new(&data).unwrap();
        duofont_font_ops::unicode_mappings(&font).unwrap().into_keys().collect()
    }

    #[test]
    fn test_builder_chain() {
        let subsetter = Subsetter::new()
            .with_unicode_ranges([(0x0041, 0x005A)])
            .with_unicode_ranges([(0x0061, 0x007A), (0x005B, 0x005B)]);
        assert_eq!(subsetter.ranges().iter().collect::<Vec<_>>(), vec![(0x41, 0x5B), (0x61, 0x7A)]);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Subsetter::latin().ranges(), &CodepointRangeSet::latin());
        assert_eq!(Subsetter::arabic().ranges().iter().count(), ARABIC_RANGES.len());
    }

    #[test]
    fn test_latin_subset_keeps_only_latin() {
        let outcome = Subsetter::latin().subset(mixed_font());
        assert!(!outcome.is_degraded());
        let subset = outcome.into_asset();

        assert_eq!(codepoints(&subset), vec![0x41, 0x42]);
        let data = subset.to_bytes();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.maxp().unwrap().num_glyphs(), 3);
        assert_eq!(font.hhea().unwrap().number_of_h_metrics(), 3);
    }

    #[test]
    fn test_closure_pulls_in_components() {
        let subset = subset(mixed_font(), &CodepointRangeSet::new([(0x067B, 0x067B)])).into_asset();
        let data = subset.to_bytes();
        let font = FontRef::new(&data).unwrap();

        // .notdef, beh, dot, beh.dotted
        assert_eq!(font.maxp().unwrap().num_glyphs(), 4);
        let post = font.post().unwrap();
        let names: Vec<_> = (0..4)
            .map(|gid| post.glyph_name(read_fonts::types::GlyphId16::new(gid)).unwrap().to_string())
            .collect();
        assert_eq!(names, vec![".notdef", "beh", "dot", "beh.dotted"]);

        let glyf = font.glyf().unwrap();
        let loca = font.loca(None).unwrap();
        let composite = loca.get_glyf(read_fonts::types::GlyphId::new(3), &glyf).unwrap().unwrap();
        assert_eq!(duofont_font_ops::component_gids(&composite), vec![1, 2]);
    }

    #[test]
    fn test_hinting_and_layout_dropped() {
        let subset = Subsetter::arabic().subset(mixed_font()).into_asset();
        for tag in HINTING_TABLES.iter().chain(UNREWRITABLE_TABLES) {
            assert!(!subset.has_table(Tag::new(tag)), "{} survived", Tag::new(tag));
        }
        assert!(subset.has_table(Tag::new(b"gasp")));
        assert!(subset.has_table(Tag::new(b"name")));
        assert!(subset.has_table(Tag::new(b"OS/2")));

        let data = subset.to_bytes();
        let font = FontRef::new(&data).unwrap();
        let glyf = font.glyf().unwrap();
        let loca = font.loca(None).unwrap();
        let Some(read_fonts::tables::glyf::Glyph::Simple(simple)) =
            loca.get_glyf(read_fonts::types::GlyphId::new(1), &glyf).unwrap()
        else {
            panic!("expected a simple glyph");
        };
        assert!(simple.instructions().is_empty());
        assert_eq!(font.maxp().unwrap().max_size_of_instructions(), Some(0));
    }

    #[test]
    fn test_deterministic() {
        let a = Subsetter::arabic().subset(mixed_font()).into_asset().to_bytes();
        let b = Subsetter::arabic().subset(mixed_font()).into_asset().to_bytes();
        assert_eq!(a, b);

        let font = FontRef::new(&a).unwrap();
        let head = font.head().unwrap();
        assert_eq!(head.created().as_secs(), 0);
        assert_eq!(head.modified().as_secs(), 0);
    }

    #[test]
    fn test_empty_selection_keeps_core_tables() {
        let subset = Subsetter::new().subset(mixed_font()).into_asset();
        for tag in [b"head", b"hhea", b"hmtx", b"maxp", b"cmap", b"glyf", b"loca"] {
            assert!(subset.has_table(Tag::new(tag)));
        }
        assert!(codepoints(&subset).is_empty());
    }

    #[test]
    fn test_cff_degrades_to_original() {
        let data = TestFont::new("Cff").glyph("A", 0x41).build();
        let mut cff_font = FontAsset::from_bytes("cff.otf", &data).unwrap();
        // strip the TrueType outlines and claim CFF ones
        let rebuilt = {
            let mut builder = write_fonts::FontBuilder::new();
            for (tag, table) in cff_font.tables() {
                if tag != Tag::new(b"glyf") && tag != Tag::new(b"loca") {
                    builder.add_raw(tag, table.to_vec());
                }
            }
            builder.add_raw(Tag::new(b"CFF "), vec![1, 0, 4, 1]);
            builder.build()
        };
        cff_font = FontAsset::from_bytes("cff.otf", &rebuilt).unwrap();

        let outcome = Subsetter::latin().subset(cff_font.clone());
        assert!(outcome.is_degraded());
        assert!(matches!(
            outcome,
            SubsetOutcome::Degraded { reason: SubsetError::UnsupportedFlavor(OutlineFlavor::Cff), .. }
        ));
        assert_eq!(outcome.asset(), &cff_font);
        assert!(outcome.warning().unwrap().to_string().contains("cff.otf"));
    }

    #[test]
    fn test_malformed_loca_degrades() {
        let data = TestFont::new("Huge").glyph("A", 0x41).declared_glyph_count(65535).build();
        let original = asset(&data);
        let outcome = Subsetter::latin().subset(original.clone());
        assert!(outcome.is_degraded());
        assert_eq!(outcome.into_asset(), original);
    }
}

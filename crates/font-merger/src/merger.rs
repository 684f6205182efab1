//! Main Merger implementation

use std::collections::HashSet;

use log::{Level, info, log, warn};
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::FontBuilder;

use crate::{
    MergeError, MergeOutput, MergeWarning, Result,
    context::MergeContext,
    glyph_order::GlyphOrder,
    options::Options,
    tables::{
        cmap::merge_cmap, glyf::merge_glyf, head::merge_head, hhea::merge_hhea,
        hint::{HINT_TABLES, check_hint_compatibility},
        hmtx::merge_hmtx, maxp::merge_maxp, os2::merge_os2, post::merge_post,
    },
    types::FontIndex,
};

/// Tables every input must carry.
const REQUIRED_TABLES: [Tag; 7] = [
    Tag::new(b"head"),
    Tag::new(b"hhea"),
    Tag::new(b"hmtx"),
    Tag::new(b"maxp"),
    Tag::new(b"cmap"),
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
];

/// Tables written from merged data rather than copied.
const REBUILT_TABLES: [Tag; 9] = [
    Tag::new(b"head"),
    Tag::new(b"hhea"),
    Tag::new(b"hmtx"),
    Tag::new(b"maxp"),
    Tag::new(b"cmap"),
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
    Tag::new(b"post"),
    Tag::new(b"OS/2"),
];

/// Per-glyph tables that go stale once the glyph count changes, whichever
/// font they come from.
const STALE_TABLES: [Tag; 7] = [
    Tag::new(b"hdmx"),
    Tag::new(b"LTSH"),
    Tag::new(b"vmtx"),
    Tag::new(b"vhea"),
    Tag::new(b"gvar"),
    Tag::new(b"HVAR"),
    Tag::new(b"VVAR"),
];

/// Tables indexed by glyph ID. Only the first font's glyph IDs survive the
/// merge, so only its copies are usable.
const FIRST_FONT_ONLY_TABLES: [Tag; 16] = [
    Tag::new(b"GSUB"),
    Tag::new(b"GPOS"),
    Tag::new(b"GDEF"),
    Tag::new(b"JSTF"),
    Tag::new(b"MATH"),
    Tag::new(b"kern"),
    Tag::new(b"VORG"),
    Tag::new(b"COLR"),
    Tag::new(b"sbix"),
    Tag::new(b"CBDT"),
    Tag::new(b"CBLC"),
    Tag::new(b"EBDT"),
    Tag::new(b"EBLC"),
    Tag::new(b"SVG "),
    Tag::new(b"cvar"),
    Tag::new(b"VDMX"),
];

const DSIG: Tag = Tag::new(b"DSIG");
const POST: Tag = Tag::new(b"post");
const OS2: Tag = Tag::new(b"OS/2");

/// Font merger that combines TrueType fonts into one
#[derive(Debug, Default)]
pub struct Merger {
    options: Options,
}

impl Merger {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Merge raw font files, in priority order.
    pub fn merge(&self, font_data: &[&[u8]]) -> Result<MergeOutput> {
        let fonts: Vec<FontRef> = font_data
            .iter()
            .map(|data| FontRef::new(data))
            .collect::<std::result::Result<_, _>>()?;

        self.merge_fonts(&fonts)
    }

    pub fn merge_fonts(&self, fonts: &[FontRef]) -> Result<MergeOutput> {
        validate(fonts)?;
        check_hint_compatibility(fonts);

        let glyph_order = GlyphOrder::compute(fonts);
        let total_glyphs = glyph_order.total_glyphs();
        info!("Merging {} fonts with {total_glyphs} total glyphs", fonts.len());

        let ctx = MergeContext::new(fonts, glyph_order, &self.options);

        let (cmap, mut warnings) = merge_cmap(&ctx)?;
        let (glyf, loca, loca_format) = merge_glyf(&ctx)?;
        let hmtx = merge_hmtx(&ctx)?;
        let hhea = merge_hhea(fonts, total_glyphs)?;
        let maxp = merge_maxp(fonts, total_glyphs)?;
        let head = merge_head(fonts, loca_format)?;
        let post = merge_post(&ctx)?;

        let mut builder = FontBuilder::new();
        builder.add_table(&head)?;
        builder.add_table(&hhea)?;
        builder.add_table(&hmtx)?;
        builder.add_table(&maxp)?;
        builder.add_table(&cmap)?;
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;
        // the core tables are required; post and OS/2 may be dropped on request
        if !self.options.should_drop(POST) {
            builder.add_table(&post)?;
        }
        if !self.options.should_drop(OS2)
            && let Some(os2) = merge_os2(fonts)?
        {
            builder.add_table(&os2)?;
        }

        warnings.extend(self.copy_other_tables(&mut builder, &ctx));

        Ok(MergeOutput { data: builder.build(), warnings })
    }

    /// Carry over everything that is not rebuilt. The first font to have a
    /// table wins; tables that would index the wrong glyphs are dropped.
    fn copy_other_tables(
        &self,
        builder: &mut FontBuilder,
        ctx: &MergeContext,
    ) -> Vec<MergeWarning> {
        let level = if self.options.verbose { Level::Info } else { Level::Debug };
        let mut copied: HashSet<Tag> = HashSet::new();
        let mut warnings = Vec::new();

        for (font_idx, font, _) in ctx.fonts_with_remap() {
            for record in font.table_directory.table_records() {
                let tag = record.tag();
                if REBUILT_TABLES.contains(&tag) || copied.contains(&tag) {
                    continue;
                }
                if self.options.should_drop(tag) || tag == DSIG {
                    log!(level, "{font_idx}: skipping '{tag}'");
                    continue;
                }

                let stale = STALE_TABLES.contains(&tag);
                let foreign = !font_idx.is_first()
                    && (FIRST_FONT_ONLY_TABLES.contains(&tag) || HINT_TABLES.contains(&tag));
                if stale || foreign {
                    // hinting programs are covered by the compatibility check
                    if !HINT_TABLES.contains(&tag) {
                        let warning = MergeWarning::DroppedTable { tag, font: font_idx };
                        warn!("{warning}");
                        warnings.push(warning);
                    }
                    continue;
                }

                if let Some(data) = font.table_data(tag) {
                    log!(level, "{font_idx}: copying '{tag}'");
                    builder.add_raw(tag, data.as_bytes().to_vec());
                    copied.insert(tag);
                }
            }
        }

        warnings
    }
}

/// Reject inputs the merger cannot produce a valid font from.
fn validate(fonts: &[FontRef]) -> Result<()> {
    let Some(first) = fonts.first() else {
        return Err(MergeError::NoFonts);
    };

    for (i, font) in fonts.iter().enumerate() {
        let font_idx = FontIndex::new(i);
        let has = |tag: &[u8; 4]| font.table_data(Tag::new(tag)).is_some();
        if !has(b"glyf") && (has(b"CFF ") || has(b"CFF2")) {
            return Err(MergeError::UnsupportedOutlines { font: font_idx });
        }
        if let Some(tag) = REQUIRED_TABLES.iter().find(|tag| font.table_data(**tag).is_none()) {
            return Err(MergeError::MissingTable { font: font_idx, tag: *tag });
        }
    }

    let total: usize = fonts
        .iter()
        .map(|f| f.maxp().map(|m| m.num_glyphs() as usize))
        .sum::<std::result::Result<usize, _>>()?;
    if total > u16::MAX as usize {
        return Err(MergeError::TooManyGlyphs { total });
    }

    let expected = first.head()?.units_per_em();
    for font in &fonts[1..] {
        let actual = font.head()?.units_per_em();
        if actual != expected {
            return Err(MergeError::IncompatibleUnitsPerEm { expected, actual });
        }
    }

    Ok(())
}

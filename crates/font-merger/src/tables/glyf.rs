//! glyf/loca merging
//!
//! Per-glyph instructions are kept for the first font only. The other fonts'
//! instructions would call into `fpgm` functions and `cvt` entries that the
//! merged font does not carry.

use std::collections::HashSet;

use duofont_font_ops::{Hinting, convert_glyph};
use read_fonts::{TableProvider, types::GlyphId as ReadGlyphId};
use write_fonts::tables::{
    glyf::{Glyf, GlyfLocaBuilder, Glyph},
    loca::{Loca, LocaFormat},
};

use crate::{Result, context::MergeContext};

pub fn merge_glyf(ctx: &MergeContext) -> Result<(Glyf, Loca, LocaFormat)> {
    let mut glyphs: Vec<Glyph> = Vec::with_capacity(ctx.mega().len());

    for (font_idx, font, remap) in ctx.fonts_with_remap() {
        let glyf = font.glyf()?;
        let loca = font.loca(None)?;
        let hinting = if font_idx.is_first() { Hinting::Keep } else { Hinting::Strip };

        for gid in ctx.font_mapping(font_idx.as_usize()).keys() {
            let glyph = match loca.get_glyf(ReadGlyphId::new(gid.to_u32()), &glyf) {
                Ok(Some(glyph)) => convert_glyph(&glyph, |old| remap.get_u16(old), hinting),
                _ => Glyph::Empty,
            };
            glyphs.push(glyph);
        }
    }

    // OTS rejects composites that point at empty glyphs
    let empty: HashSet<u16> = glyphs
        .iter()
        .enumerate()
        .filter_map(|(gid, g)| matches!(g, Glyph::Empty).then_some(gid as u16))
        .collect();
    for glyph in &mut glyphs {
        if let Glyph::Composite(composite) = glyph
            && composite.components().iter().any(|c| empty.contains(&c.glyph.to_u16()))
        {
            *glyph = Glyph::Empty;
        }
    }

    let mut builder = GlyfLocaBuilder::new();
    for glyph in &glyphs {
        builder.add_glyph(glyph)?;
    }
    Ok(builder.build())
}

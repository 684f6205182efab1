//! State shared by the per-table mergers.

use std::collections::HashMap;

use indexmap::IndexMap;
use read_fonts::FontRef;

use crate::{
    glyph_order::{GlyphName, GlyphOrder},
    options::Options,
    types::{FontIndex, GlyphId, MegaGlyphId},
};

/// Source GID → merged GID for one input font.
#[derive(Debug, Clone)]
pub struct GidRemap(HashMap<GlyphId, MegaGlyphId>);

impl GidRemap {
    fn new(mapping: &IndexMap<GlyphId, GlyphName>, glyph_order: &GlyphOrder) -> Self {
        Self(
            mapping
                .iter()
                .filter_map(|(old, name)| glyph_order.mega_id(name).map(|new| (*old, new)))
                .collect(),
        )
    }

    pub fn get(&self, old: GlyphId) -> Option<MegaGlyphId> {
        self.0.get(&old).copied()
    }

    pub fn get_u16(&self, old: u16) -> Option<u16> {
        self.get(GlyphId::new(old)).map(MegaGlyphId::to_u16)
    }
}

pub struct MergeContext<'a> {
    fonts: &'a [FontRef<'a>],
    glyph_order: GlyphOrder,
    remaps: Vec<GidRemap>,
    options: &'a Options,
}

impl<'a> MergeContext<'a> {
    pub fn new(fonts: &'a [FontRef<'a>], glyph_order: GlyphOrder, options: &'a Options) -> Self {
        let remaps = (0..fonts.len())
            .map(|i| GidRemap::new(glyph_order.font_mapping(i), &glyph_order))
            .collect();
        Self { fonts, glyph_order, remaps, options }
    }

    pub fn fonts(&self) -> &[FontRef<'a>] {
        self.fonts
    }

    pub fn glyph_order(&self) -> &GlyphOrder {
        &self.glyph_order
    }

    pub fn mega(&self) -> &[GlyphName] {
        self.glyph_order.mega()
    }

    pub fn total_glyphs(&self) -> u16 {
        self.glyph_order.total_glyphs()
    }

    pub fn font_mapping(&self, font_idx: usize) -> &IndexMap<GlyphId, GlyphName> {
        self.glyph_order.font_mapping(font_idx)
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    pub fn fonts_with_remap(&self) -> impl Iterator<Item = (FontIndex, &FontRef<'a>, &GidRemap)> {
        self.fonts
            .iter()
            .zip(&self.remaps)
            .enumerate()
            .map(|(i, (font, remap))| (FontIndex::new(i), font, remap))
    }
}

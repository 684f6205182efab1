//! Glyph names and the merged glyph order.
//!
//! Glyphs are identified by name while merging. Every glyph of every input
//! survives: a name already taken by an earlier glyph gets the first free
//! `.N` suffix. Fonts are appended in input order, so the first font's glyphs
//! keep their original IDs.

use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{self, Display, Formatter},
    ops::Deref,
};

use indexmap::{IndexMap, IndexSet};
use read_fonts::{FontRef, TableProvider, types::GlyphId16};

use crate::types::{GlyphId, MegaGlyphId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unified glyph ordering across all fonts being merged.
#[derive(Debug, Clone)]
pub struct GlyphOrder {
    mega: Vec<GlyphName>,
    per_font: Vec<IndexMap<GlyphId, GlyphName>>,
    name_to_mega: HashMap<GlyphName, MegaGlyphId>,
}

impl GlyphOrder {
    pub fn compute(fonts: &[FontRef]) -> Self {
        let mut taken: IndexSet<GlyphName> = IndexSet::new();
        let mut next_suffix: HashMap<String, usize> = HashMap::new();
        let mut per_font = Vec::with_capacity(fonts.len());

        for font in fonts {
            let mut mapping = IndexMap::new();
            for (gid, name) in source_glyph_names(font).into_iter().enumerate() {
                let name = unique_name(name, &taken, &mut next_suffix);
                taken.insert(name.clone());
                mapping.insert(GlyphId::new(gid as u16), name);
            }
            per_font.push(mapping);
        }

        let mega: Vec<GlyphName> = taken.into_iter().collect();
        let name_to_mega = mega
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), MegaGlyphId::new(i as u16)))
            .collect();

        Self { mega, per_font, name_to_mega }
    }

    /// All glyph names in merged order.
    pub fn mega(&self) -> &[GlyphName] {
        &self.mega
    }

    pub fn total_glyphs(&self) -> u16 {
        self.mega.len() as u16
    }

    /// Original GID → merged name, for one input font.
    pub fn font_mapping(&self, font_idx: usize) -> &IndexMap<GlyphId, GlyphName> {
        &self.per_font[font_idx]
    }

    pub fn mega_id(&self, name: &str) -> Option<MegaGlyphId> {
        self.name_to_mega.get(name).copied()
    }
}

fn unique_name(
    name: String,
    taken: &IndexSet<GlyphName>,
    next_suffix: &mut HashMap<String, usize>,
) -> GlyphName {
    if !taken.contains(name.as_str()) {
        return GlyphName::new(name);
    }
    // a font may itself contain "a.1", so keep counting until a name is free
    let suffix = next_suffix.entry(name.clone()).or_insert(1);
    loop {
        let candidate = format!("{name}.{suffix}");
        *suffix += 1;
        if !taken.contains(candidate.as_str()) {
            return GlyphName::new(candidate);
        }
    }
}

/// Glyph names from `post`, or `glyphNNNNN` where the font has none.
fn source_glyph_names(font: &FontRef) -> Vec<String> {
    let num_glyphs = font.maxp().map(|m| m.num_glyphs()).unwrap_or_default();
    let post = font.post().ok();

    (0..num_glyphs)
        .map(|gid| {
            post.as_ref()
                .and_then(|p| p.glyph_name(GlyphId16::new(gid)))
                .map(str::to_string)
                .unwrap_or_else(|| format!("glyph{gid:05}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use duofont_font_ops::fixture::TestFont;

    use super::*;

    #[test]
    fn test_first_font_keeps_gids() {
        let a = TestFont::new("A").glyph("A", 0x41).glyph("B", 0x42).build();
        let b = TestFont::new("B").glyph("alef", 0x0627).build();
        let fonts = [FontRef::new(&a).unwrap(), FontRef::new(&b).unwrap()];

        let order = GlyphOrder::compute(&fonts);
        let names: Vec<&str> = order.mega().iter().map(GlyphName::as_str).collect();
        assert_eq!(names, vec![".notdef", "A", "B", ".notdef.1", "alef"]);
        assert_eq!(order.mega_id("B"), Some(MegaGlyphId::new(2)));
        assert_eq!(order.font_mapping(1)[&GlyphId::new(1)].as_str(), "alef");
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let a = TestFont::new("A").glyph("a", 0x61).unmapped_glyph("a.1").build();
        let b = TestFont::new("B").glyph("a", 0x62).build();
        let fonts = [FontRef::new(&a).unwrap(), FontRef::new(&b).unwrap()];

        let order = GlyphOrder::compute(&fonts);
        assert_eq!(order.total_glyphs(), 5);
        assert_eq!(order.font_mapping(1)[&GlyphId::new(1)].as_str(), "a.2");
    }
}

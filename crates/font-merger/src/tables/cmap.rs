//! cmap table merging
//!
//! The merged map is the union of the inputs' Unicode maps. When two fonts map
//! the same codepoint the earlier font keeps it; the later font's glyph stays
//! in the font, unmapped, and the conflict is reported.

use std::collections::{BTreeMap, btree_map::Entry};

use duofont_font_ops::unicode_mappings;
use log::warn;
use write_fonts::tables::cmap::{
    Cmap, Cmap12, CmapSubtable, EncodingRecord, PlatformId, SequentialMapGroup,
};

use crate::{
    MergeWarning, Result,
    context::MergeContext,
    types::{Codepoint, FontIndex, GlyphId, MegaGlyphId},
};

pub fn merge_cmap(ctx: &MergeContext) -> Result<(Cmap, Vec<MergeWarning>)> {
    let mut owners: BTreeMap<Codepoint, (FontIndex, MegaGlyphId)> = BTreeMap::new();
    let mut warnings = Vec::new();

    for (font_idx, font, remap) in ctx.fonts_with_remap() {
        for (codepoint, gid) in unicode_mappings(font)? {
            let Some(mega_gid) = remap.get(GlyphId::new(gid)) else {
                continue;
            };
            match owners.entry(Codepoint::new(codepoint)) {
                Entry::Vacant(slot) => {
                    slot.insert((font_idx, mega_gid));
                }
                Entry::Occupied(slot) => {
                    let (kept_font, _) = *slot.get();
                    let conflict = MergeWarning::CodepointConflict {
                        codepoint: *slot.key(),
                        kept_font,
                        dropped_font: font_idx,
                    };
                    warn!("{conflict}");
                    warnings.push(conflict);
                }
            }
        }
    }

    let mappings: Vec<(u32, u32)> = owners
        .iter()
        .map(|(cp, (_, gid))| (cp.to_u32(), gid.to_u32()))
        .collect();

    Ok((build_cmap_format12(&mappings), warnings))
}

/// A cmap with one format 12 subtable shared by the Unicode and Windows records.
///
/// Format 4 is skipped since its 16-bit segment arithmetic overflows on large
/// merged repertoires.
fn build_cmap_format12(mappings: &[(u32, u32)]) -> Cmap {
    let cmap12 = Cmap12 { language: 0, groups: sequential_groups(mappings) };

    Cmap::new(vec![
        EncodingRecord::new(PlatformId::Unicode, 4, CmapSubtable::Format12(cmap12.clone())),
        EncodingRecord::new(PlatformId::Windows, 10, CmapSubtable::Format12(cmap12)),
    ])
}

/// Runs of consecutive codepoints mapped to consecutive glyphs. `mappings`
/// must be sorted by codepoint.
fn sequential_groups(mappings: &[(u32, u32)]) -> Vec<SequentialMapGroup> {
    let mut groups = Vec::new();
    let mut iter = mappings.iter().copied();
    let Some((mut start_cp, mut start_gid)) = iter.next() else {
        return groups;
    };
    let (mut prev_cp, mut prev_gid) = (start_cp, start_gid);

    for (cp, gid) in iter {
        if cp != prev_cp + 1 || gid != prev_gid + 1 {
            groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
            (start_cp, start_gid) = (cp, gid);
        }
        (prev_cp, prev_gid) = (cp, gid);
    }
    groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_groups() {
        let groups = sequential_groups(&[(0x41, 1), (0x42, 2), (0x43, 5), (0x45, 6)]);
        assert_eq!(
            groups,
            vec![
                SequentialMapGroup::new(0x41, 0x42, 1),
                SequentialMapGroup::new(0x43, 0x43, 5),
                SequentialMapGroup::new(0x45, 0x45, 6),
            ]
        );
        assert!(sequential_groups(&[]).is_empty());
    }
}

//! Reading Unicode character maps.

use std::collections::BTreeMap;

use read_fonts::{
    FontRef, ReadError, TableProvider,
    tables::cmap::{Cmap, CmapSubtable, PlatformId},
};

/// All Unicode codepoint → glyph mappings of the font's best Unicode subtable.
///
/// Mappings to glyph 0 are skipped. When a subtable maps a codepoint twice the
/// first occurrence is kept.
pub fn unicode_mappings(font: &FontRef) -> Result<BTreeMap<u32, u16>, ReadError> {
    let cmap = font.cmap()?;
    let mut mappings = BTreeMap::new();
    if let Some(subtable) = find_best_subtable(&cmap) {
        for (codepoint, gid) in iter_subtable(&subtable) {
            mappings.entry(codepoint).or_insert(gid);
        }
    }
    Ok(mappings)
}

fn find_best_subtable<'a>(cmap: &'a Cmap<'a>) -> Option<CmapSubtable<'a>> {
    let records = cmap.encoding_records();

    // Format 12 (full repertoire) first
    for record in records {
        if (record.platform_id() == PlatformId::Unicode
            || (record.platform_id() == PlatformId::Windows && record.encoding_id() == 10))
            && let Ok(subtable) = record.subtable(cmap.offset_data())
            && matches!(subtable, CmapSubtable::Format12(_))
        {
            return Some(subtable);
        }
    }

    // then format 4 (BMP)
    for record in records {
        if (record.platform_id() == PlatformId::Unicode
            || (record.platform_id() == PlatformId::Windows && record.encoding_id() == 1))
            && let Ok(subtable) = record.subtable(cmap.offset_data())
            && matches!(subtable, CmapSubtable::Format4(_))
        {
            return Some(subtable);
        }
    }

    records.iter().find_map(|r| r.subtable(cmap.offset_data()).ok())
}

fn iter_subtable(subtable: &CmapSubtable) -> Vec<(u32, u16)> {
    let mut mappings = Vec::new();

    match subtable {
        CmapSubtable::Format4(f4) => {
            let end_codes = f4.end_code();
            let start_codes = f4.start_code();
            let id_deltas = f4.id_delta();
            let id_range_offsets = f4.id_range_offsets();
            let glyph_id_array = f4.glyph_id_array();

            let seg_count = f4.seg_count_x2() as usize / 2;
            for seg in 0..seg_count {
                let end_code = end_codes.get(seg).map(|v| v.get()).unwrap_or(0xFFFF);
                let start_code = start_codes.get(seg).map(|v| v.get()).unwrap_or(0xFFFF);
                let id_delta = id_deltas.get(seg).map(|v| v.get()).unwrap_or(0);
                let id_range_offset = id_range_offsets.get(seg).map(|v| v.get()).unwrap_or(0);

                if start_code == 0xFFFF || start_code > end_code {
                    continue;
                }

                for cp in start_code..=end_code {
                    let gid = if id_range_offset == 0 {
                        ((cp as i32 + id_delta as i32) & 0xFFFF) as u16
                    } else {
                        // idRangeOffset is relative to its own slot in the array
                        let index = (id_range_offset as usize / 2 + (cp - start_code) as usize)
                            .checked_sub(seg_count - seg);
                        match index.and_then(|i| glyph_id_array.get(i)).map(|g| g.get()) {
                            Some(0) | None => 0,
                            Some(gid) => ((gid as i32 + id_delta as i32) & 0xFFFF) as u16,
                        }
                    };

                    if gid != 0 {
                        mappings.push((cp as u32, gid));
                    }
                }
            }
        }
        CmapSubtable::Format12(f12) => {
            for group in f12.groups() {
                let start = group.start_char_code();
                let end = group.end_char_code();
                let first_gid = group.start_glyph_id();
                for cp in start..=end {
                    let gid = first_gid + (cp - start);
                    if gid != 0 && gid <= u16::MAX as u32 {
                        mappings.push((cp, gid as u16));
                    }
                }
            }
        }
        CmapSubtable::Format6(f6) => {
            let first = f6.first_code() as u32;
            for (i, gid) in f6.glyph_id_array().iter().enumerate() {
                let gid = gid.get();
                if gid != 0 {
                    mappings.push((first + i as u32, gid));
                }
            }
        }
        _ => {}
    }

    mappings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::TestFont;

    #[test]
    fn test_unicode_mappings() {
        let data = TestFont::new("Sample").glyph("A", 0x41).glyph("alef", 0x0627).build();
        let font = FontRef::new(&data).unwrap();
        let mappings = unicode_mappings(&font).unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings.get(&0x41), Some(&1));
        assert_eq!(mappings.get(&0x0627), Some(&2));
    }
}

//! OS/2 table merging
//!
//! The first font's table is the base. Coverage bits are unioned, vertical
//! metrics widened and the character index range spans all inputs.

use read_fonts::{FontRef, TableProvider, tables::os2::Os2 as ReadOs2};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::os2::{Os2, SelectionFlags},
};

use crate::{
    Result,
    strategies::{bit_or, max, merge_bits, min},
};

const FS_SELECTION_BIT_MAP: [Option<bool>; 16] = [
    Some(false), // 0: italic
    Some(true),  // 1: underscore
    Some(true),  // 2: negative
    Some(true),  // 3: outlined
    Some(true),  // 4: strikeout
    Some(false), // 5: bold
    Some(false), // 6: regular
    Some(false), // 7: use typo metrics
    Some(false), // 8: wws
    Some(false), // 9: oblique
    None,
    None,
    None,
    None,
    None,
    None,
];

/// `None` unless every font has an OS/2 table.
pub fn merge_os2(fonts: &[FontRef]) -> Result<Option<Os2>> {
    let tables: Vec<ReadOs2> = fonts.iter().filter_map(|f| f.os2().ok()).collect();
    let Some(first) = tables.first() else {
        return Ok(None);
    };
    if tables.len() != fonts.len() {
        return Ok(None);
    }

    let mut os2: Os2 = first.to_owned_table();
    let version = tables.iter().map(|t| t.version()).max().unwrap_or_default();

    os2.ul_unicode_range_1 = bit_or(tables.iter().map(|t| t.ul_unicode_range_1()));
    os2.ul_unicode_range_2 = bit_or(tables.iter().map(|t| t.ul_unicode_range_2()));
    os2.ul_unicode_range_3 = bit_or(tables.iter().map(|t| t.ul_unicode_range_3()));
    os2.ul_unicode_range_4 = bit_or(tables.iter().map(|t| t.ul_unicode_range_4()));

    let selection: Vec<u16> = tables.iter().map(|t| t.fs_selection().bits()).collect();
    os2.fs_selection =
        SelectionFlags::from_bits_truncate(merge_bits(&selection, &FS_SELECTION_BIT_MAP)?);

    let values = |f: fn(&ReadOs2) -> i16| tables.iter().map(f).collect::<Vec<_>>();
    os2.s_typo_ascender = max(&values(|t| t.s_typo_ascender()))?;
    os2.s_typo_descender = min(&values(|t| t.s_typo_descender()))?;
    os2.s_typo_line_gap = max(&values(|t| t.s_typo_line_gap()))?;

    let win_ascents: Vec<u16> = tables.iter().map(|t| t.us_win_ascent()).collect();
    let win_descents: Vec<u16> = tables.iter().map(|t| t.us_win_descent()).collect();
    os2.us_win_ascent = max(&win_ascents)?;
    os2.us_win_descent = max(&win_descents)?;

    let first_chars: Vec<u16> = tables.iter().map(|t| t.us_first_char_index()).collect();
    let last_chars: Vec<u16> = tables.iter().map(|t| t.us_last_char_index()).collect();
    os2.us_first_char_index = min(&first_chars)?;
    os2.us_last_char_index = max(&last_chars)?;

    // fields the highest version needs but the first font's table lacks
    if version >= 1 {
        os2.ul_code_page_range_1 =
            Some(bit_or(tables.iter().filter_map(|t| t.ul_code_page_range_1())));
        os2.ul_code_page_range_2 =
            Some(bit_or(tables.iter().filter_map(|t| t.ul_code_page_range_2())));
    }
    if version >= 2 {
        os2.sx_height = tables.iter().filter_map(|t| t.sx_height()).max().or(Some(0));
        os2.s_cap_height = tables.iter().filter_map(|t| t.s_cap_height()).max().or(Some(0));
        os2.us_default_char.get_or_insert(0);
        os2.us_break_char.get_or_insert(0x20);
        os2.us_max_context = tables.iter().filter_map(|t| t.us_max_context()).max().or(Some(0));
    }
    if version >= 5 {
        os2.us_lower_optical_point_size.get_or_insert(0);
        os2.us_upper_optical_point_size.get_or_insert(0xFFFF);
    }

    Ok(Some(os2))
}

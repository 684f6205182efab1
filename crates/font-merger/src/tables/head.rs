//! head table merging

use std::result;

use read_fonts::{FontRef, TableProvider, tables::head::Head as ReadHead};
use write_fonts::tables::{
    head::{Flags, Head, MacStyle},
    loca::LocaFormat,
};

use crate::{
    Result,
    strategies::{equal, first, max, merge_bits, min},
};

/// `Some(true)` ORs the bit, `Some(false)` ANDs it, `None` takes the first font's.
const HEAD_FLAGS_BIT_MAP: [Option<bool>; 16] = [
    Some(true), // 0: baseline at y=0
    Some(true), // 1: left sidebearing at x=0
    None,       // 2: instructions depend on point size
    Some(true), // 3: force ppem to integer
    Some(true), // 4: instructions alter advance width
    None,       // 5-10: reserved
    None,
    None,
    None,
    None,
    None,
    Some(true), // 11: lossless font data
    Some(true), // 12: font converted
    Some(true), // 13: optimized for ClearType
    Some(true), // 14: last resort font
    None,
];

const MAC_STYLE_BIT_MAP: [Option<bool>; 16] = [
    Some(false), // bold
    Some(false), // italic
    Some(true),  // underline
    Some(true),  // outline
    Some(true),  // shadow
    Some(false), // condensed
    Some(false), // extended
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
];

pub fn merge_head(fonts: &[FontRef], loca_format: LocaFormat) -> Result<Head> {
    let tables: Vec<ReadHead> = fonts
        .iter()
        .map(|f| f.head())
        .collect::<result::Result<Vec<_>, _>>()?;

    let collect = |f: fn(&ReadHead) -> i16| tables.iter().map(f).collect::<Vec<_>>();
    let units_per_em: Vec<u16> = tables.iter().map(|t| t.units_per_em()).collect();
    let revisions: Vec<i32> = tables.iter().map(|t| t.font_revision().to_bits()).collect();
    let flags: Vec<u16> = tables.iter().map(|t| t.flags().bits()).collect();
    let mac_styles: Vec<u16> = tables.iter().map(|t| t.mac_style().bits()).collect();
    let lowest_rec_ppems: Vec<u16> = tables.iter().map(|t| t.lowest_rec_ppem()).collect();
    let created: Vec<_> = tables.iter().map(|t| t.created()).collect();
    let modified: Vec<_> = tables.iter().map(|t| t.modified()).collect();
    let direction_hints = collect(|t| t.font_direction_hint());

    Ok(Head {
        font_revision: font_types::Fixed::from_bits(max(&revisions)?),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: Flags::from_bits_truncate(merge_bits(&flags, &HEAD_FLAGS_BIT_MAP)?),
        units_per_em: equal(&units_per_em, "head", "unitsPerEm")?,
        created: first(&created)?,
        modified: first(&modified)?,
        x_min: min(&collect(|t| t.x_min()))?,
        y_min: min(&collect(|t| t.y_min()))?,
        x_max: max(&collect(|t| t.x_max()))?,
        y_max: max(&collect(|t| t.y_max()))?,
        mac_style: MacStyle::from_bits_truncate(merge_bits(&mac_styles, &MAC_STYLE_BIT_MAP)?),
        lowest_rec_ppem: max(&lowest_rec_ppems)?,
        font_direction_hint: first(&direction_hints)?,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    })
}

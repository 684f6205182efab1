//! hhea table merging

use std::result;

use read_fonts::{FontRef, TableProvider, tables::hhea::Hhea as ReadHhea};
use write_fonts::tables::hhea::Hhea;

use crate::{
    Result,
    strategies::{first, max, min},
};

pub fn merge_hhea(fonts: &[FontRef], num_h_metrics: u16) -> Result<Hhea> {
    let tables: Vec<ReadHhea> = fonts
        .iter()
        .map(|f| f.hhea())
        .collect::<result::Result<Vec<_>, _>>()?;

    let fwords = |f: fn(&ReadHhea) -> i16| tables.iter().map(f).collect::<Vec<_>>();
    let advance_width_maxs: Vec<u16> =
        tables.iter().map(|t| t.advance_width_max().to_u16()).collect();

    Ok(Hhea {
        ascender: font_types::FWord::new(max(&fwords(|t| t.ascender().to_i16()))?),
        descender: font_types::FWord::new(min(&fwords(|t| t.descender().to_i16()))?),
        line_gap: font_types::FWord::new(max(&fwords(|t| t.line_gap().to_i16()))?),
        advance_width_max: font_types::UfWord::new(max(&advance_width_maxs)?),
        min_left_side_bearing: font_types::FWord::new(min(&fwords(|t| {
            t.min_left_side_bearing().to_i16()
        }))?),
        min_right_side_bearing: font_types::FWord::new(min(&fwords(|t| {
            t.min_right_side_bearing().to_i16()
        }))?),
        x_max_extent: font_types::FWord::new(max(&fwords(|t| t.x_max_extent().to_i16()))?),
        caret_slope_rise: first(&fwords(|t| t.caret_slope_rise()))?,
        caret_slope_run: first(&fwords(|t| t.caret_slope_run()))?,
        caret_offset: first(&fwords(|t| t.caret_offset()))?,
        number_of_h_metrics: num_h_metrics,
    })
}

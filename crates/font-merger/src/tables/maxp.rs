//! maxp table merging
//!
//! Only glyf-flavoured fonts reach the merger, so the result is always a
//! version 1.0 table. Limits tied to the hinting programs come from the
//! first font, whose programs are the ones kept.

use std::result;

use read_fonts::{FontRef, TableProvider, tables::maxp::Maxp as ReadMaxp};
use write_fonts::tables::maxp::Maxp;

use crate::{
    Result,
    strategies::{first, max},
};

pub fn merge_maxp(fonts: &[FontRef], total_glyphs: u16) -> Result<Maxp> {
    let tables: Vec<ReadMaxp> = fonts
        .iter()
        .map(|f| f.maxp())
        .collect::<result::Result<Vec<_>, _>>()?;

    let field = |f: fn(&ReadMaxp) -> Option<u16>, default: u16| {
        tables.iter().map(|t| f(t).unwrap_or(default)).collect::<Vec<_>>()
    };

    Ok(Maxp {
        num_glyphs: total_glyphs,
        max_points: Some(max(&field(|t| t.max_points(), 0))?),
        max_contours: Some(max(&field(|t| t.max_contours(), 0))?),
        max_composite_points: Some(max(&field(|t| t.max_composite_points(), 0))?),
        max_composite_contours: Some(max(&field(|t| t.max_composite_contours(), 0))?),
        max_zones: Some(max(&field(|t| t.max_zones(), 1))?),
        max_twilight_points: Some(first(&field(|t| t.max_twilight_points(), 0))?),
        max_storage: Some(first(&field(|t| t.max_storage(), 0))?),
        max_function_defs: Some(first(&field(|t| t.max_function_defs(), 0))?),
        max_instruction_defs: Some(first(&field(|t| t.max_instruction_defs(), 0))?),
        max_stack_elements: Some(first(&field(|t| t.max_stack_elements(), 0))?),
        max_size_of_instructions: Some(first(&field(|t| t.max_size_of_instructions(), 0))?),
        max_component_elements: Some(max(&field(|t| t.max_component_elements(), 0))?),
        max_component_depth: Some(max(&field(|t| t.max_component_depth(), 0))?),
    })
}

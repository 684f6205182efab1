//! hmtx table merging

use duofont_font_ops::h_metric;
use read_fonts::TableProvider;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};

use crate::{Result, context::MergeContext};

/// Every glyph gets a full long metric; the caller sets
/// `numberOfHMetrics` to the glyph count.
pub fn merge_hmtx(ctx: &MergeContext) -> Result<Hmtx> {
    let mut h_metrics: Vec<LongMetric> = Vec::with_capacity(ctx.mega().len());

    for (font_idx, font, _) in ctx.fonts_with_remap() {
        let hmtx = font.hmtx()?;
        let num_h_metrics = font.hhea()?.number_of_h_metrics() as usize;

        h_metrics.extend(
            ctx.font_mapping(font_idx.as_usize())
                .keys()
                .map(|gid| h_metric(&hmtx, num_h_metrics, gid.to_u16() as usize)),
        );
    }

    Ok(Hmtx { h_metrics, left_side_bearings: Vec::new() })
}

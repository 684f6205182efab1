//! Horizontal metrics lookup.

use read_fonts::tables::hmtx::Hmtx;
use write_fonts::tables::hmtx::LongMetric;

/// Advance width and left side bearing of `gid`.
///
/// Glyphs past `num_h_metrics` repeat the last advance and take their side
/// bearing from the trailing array. Anything missing reads as zero.
pub fn h_metric(hmtx: &Hmtx, num_h_metrics: usize, gid: usize) -> LongMetric {
    if gid < num_h_metrics
        && let Some(m) = hmtx.h_metrics().get(gid)
    {
        return LongMetric { advance: m.advance.get(), side_bearing: m.side_bearing.get() };
    }

    let advance = num_h_metrics
        .checked_sub(1)
        .and_then(|last| hmtx.h_metrics().get(last))
        .map(|m| m.advance.get())
        .unwrap_or(0);
    let side_bearing = gid
        .checked_sub(num_h_metrics)
        .and_then(|i| hmtx.left_side_bearings().get(i))
        .map(|b| b.get())
        .unwrap_or(0);
    LongMetric { advance, side_bearing }
}

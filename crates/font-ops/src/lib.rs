//! Font inspection, unitsPerEm reconciliation, and sfnt helpers shared by the
//! subsetter and the merger.

mod asset;
pub mod cmap;
mod error;
pub mod glyph;
mod metrics;
mod reconcile;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

pub use asset::{CFF, CFF2, FontAsset, FontSummary, GLYF, HEAD, OutlineFlavor, inspect};
pub use cmap::unicode_mappings;
pub use error::{FontParseError, Result};
pub use glyph::{Hinting, component_gids, convert_glyph};
pub use metrics::h_metric;
pub use reconcile::{UnitsRewrite, reconcile, reconcile_report};

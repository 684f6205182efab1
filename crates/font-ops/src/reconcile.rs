//! Bringing fonts to a common unitsPerEm.
//!
//! Only the `head.unitsPerEm` field is rewritten. Glyph coordinates, advance
//! widths and every other table stay byte-identical, so a font whose original
//! scale was smaller will render its glyphs smaller than the others once the
//! fonts are merged. Rescaling outlines is not attempted.

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use log::warn;

use crate::asset::FontAsset;

/// A font whose declared scale was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitsRewrite {
    pub path: PathBuf,
    pub from: u16,
    pub to: u16,
}

impl Display for UnitsRewrite {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: unitsPerEm declared as {} instead of {}; outlines were not rescaled",
            self.path.display(),
            self.to,
            self.from
        )
    }
}

/// Rewrite every font's unitsPerEm to the largest value among them.
pub fn reconcile(assets: Vec<FontAsset>) -> Vec<FontAsset> {
    reconcile_report(assets).0
}

/// Like [`reconcile`], also returning which fonts were rewritten.
pub fn reconcile_report(mut assets: Vec<FontAsset>) -> (Vec<FontAsset>, Vec<UnitsRewrite>) {
    let Some(target) = assets.iter().map(FontAsset::units_per_em).max() else {
        return (assets, Vec::new());
    };

    let mut rewrites = Vec::new();
    for asset in &mut assets {
        let from = asset.units_per_em();
        if from == target {
            continue;
        }
        asset.set_units_per_em(target);
        warn!(
            "{}: unitsPerEm {from} -> {target} (header only, glyphs keep their size)",
            asset.path().display()
        );
        rewrites.push(UnitsRewrite { path: asset.path().to_path_buf(), from, to: target });
    }

    (assets, rewrites)
}

#[cfg(test)]
mod tests {
    use read_fonts::{FontRef, TableProvider, types::Tag};

    use super::*;
    use crate::fixture::TestFont;

    fn asset(name: &str, upem: u16) -> FontAsset {
        let data = TestFont::new(name).units_per_em(upem).glyph("A", 0x41).build();
        FontAsset::from_bytes(format!("{name}.ttf"), &data).unwrap()
    }

    #[test]
    fn test_target_is_max() {
        let fonts = reconcile(vec![asset("a", 1000), asset("b", 2048)]);
        assert!(fonts.iter().all(|f| f.units_per_em() == 2048));

        let data = fonts[0].to_bytes();
        let head = FontRef::new(&data).unwrap().head().unwrap();
        assert_eq!(head.units_per_em(), 2048);
    }

    #[test]
    fn test_outlines_untouched() {
        let original = asset("a", 1000);
        let fonts = reconcile(vec![original.clone(), asset("b", 2048)]);

        for tag in [b"glyf", b"loca", b"hmtx", b"cmap"] {
            let tag = Tag::new(tag);
            assert_eq!(original.table(tag), fonts[0].table(tag), "{tag} changed");
        }
    }

    #[test]
    fn test_report_lists_rewritten_fonts_only() {
        let (_, rewrites) = reconcile_report(vec![asset("a", 1000), asset("b", 2048)]);
        assert_eq!(rewrites.len(), 1);
        assert_eq!(rewrites[0].from, 1000);
        assert_eq!(rewrites[0].to, 2048);
        assert!(rewrites[0].to_string().contains("not rescaled"));
    }

    #[test]
    fn test_equal_units_untouched() {
        let a = asset("a", 1000);
        let (fonts, rewrites) = reconcile_report(vec![a.clone(), asset("b", 1000)]);
        assert!(rewrites.is_empty());
        assert_eq!(fonts[0], a);
    }

    #[test]
    fn test_empty_input() {
        assert!(reconcile(Vec::new()).is_empty());
    }
}

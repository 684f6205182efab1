//! TrueType hinting programs
//!
//! `fpgm`, `prep` and `cvt ` are global to a font and cannot be combined, so
//! the merged font carries the first font's programs only. Per-glyph
//! instructions of the other fonts are stripped in [`super::glyf`].

use log::{debug, warn};
use read_fonts::{FontRef, types::Tag};

pub const HINT_TABLES: [Tag; 3] = [Tag::new(b"fpgm"), Tag::new(b"prep"), Tag::new(b"cvt ")];

fn hint_programs<'a>(font: &FontRef<'a>) -> [Option<&'a [u8]>; 3] {
    HINT_TABLES.map(|tag| font.table_data(tag).map(|data| data.as_bytes()))
}

/// True when at most one font is hinted or all hinted fonts share the same
/// programs. Logs a warning otherwise.
pub fn check_hint_compatibility(fonts: &[FontRef]) -> bool {
    let hinted: Vec<_> = fonts
        .iter()
        .enumerate()
        .map(|(i, font)| (i, hint_programs(font)))
        .filter(|(_, programs)| programs.iter().any(Option::is_some))
        .collect();

    for (i, programs) in &hinted {
        let [fpgm, prep, cvt] = programs.map(|p| p.is_some());
        debug!("font {}: fpgm={fpgm}, prep={prep}, cvt={cvt}", i + 1);
    }

    let Some(((_, first), rest)) = hinted.split_first() else {
        return true;
    };
    if rest.iter().all(|(_, programs)| programs == first) {
        return true;
    }

    warn!(
        "fonts have different TrueType hinting programs; only the first font's are kept, \
         glyphs from the other fonts are unhinted"
    );
    false
}

#[cfg(test)]
mod tests {
    use duofont_font_ops::fixture::TestFont;

    use super::*;

    #[test]
    fn test_single_hinted_font_is_compatible() {
        let a = TestFont::new("A").glyph("A", 0x41).hinted().build();
        let b = TestFont::new("B").glyph("alef", 0x0627).build();
        let fonts = [FontRef::new(&a).unwrap(), FontRef::new(&b).unwrap()];
        assert!(check_hint_compatibility(&fonts));
    }

    #[test]
    fn test_different_programs_are_incompatible() {
        let a = TestFont::new("A").glyph("A", 0x41).hinted().build();
        let b = TestFont::new("B")
            .glyph("alef", 0x0627)
            .hinted()
            .table(b"fpgm", &[0xB0, 0x02])
            .build();
        let fonts = [FontRef::new(&a).unwrap(), FontRef::new(&b).unwrap()];
        assert!(!check_hint_compatibility(&fonts));
    }
}

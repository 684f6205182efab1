//! Glyph outlines through skrifa, laid out as a single line.

use skrifa::{
    FontRef, GlyphId, MetadataProvider,
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
};
use tiny_skia::{Path, PathBuilder};

/// A font the rasterizer can draw with.
pub(crate) struct Face<'a> {
    font: FontRef<'a>,
    size: Size,
}

impl<'a> Face<'a> {
    /// Open face `index` of `data`, or say why it cannot be drawn with.
    pub fn load(data: &'a [u8], index: u32, px: f32) -> Result<Self, String> {
        let font = FontRef::from_index(data, index).map_err(|e| e.to_string())?;
        if !font.charmap().has_map() {
            return Err("font has no usable character map".to_string());
        }
        if font.outline_glyphs().format().is_none() {
            return Err("font has no glyph outlines".to_string());
        }
        Ok(Self { font, size: Size::new(px) })
    }

    /// Ascent and descent in pixels; descent is negative.
    pub fn vertical_metrics(&self) -> (f32, f32) {
        let metrics = self.font.metrics(self.size, LocationRef::default());
        (metrics.ascent, metrics.descent)
    }

    /// Outline of `text` with its origin at x = 0 on the baseline, in
    /// y-down pixel coordinates, plus the total advance.
    pub fn line_path(&self, text: &str) -> (Option<Path>, f32) {
        let charmap = self.font.charmap();
        let advances = self.font.glyph_metrics(self.size, LocationRef::default());
        let outlines = self.font.outline_glyphs();
        let settings = || DrawSettings::unhinted(self.size, LocationRef::default());

        let mut pen = LinePen { builder: PathBuilder::new(), x: 0.0 };
        for c in text.chars() {
            let gid = charmap.map(c).unwrap_or(GlyphId::NOTDEF);
            if let Some(glyph) = outlines.get(gid)
                && let Err(e) = glyph.draw(settings(), &mut pen)
            {
                log::debug!("cannot draw {gid:?} for {c:?}: {e}");
            }
            pen.x += advances.advance_width(gid).unwrap_or_default();
        }

        let width = pen.x;
        (pen.builder.finish(), width)
    }
}

/// Collects outlines into one path, flipping y and shifting by the pen position.
struct LinePen {
    builder: PathBuilder,
    x: f32,
}

impl OutlinePen for LinePen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.x + x, -y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.x + x, -y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.builder.quad_to(self.x + cx0, -cy0, self.x + x, -y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(self.x + cx0, -cy0, self.x + cx1, -cy1, self.x + x, -y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use duofont_font_ops::fixture::TestFont;

    use super::*;

    fn assert_near(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 0.05, "{actual} != {expected}");
    }

    #[test]
    fn test_line_advance_and_bounds() {
        let data = TestFont::new("Test").glyph("A", 0x41).glyph("B", 0x42).build();
        let face = Face::load(&data, 0, 100.0).unwrap();

        // two 500-unit advances at 100 px per 1000 units
        let (path, width) = face.line_path("AB");
        assert_near(width, 100.0);
        let bounds = path.unwrap().bounds();
        assert_near(bounds.left(), 5.0);
        assert_near(bounds.right(), 95.0);
        assert_near(bounds.top(), -70.0);
        assert_near(bounds.bottom(), 0.0);

        let (ascent, descent) = face.vertical_metrics();
        assert_near(ascent, 80.0);
        assert_near(descent, -20.0);
    }

    #[test]
    fn test_unmapped_characters_draw_notdef() {
        let data = TestFont::new("Test").glyph("A", 0x41).build();
        let face = Face::load(&data, 0, 100.0).unwrap();
        let (path, width) = face.line_path("\u{0628}");
        assert!(path.is_some());
        assert_near(width, 50.0);
    }

    #[test]
    fn test_rejects_non_font() {
        assert!(Face::load(b"not a font", 0, 100.0).is_err());
    }
}

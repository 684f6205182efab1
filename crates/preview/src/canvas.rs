//! The preview raster and its JPEG encoding.

use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::{Color, PreviewError, Result};

pub(crate) struct Canvas {
    pixmap: Pixmap,
    paint: Paint<'static>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color, foreground: Color) -> Result<Self> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(PreviewError::Canvas { width, height })?;
        pixmap.fill(background.to_skia());

        let mut paint = Paint::default();
        paint.set_color(foreground.to_skia());
        paint.anti_alias = true;

        Ok(Self { pixmap, paint })
    }

    pub fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    /// Fill a line outline whose origin is at x = 0 on the baseline.
    pub fn fill_line(&mut self, path: &Path, x: f32, baseline: f32) {
        self.pixmap.fill_path(
            path,
            &self.paint,
            FillRule::Winding,
            Transform::from_translate(x, baseline),
            None,
        );
    }

    /// An empty box standing in for a glyph.
    pub fn stroke_box(&mut self, x: f32, top: f32, width: f32, height: f32) {
        let Some(rect) = Rect::from_xywh(x, top, width, height) else {
            return;
        };
        let stroke = Stroke { width: (width / 12.0).max(1.0), ..Stroke::default() };
        self.pixmap.stroke_path(
            &PathBuilder::from_rect(rect),
            &self.paint,
            &stroke,
            Transform::identity(),
            None,
        );
    }

    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        // the background is opaque, so premultiplied RGBA is plain RGBA
        let rgb: Vec<u8> = self
            .pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality).write_image(
            &rgb,
            self.pixmap.width(),
            self.pixmap.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(jpeg)
    }
}

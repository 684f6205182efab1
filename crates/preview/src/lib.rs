//! Preview images proving a font draws both Latin and Arabic text.
//!
//! The Arabic sample is shaped with [`duofont_text_shaper::shape`] and drawn
//! centered above the middle of the canvas, the Latin sample centered below
//! it. When the font cannot be drawn with, a system typeface (or, failing
//! that, placeholder boxes) is used and the returned preview says so.

mod canvas;
mod color;
mod error;
mod face;
mod fallback;

use duofont_font_ops::FontAsset;
use duofont_text_shaper::shape;
use log::{info, warn};

use crate::{canvas::Canvas, face::Face, fallback::find_system_sans_serif};
pub use crate::{
    color::{Color, ColorScheme},
    error::{PreviewError, Result},
    fallback::RenderFallback,
};

pub const WIDTH: u32 = 1920;
pub const HEIGHT: u32 = 1080;
pub const FONT_SIZE: f32 = 100.0;
pub const JPEG_QUALITY: u8 = 95;
/// Distance of each line's middle from the canvas middle.
pub const LINE_OFFSET: f32 = 50.0;

/// Placeholder glyph proportions, in ems.
const PLACEHOLDER_ADVANCE: f32 = 0.6;
const PLACEHOLDER_ASCENT: f32 = 0.8;
const PLACEHOLDER_DESCENT: f32 = -0.2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub latin: String,
    /// In logical order; shaped before drawing.
    pub arabic: String,
    pub background: Color,
    pub foreground: Color,
}

impl PreviewRequest {
    pub fn new(latin: impl Into<String>, arabic: impl Into<String>, scheme: ColorScheme) -> Self {
        Self {
            latin: latin.into(),
            arabic: arabic.into(),
            background: scheme.background,
            foreground: scheme.foreground,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPreview {
    pub jpeg: Vec<u8>,
    /// Set when the preview was not drawn with the requested font.
    pub warning: Option<RenderFallback>,
}

/// Render the two sample lines with `asset` into a JPEG.
///
/// Only encoding can fail; an unusable font degrades to a fallback recorded
/// in [`RenderedPreview::warning`].
pub fn render(asset: &FontAsset, request: &PreviewRequest) -> Result<RenderedPreview> {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, request.background, request.foreground)?;
    let lines = [
        (shape(&request.arabic), HEIGHT as f32 / 2.0 - LINE_OFFSET),
        (request.latin.clone(), HEIGHT as f32 / 2.0 + LINE_OFFSET),
    ];

    let data = asset.to_bytes();
    let warning = match Face::load(&data, 0, FONT_SIZE) {
        Ok(face) => {
            draw_lines(&mut canvas, &face, &lines);
            None
        }
        Err(reason) => {
            let fallback = draw_fallback(&mut canvas, &lines, reason);
            warn!("{}: {fallback}", asset.path().display());
            Some(fallback)
        }
    };

    let jpeg = canvas.encode_jpeg(JPEG_QUALITY)?;
    info!("Rendered {WIDTH}x{HEIGHT} preview ({} bytes)", jpeg.len());
    Ok(RenderedPreview { jpeg, warning })
}

/// Draw each line centered on `x = width / 2` and on its `middle`, where the
/// middle lies halfway between ascent and descent.
fn draw_lines(canvas: &mut Canvas, face: &Face, lines: &[(String, f32)]) {
    let (ascent, descent) = face.vertical_metrics();
    for (text, middle) in lines {
        let (path, width) = face.line_path(text);
        if let Some(path) = path {
            let x = (canvas.width() - width) / 2.0;
            canvas.fill_line(&path, x, middle + (ascent + descent) / 2.0);
        }
    }
}

fn draw_fallback(canvas: &mut Canvas, lines: &[(String, f32)], reason: String) -> RenderFallback {
    if let Some(system) = find_system_sans_serif() {
        match Face::load(&system.data, system.index, FONT_SIZE) {
            Ok(face) => {
                draw_lines(canvas, &face, lines);
                return RenderFallback::SystemFont { family: system.family, reason };
            }
            Err(e) => warn!("system font {} is unusable too: {e}", system.family),
        }
    }

    draw_placeholders(canvas, lines);
    RenderFallback::Placeholder { reason }
}

fn draw_placeholders(canvas: &mut Canvas, lines: &[(String, f32)]) {
    let advance = PLACEHOLDER_ADVANCE * FONT_SIZE;
    let ascent = PLACEHOLDER_ASCENT * FONT_SIZE;
    let descent = PLACEHOLDER_DESCENT * FONT_SIZE;

    for (text, middle) in lines {
        let width = text.chars().count() as f32 * advance;
        let baseline = middle + (ascent + descent) / 2.0;
        let mut x = (canvas.width() - width) / 2.0;
        for c in text.chars() {
            if !c.is_whitespace() {
                canvas.stroke_box(x + advance * 0.1, baseline - ascent, advance * 0.8, ascent);
            }
            x += advance;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use duofont_font_ops::fixture::TestFont;
    use image::{RgbImage, load_from_memory};
    use read_fonts::FontRef;
    use write_fonts::FontBuilder;

    use super::*;

    fn decode(jpeg: &[u8]) -> RgbImage {
        load_from_memory(jpeg).expect("valid jpeg").to_rgb8()
    }

    /// Whether any pixel in the rectangle is clearly dark (or clearly light).
    fn has_ink(image: &RgbImage, xs: Range<u32>, ys: Range<u32>, dark: bool) -> bool {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y))).any(|(x, y)| {
            let luma = image.get_pixel(x, y).0.iter().map(|c| *c as u32).sum::<u32>() / 3;
            if dark { luma < 100 } else { luma > 155 }
        })
    }

    fn asset(data: &[u8]) -> FontAsset {
        FontAsset::from_bytes("test.ttf", data).unwrap()
    }

    #[test]
    fn test_renders_both_lines() {
        let data = TestFont::new("Duo")
            .glyph("A", 0x41)
            .glyph("B", 0x42)
            .glyph("beh", 0x0628)
            .glyph("beh.init", 0xFE91)
            .glyph("beh.fina", 0xFE90)
            .build();
        let request = PreviewRequest::new("AB", "\u{0628}\u{0628}", ColorScheme::LIGHT);

        let preview = render(&asset(&data), &request).unwrap();
        assert!(preview.warning.is_none());
        assert_eq!(&preview.jpeg[..2], &[0xFF, 0xD8]);

        let image = decode(&preview.jpeg);
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        // Latin line is centered on y = 590, Arabic on y = 490
        assert!(has_ink(&image, 900..1020, 560..620, true));
        assert!(has_ink(&image, 900..1020, 460..520, true));
        // nothing far from the text
        assert!(!has_ink(&image, 0..200, 0..200, true));
    }

    #[test]
    fn test_dark_scheme() {
        let data = TestFont::new("Duo").glyph("A", 0x41).build();
        let request = PreviewRequest::new("A", "", ColorScheme::DARK);

        let image = decode(&render(&asset(&data), &request).unwrap().jpeg);
        let corner = image.get_pixel(0, 0).0;
        assert!(corner.iter().all(|c| c.abs_diff(0x12) <= 4), "{corner:?}");
        assert!(has_ink(&image, 930..990, 560..620, false));
    }

    #[test]
    fn test_unrenderable_font_falls_back() {
        // head alone passes inspection but gives the rasterizer nothing to draw
        let full = TestFont::new("Broken").glyph("A", 0x41).build();
        let font = FontRef::new(&full).unwrap();
        let mut builder = FontBuilder::new();
        let head = read_fonts::types::Tag::new(b"head");
        builder.add_raw(head, font.table_data(head).unwrap().as_bytes().to_vec());
        let broken = builder.build();

        let request = PreviewRequest::new("AB", "\u{0628}", ColorScheme::LIGHT);
        let preview = render(&asset(&broken), &request).unwrap();
        let warning = preview.warning.expect("fallback is reported");
        assert!(!warning.reason().is_empty());
        assert!(has_ink(&decode(&preview.jpeg), 0..WIDTH, 540..640, true));
    }

    #[test]
    fn test_placeholders_mark_each_character() {
        let mut canvas = Canvas::new(WIDTH, HEIGHT, Color::WHITE, Color::BLACK).unwrap();
        draw_placeholders(&mut canvas, &[("ab".to_string(), 540.0)]);
        let image = decode(&canvas.encode_jpeg(JPEG_QUALITY).unwrap());
        // two 60 px cells centered on x = 960
        assert!(has_ink(&image, 900..960, 480..560, true));
        assert!(has_ink(&image, 960..1020, 480..560, true));
    }

    #[test]
    fn test_scheme_names() {
        assert_eq!(ColorScheme::LIGHT.name(), "light");
        assert_eq!(ColorScheme::DARK.name(), "dark");
    }
}

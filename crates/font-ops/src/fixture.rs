//! Minimal TrueType fonts built in memory, for tests.
//!
//! Every glyph except empty ones is a 400×700 box, so fonts built here render
//! visibly and carry real `glyf` data through subsetting and merging.

use std::collections::HashMap;

use read_fonts::{tables::glyf::CurvePoint, types::GlyphId};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{
            Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, GlyfLocaBuilder, Glyph,
            SimpleGlyph, Transform,
        },
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{F2Dot14, FWord, Fixed, GlyphId16, LongDateTime, NameId, Tag, UfWord},
};

const BOX: Bbox = Bbox { x_min: 50, y_min: 0, x_max: 450, y_max: 700 };
const BOX_INSTRUCTIONS: &[u8] = &[0xB0, 0x01];

#[derive(Debug, Clone)]
enum Outline {
    Empty,
    Box,
    Composite(Vec<String>),
}

#[derive(Debug, Clone)]
struct TestGlyph {
    name: String,
    codepoint: Option<u32>,
    advance: u16,
    outline: Outline,
}

/// Builder for a small TrueType font.
#[derive(Debug, Clone)]
pub struct TestFont {
    family: String,
    units_per_em: u16,
    glyphs: Vec<TestGlyph>,
    hinted: bool,
    declared_glyph_count: Option<u16>,
    extra_tables: Vec<(Tag, Vec<u8>)>,
}

impl TestFont {
    /// A font containing only `.notdef`.
    pub fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            units_per_em: 1000,
            glyphs: vec![TestGlyph {
                name: ".notdef".to_string(),
                codepoint: None,
                advance: 500,
                outline: Outline::Box,
            }],
            hinted: false,
            declared_glyph_count: None,
            extra_tables: Vec::new(),
        }
    }

    pub fn units_per_em(mut self, units_per_em: u16) -> Self {
        self.units_per_em = units_per_em;
        self
    }

    /// Add a box glyph mapped from `codepoint`.
    pub fn glyph(self, name: &str, codepoint: u32) -> Self {
        self.glyph_with_advance(name, codepoint, 500)
    }

    pub fn glyph_with_advance(mut self, name: &str, codepoint: u32, advance: u16) -> Self {
        self.glyphs.push(TestGlyph {
            name: name.to_string(),
            codepoint: Some(codepoint),
            advance,
            outline: Outline::Box,
        });
        self
    }

    /// Add a box glyph that no codepoint maps to.
    pub fn unmapped_glyph(mut self, name: &str) -> Self {
        self.glyphs.push(TestGlyph {
            name: name.to_string(),
            codepoint: None,
            advance: 500,
            outline: Outline::Box,
        });
        self
    }

    /// Add an empty glyph (e.g. a space).
    pub fn empty_glyph(mut self, name: &str, codepoint: u32) -> Self {
        self.glyphs.push(TestGlyph {
            name: name.to_string(),
            codepoint: Some(codepoint),
            advance: 250,
            outline: Outline::Empty,
        });
        self
    }

    /// Add a composite glyph built from previously added glyphs.
    pub fn composite(mut self, name: &str, codepoint: Option<u32>, components: &[&str]) -> Self {
        self.glyphs.push(TestGlyph {
            name: name.to_string(),
            codepoint,
            advance: 500,
            outline: Outline::Composite(components.iter().map(|c| c.to_string()).collect()),
        });
        self
    }

    /// Give box glyphs instructions and add `fpgm`, `prep` and `cvt ` tables.
    pub fn hinted(mut self) -> Self {
        self.hinted = true;
        self
    }

    /// Claim a different glyph count in `maxp` than the font really holds.
    pub fn declared_glyph_count(mut self, count: u16) -> Self {
        self.declared_glyph_count = Some(count);
        self
    }

    /// Add an arbitrary raw table.
    pub fn table(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
        self.extra_tables.push((Tag::new(tag), data.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let name_to_gid: HashMap<&str, u16> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(gid, glyph)| (glyph.name.as_str(), gid as u16))
            .collect();

        let mut glyf_builder = GlyfLocaBuilder::new();
        for glyph in &self.glyphs {
            let built = match &glyph.outline {
                Outline::Empty => Glyph::Empty,
                Outline::Box => Glyph::Simple(self.box_glyph()),
                Outline::Composite(parts) => composite_glyph(parts, &name_to_gid),
            };
            glyf_builder.add_glyph(&built).expect("valid test glyph");
        }
        let (glyf, loca, loca_format) = glyf_builder.build();

        let cmap = Cmap::from_mappings(self.glyphs.iter().enumerate().filter_map(|(gid, g)| {
            let ch = char::from_u32(g.codepoint?)?;
            Some((ch, GlyphId::new(gid as u32)))
        }))
        .expect("cmap");

        let num_glyphs = self.glyphs.len() as u16;
        let head = Head {
            font_revision: Fixed::from_f64(1.0),
            checksum_adjustment: 0,
            magic_number: 0x5F0F3CF5,
            flags: Flags::empty(),
            units_per_em: self.units_per_em,
            created: LongDateTime::new(0),
            modified: LongDateTime::new(0),
            x_min: BOX.x_min,
            y_min: BOX.y_min,
            x_max: BOX.x_max,
            y_max: BOX.y_max,
            mac_style: MacStyle::empty(),
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            index_to_loc_format: match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
        };

        let advance_max = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        let hhea = Hhea {
            ascender: FWord::new(800),
            descender: FWord::new(-200),
            line_gap: FWord::new(0),
            advance_width_max: UfWord::new(advance_max),
            min_left_side_bearing: FWord::new(0),
            min_right_side_bearing: FWord::new(0),
            x_max_extent: FWord::new(BOX.x_max),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            number_of_h_metrics: num_glyphs,
        };

        let hmtx = Hmtx {
            h_metrics: self
                .glyphs
                .iter()
                .map(|g| LongMetric {
                    advance: g.advance,
                    side_bearing: match g.outline {
                        Outline::Empty => 0,
                        _ => BOX.x_min,
                    },
                })
                .collect(),
            left_side_bearings: vec![],
        };

        let instruction_size = if self.hinted { BOX_INSTRUCTIONS.len() as u16 } else { 0 };
        let maxp = Maxp {
            num_glyphs: self.declared_glyph_count.unwrap_or(num_glyphs),
            max_points: Some(4),
            max_contours: Some(1),
            max_composite_points: Some(8),
            max_composite_contours: Some(2),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(if self.hinted { 1 } else { 0 }),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(if self.hinted { 4 } else { 0 }),
            max_size_of_instructions: Some(instruction_size),
            max_component_elements: Some(2),
            max_component_depth: Some(1),
        };

        let post = Post::new_v2(self.glyphs.iter().map(|g| g.name.as_str()).collect::<Vec<_>>());

        let name = Name::new(vec![NameRecord::new(
            3,
            1,
            0x409,
            NameId::new(1),
            self.family.clone().into(),
        )]);

        let mut builder = FontBuilder::new();
        builder.add_table(&head).expect("head");
        builder.add_table(&hhea).expect("hhea");
        builder.add_table(&hmtx).expect("hmtx");
        builder.add_table(&maxp).expect("maxp");
        builder.add_table(&cmap).expect("cmap");
        builder.add_table(&post).expect("post");
        builder.add_table(&name).expect("name");
        let codepoints = self.glyphs.iter().filter_map(|g| g.codepoint);
        let first_char = codepoints.clone().min().unwrap_or(0).min(0xFFFF) as u16;
        let last_char = codepoints.max().unwrap_or(0).min(0xFFFF) as u16;
        builder.add_table(&os2(first_char, last_char)).expect("OS/2");
        builder.add_table(&glyf).expect("glyf");
        builder.add_table(&loca).expect("loca");

        if self.hinted {
            builder.add_raw(Tag::new(b"fpgm"), vec![0xB0, 0x00]);
            builder.add_raw(Tag::new(b"prep"), vec![0xB0, 0x01]);
            builder.add_raw(Tag::new(b"cvt "), vec![0x00, 0x10, 0x00, 0x20]);
        }
        for (tag, data) in &self.extra_tables {
            builder.add_raw(*tag, data.clone());
        }

        builder.build()
    }

    fn box_glyph(&self) -> SimpleGlyph {
        let points = vec![
            CurvePoint { x: BOX.x_min, y: BOX.y_min, on_curve: true },
            CurvePoint { x: BOX.x_min, y: BOX.y_max, on_curve: true },
            CurvePoint { x: BOX.x_max, y: BOX.y_max, on_curve: true },
            CurvePoint { x: BOX.x_max, y: BOX.y_min, on_curve: true },
        ];
        SimpleGlyph {
            bbox: BOX,
            contours: vec![points.into()],
            instructions: if self.hinted { BOX_INSTRUCTIONS.to_vec() } else { Vec::new() },
        }
    }
}

fn composite_glyph(parts: &[String], name_to_gid: &HashMap<&str, u16>) -> Glyph {
    let mut components = parts.iter().enumerate().map(|(i, part)| Component {
        glyph: GlyphId16::new(name_to_gid[part.as_str()]),
        anchor: Anchor::Offset { x: (i as i16) * 100, y: 0 },
        transform: Transform {
            xx: F2Dot14::from_f32(1.0),
            yx: F2Dot14::from_f32(0.0),
            xy: F2Dot14::from_f32(0.0),
            yy: F2Dot14::from_f32(1.0),
        },
        flags: ComponentFlags::default(),
    });

    let first = components.next().expect("composite needs a component");
    let mut composite = CompositeGlyph::new(first, BOX);
    for component in components {
        composite.add_component(component, BOX);
    }
    Glyph::Composite(composite)
}

fn os2(first_char: u16, last_char: u16) -> Os2 {
    Os2 {
        x_avg_char_width: 500,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: 650,
        y_subscript_y_size: 600,
        y_subscript_x_offset: 0,
        y_subscript_y_offset: 75,
        y_superscript_x_size: 650,
        y_superscript_y_size: 600,
        y_superscript_x_offset: 0,
        y_superscript_y_offset: 350,
        y_strikeout_size: 50,
        y_strikeout_position: 300,
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: first_char,
        us_last_char_index: last_char,
        s_typo_ascender: 800,
        s_typo_descender: -200,
        s_typo_line_gap: 0,
        us_win_ascent: 900,
        us_win_descent: 200,
        ul_code_page_range_1: Some(0),
        ul_code_page_range_2: Some(0),
        sx_height: Some(500),
        s_cap_height: Some(700),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    }
}

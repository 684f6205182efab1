//! Converting `glyf` entries from read-fonts to write-fonts.

use read_fonts::tables::glyf::{self as read_glyf, Glyph as ReadGlyph};
use write_fonts::{
    tables::glyf::{
        Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Contour, Glyph, SimpleGlyph,
        Transform,
    },
    types::GlyphId16,
};

/// What to do with per-glyph TrueType instructions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hinting {
    Keep,
    Strip,
}

/// Glyph IDs referenced as components by a composite glyph.
pub fn component_gids(glyph: &ReadGlyph) -> Vec<u16> {
    match glyph {
        ReadGlyph::Simple(_) => Vec::new(),
        ReadGlyph::Composite(composite) => {
            composite.components().map(|c| c.glyph.to_u16()).collect()
        }
    }
}

/// Convert a glyph, renumbering composite components through `remap`.
///
/// Components that `remap` cannot place are dropped; a composite left without
/// components becomes an empty glyph. Composite instructions are never carried
/// over, simple glyph instructions only with [`Hinting::Keep`].
pub fn convert_glyph(
    glyph: &ReadGlyph,
    remap: impl Fn(u16) -> Option<u16>,
    hinting: Hinting,
) -> Glyph {
    match glyph {
        ReadGlyph::Simple(simple) => {
            let mut contours: Vec<Contour> = Vec::new();
            let mut points = simple.points();
            let mut current_point = 0usize;

            for end_pt in simple.end_pts_of_contours() {
                let end = end_pt.get() as usize;
                let mut contour_points = Vec::new();

                while current_point <= end {
                    if let Some(pt) = points.next() {
                        contour_points.push(read_glyf::CurvePoint {
                            x: pt.x,
                            y: pt.y,
                            on_curve: pt.on_curve,
                        });
                    }
                    current_point += 1;
                }

                contours.push(contour_points.into());
            }

            let bbox = Bbox {
                x_min: simple.x_min(),
                y_min: simple.y_min(),
                x_max: simple.x_max(),
                y_max: simple.y_max(),
            };

            let instructions = match hinting {
                Hinting::Keep => simple.instructions().to_vec(),
                Hinting::Strip => Vec::new(),
            };

            Glyph::Simple(SimpleGlyph { bbox, contours, instructions })
        }
        ReadGlyph::Composite(composite) => {
            let mut components: Vec<Component> = composite
                .components()
                .filter_map(|comp| {
                    let new_gid = remap(comp.glyph.to_u16())?;

                    let anchor = match comp.anchor {
                        read_glyf::Anchor::Offset { x, y } => Anchor::Offset { x, y },
                        read_glyf::Anchor::Point { base, component } => {
                            Anchor::Point { base, component }
                        }
                    };

                    let transform = Transform {
                        xx: comp.transform.xx,
                        yx: comp.transform.yx,
                        xy: comp.transform.xy,
                        yy: comp.transform.yy,
                    };

                    let flags: ComponentFlags = comp.flags.into();

                    Some(Component { glyph: GlyphId16::new(new_gid), anchor, transform, flags })
                })
                .collect();

            if components.is_empty() {
                return Glyph::Empty;
            }

            let bbox = Bbox {
                x_min: composite.x_min(),
                y_min: composite.y_min(),
                x_max: composite.x_max(),
                y_max: composite.y_max(),
            };

            let first_component = components.remove(0);
            let mut composite_glyph = CompositeGlyph::new(first_component, bbox);
            for comp in components {
                composite_glyph.add_component(comp, bbox);
            }

            Glyph::Composite(composite_glyph)
        }
    }
}

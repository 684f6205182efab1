//! What to draw with when the font itself cannot be rendered.

use std::fmt::{self, Display, Formatter};

use fontdb::{Database, Family, Query};
use log::debug;

/// Families tried after the configured generic sans-serif.
const SANS_SERIF_FAMILIES: [&str; 4] = ["DejaVu Sans", "Noto Sans", "Liberation Sans", "Arial"];

/// The preview was not drawn with the requested font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFallback {
    /// Drawn with an installed system typeface instead
    SystemFont { family: String, reason: String },
    /// No usable typeface at all; each character is drawn as an empty box
    Placeholder { reason: String },
}

impl RenderFallback {
    pub fn reason(&self) -> &str {
        match self {
            RenderFallback::SystemFont { reason, .. } | RenderFallback::Placeholder { reason } => {
                reason
            }
        }
    }
}

impl Display for RenderFallback {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RenderFallback::SystemFont { family, reason } => {
                write!(f, "font could not be rendered ({reason}); preview drawn with {family}")
            }
            RenderFallback::Placeholder { reason } => write!(
                f,
                "font could not be rendered ({reason}) and no system font was found; \
                 preview shows placeholder boxes"
            ),
        }
    }
}

/// An installed sans-serif face: family name, font file data, face index.
pub(crate) struct SystemFace {
    pub family: String,
    pub data: Vec<u8>,
    pub index: u32,
}

pub(crate) fn find_system_sans_serif() -> Option<SystemFace> {
    let mut db = Database::new();
    db.load_system_fonts();
    debug!("{} system font faces available", db.len());

    let id = std::iter::once(Family::SansSerif)
        .chain(SANS_SERIF_FAMILIES.iter().map(|name| Family::Name(name)))
        .find_map(|family| db.query(&Query { families: &[family], ..Query::default() }))
        .or_else(|| db.faces().next().map(|face| face.id))?;

    let family = db
        .face(id)
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| "system font".to_string());

    db.with_face_data(id, |data, index| SystemFace { family, data: data.to_vec(), index })
}

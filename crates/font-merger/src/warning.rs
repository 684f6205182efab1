use std::fmt::{self, Display, Formatter};

use read_fonts::types::Tag;

use crate::types::{Codepoint, FontIndex};

/// Something the merge resolved on its own but the caller should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeWarning {
    /// Two fonts map the same codepoint; the earlier font's glyph is used.
    CodepointConflict { codepoint: Codepoint, kept_font: FontIndex, dropped_font: FontIndex },
    /// A table could not be carried into the merged font.
    DroppedTable { tag: Tag, font: FontIndex },
}

impl Display for MergeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MergeWarning::CodepointConflict { codepoint, kept_font, dropped_font } => write!(
                f,
                "{codepoint} is mapped by both {kept_font} and {dropped_font}; kept {kept_font}"
            ),
            MergeWarning::DroppedTable { tag, font } => {
                write!(f, "dropped '{tag}' from {font}: it refers to glyph IDs that no longer hold")
            }
        }
    }
}

/// Merged font binary plus everything that was resolved along the way.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub data: Vec<u8>,
    pub warnings: Vec<MergeWarning>,
}

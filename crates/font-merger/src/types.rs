//! Newtypes that keep source glyph IDs, merged glyph IDs and font positions apart.

use std::fmt::{self, Display, Formatter};

use read_fonts::types::Tag;

macro_rules! u16_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u16);

        impl $name {
            pub const fn new(id: u16) -> Self {
                Self(id)
            }

            pub const fn to_u16(self) -> u16 {
                self.0
            }

            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $label, self.0)
            }
        }
    };
}

u16_id!(
    /// A glyph ID in one of the input fonts
    GlyphId,
    "GID"
);

u16_id!(
    /// A glyph ID in the merged font
    MegaGlyphId,
    "MGID"
);

/// Position of a font in the merge input, zero-based.
///
/// Displayed one-based ("font 1", "font 2") since it ends up in user messages.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontIndex(pub usize);

impl FontIndex {
    pub const FIRST: Self = Self(0);

    pub const fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }

    pub const fn is_first(self) -> bool {
        self.0 == 0
    }
}

impl Display for FontIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "font {}", self.0 + 1)
    }
}

#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub const fn new(cp: u32) -> Self {
        Self(cp)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl Display for Codepoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

/// A table tag given by name on the command line.
#[repr(transparent)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableTag(Tag);

impl TableTag {
    /// Shorter names are padded with spaces (`"cvt"` → `'cvt '`); longer ones are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        (!bytes.is_empty() && bytes.len() <= 4).then(|| {
            let mut arr = [b' '; 4];
            arr[..bytes.len()].copy_from_slice(bytes);
            Self(Tag::new(&arr))
        })
    }

    pub fn tag(&self) -> Tag {
        self.0
    }
}

impl From<Tag> for TableTag {
    fn from(tag: Tag) -> Self {
        Self(tag)
    }
}

impl Display for TableTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

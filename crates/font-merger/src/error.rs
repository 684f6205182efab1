use std::result;

use read_fonts::{ReadError, types::Tag};
use thiserror::Error;
use write_fonts::{BuilderError, error};

use crate::types::FontIndex;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to read font: {0}")]
    Read(#[from] ReadError),

    #[error("failed to write font: {0}")]
    Write(#[from] error::Error),

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("no fonts provided for merging")]
    NoFonts,

    #[error("{font} lacks the required '{tag}' table")]
    MissingTable { font: FontIndex, tag: Tag },

    #[error("{font} has PostScript (CFF) outlines; only TrueType outlines can be merged")]
    UnsupportedOutlines { font: FontIndex },

    #[error("merged font would have {total} glyphs, more than the 65535 a font can address")]
    TooManyGlyphs { total: usize },

    #[error("fonts have incompatible unitsPerEm: expected {expected}, got {actual}")]
    IncompatibleUnitsPerEm { expected: u16, actual: u16 },

    #[error("table values must be equal for '{table}' field '{field}'")]
    NotEqual { table: &'static str, field: &'static str },
}

pub type Result<T> = result::Result<T, MergeError>;

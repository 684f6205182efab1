use std::{io, path::PathBuf, result};

use read_fonts::{ReadError, types::Tag};
use thiserror::Error;

/// Errors raised while opening a font binary.
#[derive(Error, Debug)]
pub enum FontParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("font data is truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("not an sfnt font (signature 0x{0:08X})")]
    InvalidSignature(u32),

    #[error("required table '{0}' not found")]
    MissingTable(Tag),

    #[error("failed to parse font: {0}")]
    Read(#[from] ReadError),
}

pub type Result<T> = result::Result<T, FontParseError>;

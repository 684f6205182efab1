use duofont_font_ops::OutlineFlavor;
use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

/// Why a font could not be subset. Never returned as an `Err` from the public
/// API; it travels inside [`crate::SubsetOutcome::Degraded`].
#[derive(Error, Debug)]
pub enum SubsetError {
    #[error("cannot subset {0} outlines")]
    UnsupportedFlavor(OutlineFlavor),

    #[error("failed to read font: {0}")]
    Read(#[from] ReadError),

    #[error("malformed font: {0}")]
    Malformed(String),

    #[error("failed to write subset font: {0}")]
    Write(#[from] BuilderError),

    #[error("failed to encode glyph data: {0}")]
    Glyph(#[from] error::Error),
}

pub type Result<T> = std::result::Result<T, SubsetError>;

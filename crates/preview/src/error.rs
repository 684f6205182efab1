use std::result;

use image::ImageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("failed to encode preview: {0}")]
    Encode(#[from] ImageError),
}

pub type Result<T> = result::Result<T, PreviewError>;

//! Table-specific merge implementations

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hint;
pub mod hmtx;
pub mod maxp;
pub mod os2;
pub mod post;

/// An opaque sRGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Background of the dark preview, `#121212`
    pub const DARK_GRAY: Self = Self::rgb(0x12, 0x12, 0x12);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

/// Background and text color of a preview.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub background: Color,
    pub foreground: Color,
}

impl ColorScheme {
    /// Black text on white.
    pub const LIGHT: Self = Self { background: Color::WHITE, foreground: Color::BLACK };
    /// White text on `#121212`.
    pub const DARK: Self = Self { background: Color::DARK_GRAY, foreground: Color::WHITE };

    pub fn name(&self) -> &'static str {
        if *self == Self::DARK { "dark" } else { "light" }
    }
}

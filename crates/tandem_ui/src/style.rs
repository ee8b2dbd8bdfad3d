//! Caller-supplied appearance parameters.
//!
//! The engine has no theme: colors, textures and fonts are passed in by the
//! declaration and forwarded to the collaborators untouched.

use tandem_shared::constants::{DEFAULT_FONT, DEFAULT_LOCALE};
use tandem_shared::Vec4;

use crate::render::TextureHandle;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    pub fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }
}

/// What is drawn behind a group's children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Solid fill.
    Color(Color),
    /// Texture stretched over the group.
    Image(TextureHandle),
    /// Nine-patch texture. `patch` is `(x0, y0, x1, y1)` in UV space: the
    /// top-left and bottom-right corners of the stretchable interior.
    NinePatch {
        /// Texture to draw.
        texture: TextureHandle,
        /// Stretchable region in UV coordinates.
        patch: Vec4,
    },
}

/// Direction glyphs are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    /// Left to right.
    #[default]
    LeftToRight,
    /// Right to left.
    RightToLeft,
    /// Decided by the shaper from the locale.
    FromLocale,
}

/// Text settings that apply to following labels and edit boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Glyph color.
    pub color: Color,
    /// Font name, resolved by the shaper.
    pub font: String,
    /// ISO 639 language + ISO 3166 country, e.g. `en-US`.
    pub locale: String,
    /// Layout direction.
    pub direction: TextDirection,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            font: DEFAULT_FONT.to_owned(),
            locale: DEFAULT_LOCALE.to_owned(),
            direction: TextDirection::FromLocale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.0).abs() < 0.01);
        assert!((color.b - 0.0).abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_color_from_vec4() {
        let color = Color::from(Vec4::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(color.to_array(), [0.1, 0.2, 0.3, 0.4]);
    }
}

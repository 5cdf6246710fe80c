use serde::{Deserialize, Serialize};

/// 8-bit ARGB color. Equality is exact per channel, alpha included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    #[serde(default = "opaque")]
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::argb(0, 0, 0, 0);

    /// Opaque color
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 255, r, g, b }
    }

    #[inline]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Unpack a `0xAARRGGBB` sample
    #[inline]
    pub const fn from_argb(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack into a `0xAARRGGBB` sample
    #[inline]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Same alpha, new RGB
    #[inline]
    pub const fn with_rgb(self, r: u8, g: u8, b: u8) -> Self {
        Self { a: self.a, r, g, b }
    }

    /// Apply `f` to R, G and B, keeping alpha
    #[inline]
    pub fn map_rgb(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self {
            a: self.a,
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }

    #[inline]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Self::from_argb(packed)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_argb()
    }
}

/// Clamp a channel value computed in floating point into a byte
#[inline]
pub(crate) fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

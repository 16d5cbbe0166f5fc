/// An RGBA color with 8-bit channels.
///
/// Channel values are `u8`, so the `[0, 255]` range is enforced by the type
/// system. Colors are plain data and cheap to copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Self = Self::rgb(211, 211, 211);
    pub const DARK_GRAY: Self = Self::rgb(64, 64, 64);

    /// Creates an opaque color from red, green, and blue channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color from red, green, blue, and alpha channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from float channels in `[0.0, 1.0]`, clamping values
    /// outside the range.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        fn channel(value: f32) -> u8 {
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::rgba(channel(r), channel(g), channel(b), channel(a))
    }

    /// Returns this color with the alpha channel replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Source-over blend of `src` onto `self`.
    pub fn blend(self, src: Self) -> Self {
        if src.a == 255 {
            return src;
        }
        if src.a == 0 {
            return self;
        }
        let sa = src.a as u32;
        let da = self.a as u32;
        let out_a = sa + da * (255 - sa) / 255;
        if out_a == 0 {
            return Self::TRANSPARENT;
        }
        let ch = |s: u8, d: u8| -> u8 {
            let s = s as u32;
            let d = d as u32;
            (((s * sa + d * da * (255 - sa) / 255) + out_a / 2) / out_a) as u8
        };
        Self::rgba(ch(src.r, self.r), ch(src.g, self.g), ch(src.b, self.b), out_a as u8)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
#[path = "tests/color_tests.rs"]
mod tests;

use std::{fmt, str::FromStr};

use glam::Vec3;
use thiserror::Error;

/// An RGB color with each channel stored in the range [0, 1].
///
/// Colors are written and read in the `#rrggbb` notation used by color
/// pickers, with `#rgb` shorthand also accepted when parsing. Channel values
/// are stored exactly as given (sRGB encoded), use `to_linear` before handing
/// them to a shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);
    pub const BLACK: Color = Color(Vec3::ZERO);

    /// Create a color from floating point channels. Values are clamped to
    /// [0, 1].
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b).clamp(Vec3::ZERO, Vec3::ONE))
    }

    /// Create a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(Vec3::new(r as f32, g as f32, b as f32) / 255.0)
    }

    /// Parse a `#rrggbb` or `#rgb` color string.
    pub fn from_hex(text: &str) -> Result<Self, ColorParseError> {
        let digits = text
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(text.to_string()))?;

        // `from_str_radix` alone would accept a leading sign, eg "+f".
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigits(text.to_string()));
        }

        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16)
                .map_err(|_| ColorParseError::InvalidDigits(text.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::from_rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // Each shorthand digit is repeated, eg "#f80" is "#ff8800".
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::from_rgb8(r * 17, g * 17, b * 17))
            }
            n => Err(ColorParseError::InvalidLength(n)),
        }
    }

    /// Format the color as a lowercase `#rrggbb` string.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Get the color as 8-bit channels.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = (self.0 * 255.0).round();
        [c.x as u8, c.y as u8, c.z as u8]
    }

    /// Get the color channels as a vector.
    pub fn as_vec3(&self) -> Vec3 {
        self.0
    }

    /// Convert the sRGB encoded channels to linear space.
    pub fn to_linear(&self) -> Vec3 {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }

        Vec3::new(channel(self.0.x), channel(self.0.y), channel(self.0.z))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 3]> for Color {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ColorParseError {
    #[error("color `{0}` must start with '#'")]
    MissingHash(String),
    #[error("color `{0}` contains non-hexadecimal digits")]
    InvalidDigits(String),
    #[error("color must have 3 or 6 hex digits but {0} were given")]
    InvalidLength(usize),
}

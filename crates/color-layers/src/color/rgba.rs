//! 8-bit RGBA color type
//!
//! Every pipeline stage works on straight (non-premultiplied) 8-bit RGBA.
//! Equality is exact, component-wise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::ParseColorError;

/// An 8-bit RGBA color.
///
/// Alpha 0 means fully transparent. Transparent pixels never take part in
/// clustering and never appear in a layer mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
    /// Alpha channel (0 = transparent, 255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Create a color from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    ///
    /// # Example
    /// ```
    /// use color_layers::Rgba;
    /// let red = Rgba::opaque(255, 0, 0);
    /// assert_eq!(red.a, 255);
    /// ```
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Convert to a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// True when alpha is zero.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Squared Euclidean distance over (r, g, b). Alpha is ignored.
    #[inline]
    pub fn distance_squared(self, other: Rgba) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Lowercase `#rrggbb` hex string. Alpha is not included.
    ///
    /// # Example
    /// ```
    /// use color_layers::Rgba;
    /// assert_eq!(Rgba::opaque(255, 0, 16).to_hex(), "#ff0010");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}{:02x}", self.to_hex(), self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Accepted forms, with or without a leading `#`:
    /// - `RGB` (shorthand, opaque)
    /// - `RRGGBB` (opaque)
    /// - `RRGGBBAA`
    ///
    /// Parsing is case-insensitive and trims surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (i, c) in hex.char_indices() {
                    let v = u8::from_str_radix(&hex[i..i + c.len_utf8()], 16)?;
                    channels[i] = v * 17;
                }
                Ok(Rgba::opaque(channels[0], channels[1], channels[2]))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&hex[0..2], 16)?;
                let g = u8::from_str_radix(&hex[2..4], 16)?;
                let b = u8::from_str_radix(&hex[4..6], 16)?;
                let a = if hex.len() == 8 {
                    u8::from_str_radix(&hex[6..8], 16)?
                } else {
                    255
                };
                Ok(Rgba::new(r, g, b, a))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

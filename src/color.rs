//! Stroke colours, the preset palette and the fluorescent effect.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alpha applied by the fluorescent (highlighter) effect.
pub const FLUORESCENT_ALPHA: f32 = 0.7;

/// An RGB colour with a floating point alpha, as used for stroke styles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses a `#RRGGBB` string into an opaque colour.
    pub fn from_hex(hex: &str) -> Option<Self> {
        parse_hex(hex).map(|[r, g, b]| Self::opaque(r, g, b))
    }

    /// Alpha scaled to a byte, rounded to nearest.
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha_u8()]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<Rgba> for Color32 {
    fn from(c: Rgba) -> Self {
        Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.alpha_u8())
    }
}

/// Decodes a 7-character `#RRGGBB` string. Case-insensitive.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Re-encodes `hex` with the fluorescent alpha.
///
/// Input that is not a well-formed `#RRGGBB` string falls back to black, without error.
pub fn apply_fluorescent_effect(hex: &str) -> Rgba {
    let [r, g, b] = parse_hex(hex).unwrap_or([0, 0, 0]);
    Rgba { r, g, b, a: FLUORESCENT_ALPHA }
}

/// The preset colour swatches offered by the tool bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Swatch {
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Sky,
}

impl Swatch {
    pub const ALL: [Swatch; 7] = [
        Swatch::Black,
        Swatch::Red,
        Swatch::Green,
        Swatch::Blue,
        Swatch::Yellow,
        Swatch::Orange,
        Swatch::Sky,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Swatch::Black => "#000000",
            Swatch::Red => "#FF0000",
            Swatch::Green => "#00FF00",
            Swatch::Blue => "#0000FF",
            Swatch::Yellow => "#FFE820",
            Swatch::Orange => "#FF9D00",
            Swatch::Sky => "#00A0E6",
        }
    }

    pub fn color32(self) -> Color32 {
        Rgba::from_hex(self.hex()).map(Color32::from).unwrap_or(Color32::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluorescent_keeps_channels() {
        for swatch in Swatch::ALL {
            let [r, g, b] = parse_hex(swatch.hex()).unwrap();
            let c = apply_fluorescent_effect(swatch.hex());
            assert_eq!((c.r, c.g, c.b), (r, g, b));
            assert_eq!(c.a, FLUORESCENT_ALPHA);
        }
    }

    #[test]
    fn fluorescent_formats_as_css() {
        assert_eq!(apply_fluorescent_effect("#FF9D00").to_string(), "rgba(255, 157, 0, 0.7)");
        assert_eq!(apply_fluorescent_effect("#00a0e6").to_string(), "rgba(0, 160, 230, 0.7)");
    }

    #[test]
    fn malformed_input_falls_back_to_black() {
        for bad in ["red", "", "#FFF", "FF0000", "#GG0000", "#FF00000", "#+F0000"] {
            let c = apply_fluorescent_effect(bad);
            assert_eq!(c, Rgba { r: 0, g: 0, b: 0, a: 0.7 }, "input {bad:?}");
            assert_eq!(c.to_string(), "rgba(0, 0, 0, 0.7)");
        }
    }

    #[test]
    fn color32_conversion_rounds_alpha() {
        let c: Color32 = apply_fluorescent_effect("#FF0000").into();
        assert_eq!(c, Color32::from_rgba_unmultiplied(255, 0, 0, 179));
        assert_eq!(Rgba::WHITE.to_array(), [255, 255, 255, 255]);
    }
}

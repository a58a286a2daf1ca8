use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#RRGGBB` form, alpha dropped.
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    pub fn is_opaque(self) -> bool {
        self.a == 0xFF
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#RGB`, `#RRGGBB` and `#RRGGBBAA` (leading `#` optional, `0x` too,
    /// since Alacritty-style palettes use that spelling).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);

        if !hex.is_ascii() {
            return Err(format!("Invalid color '{}'", s));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("Invalid color '{}'", s))
        };

        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 0x11);
                Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!("Invalid color '{}'", s)),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn parses_six_and_eight_digit_hex() {
        assert_eq!("#2B2D31".parse::<Color>(), Ok(Color::rgb(0x2B, 0x2D, 0x31)));
        assert_eq!(
            "#BBBBBB90".parse::<Color>(),
            Ok(Color::rgba(0xBB, 0xBB, 0xBB, 0x90))
        );
        assert_eq!("0xffffff".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("#fff".parse::<Color>(), Ok(Color::WHITE));
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("#ÿÿÿ".parse::<Color>().is_err());
    }

    #[test]
    fn display_keeps_alpha_only_when_translucent() {
        assert_eq!(Color::rgb(0x44, 0x47, 0x5A).to_string(), "#44475A");
        assert_eq!(Color::rgba(0xBB, 0xBB, 0xBB, 0x90).to_string(), "#BBBBBB90");
        assert_eq!(Color::rgba(0xBB, 0xBB, 0xBB, 0x90).to_hex_rgb(), "#BBBBBB");
    }
}

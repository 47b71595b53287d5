// DB Migrator Color Handling
//
// Hex color parsing plus the HSL and RGB triples written to the style root
// whenever the primary color changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a hex color
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color '{0}' must have exactly 6 hex digits")]
    InvalidLength(String),
    #[error("color '{0}' contains a non-hex digit")]
    InvalidDigit(String),
}

/// A 6-hex-digit RGB color, rendered as lowercase `#rrggbb`.
///
/// Construction goes through [`HexColor::from_str`] (or serde, which uses the
/// same path), so every value held by the settings model is convertible to
/// HSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// HSL triple formatted as `"<hue> <saturation>% <lightness>%"`.
    ///
    /// Hue uses the 6-sector formula; every component is rounded half-up to
    /// an integer so the output is stable across platforms.
    pub fn to_hsl_string(&self) -> String {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let mut s = 0.0;
        let mut h = 0.0;
        if max != min {
            let delta = max - min;
            s = if l > 0.5 {
                delta / (2.0 - max - min)
            } else {
                delta / (max + min)
            };

            h = if max == r {
                (g - b) / delta + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            h /= 6.0;
        }

        format!(
            "{} {}% {}%",
            round_half_up(h * 360.0),
            round_half_up(s * 100.0),
            round_half_up(l * 100.0)
        )
    }

    /// Decimal RGB triple formatted as `"<r>, <g>, <b>"`.
    pub fn to_rgb_string(&self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }

    /// 24-bit ANSI foreground escape for terminal rendering
    pub fn ansi_foreground(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(s.to_string()));
        }
        if digits.len() != 6 {
            return Err(ColorError::InvalidLength(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::InvalidDigit(s.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

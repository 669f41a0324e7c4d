//! Hex color parsing and channel shifting.

use std::fmt;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb`, or the short `#rgb` form.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => {
                let num = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::new((num >> 16) as u8, (num >> 8) as u8, num as u8))
            }
            3 => {
                let expand = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Shift every channel by `percent` of the full 0..255 range, clamped.
    ///
    /// Negative percentages darken; `-20` subtracts 51 from each channel.
    pub fn shift(self, percent: i32) -> Self {
        let amount = (2.55 * percent as f64).round() as i32;
        let channel = |c: u8| (c as i32 + amount).clamp(0, 255) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn darken(self, percent: u8) -> Self {
        self.shift(-(percent as i32))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

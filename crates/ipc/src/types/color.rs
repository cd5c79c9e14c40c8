//! CSS-style hex colors used by the model recolor command.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IpcError;

/// An sRGB color parsed from `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// RGBA floats in 0-1 with opaque alpha
    pub fn to_rgba(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

impl FromStr for HexColor {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IpcError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            3 => {
                // #abc expands to #aabbcc
                let nibble = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16).map(|n| n * 17)
                };
                Ok(Self {
                    r: nibble(0).map_err(|_| invalid())?,
                    g: nibble(1).map_err(|_| invalid())?,
                    b: nibble(2).map_err(|_| invalid())?,
                })
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                Ok(Self {
                    r: byte(0).map_err(|_| invalid())?,
                    g: byte(2).map_err(|_| invalid())?,
                    b: byte(4).map_err(|_| invalid())?,
                })
            }
            _ => Err(invalid()),
        }
    }
}

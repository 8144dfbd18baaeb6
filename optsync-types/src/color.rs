//! RGBA colors with 16-bit channels.
//!
//! The string form is `#rrggbbaa`: each channel is written as the high byte of
//! its 16-bit value, and parsing expands a byte `x` back to `x << 8 | x`.
//! Only colors built with [`Color::rgba8`] survive format-then-parse exactly;
//! other 16-bit values come back quantized.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub alpha: u16,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgba8(0, 0, 0, 0xff);

    /// Creates a color from full 16-bit channels.
    #[must_use]
    pub const fn new(red: u16, green: u16, blue: u16, alpha: u16) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates a color from 8-bit channels, expanding each to 16 bits.
    #[must_use]
    pub const fn rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: expand(red),
            green: expand(green),
            blue: expand(blue),
            alpha: expand(alpha),
        }
    }

    /// Returns the channels reduced to 8 bits, in RGBA order.
    #[must_use]
    pub const fn to_rgba8(self) -> [u8; 4] {
        [
            (self.red >> 8) as u8,
            (self.green >> 8) as u8,
            (self.blue >> 8) as u8,
            (self.alpha >> 8) as u8,
        ]
    }
}

const fn expand(channel: u8) -> u16 {
    (channel as u16) << 8 | channel as u16
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 8 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut channels = [0u8; 4];
        for (i, channel) in channels.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }

        let [r, g, b, a] = channels;
        Ok(Self::rgba8(r, g, b, a))
    }
}

//! Team display colors
//!
//! Colors are stored and exchanged as hex strings (`#RRGGBB`). Parsing accepts
//! the leading `#` as optional and either letter case; formatting always
//! produces the canonical upper-case form.

use std::{fmt::Display, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// Colors handed out to new teams when none is chosen
const PALETTE: [Color; 10] = [
    Color::rgb(0xE5, 0x39, 0x35),
    Color::rgb(0x1E, 0x88, 0xE5),
    Color::rgb(0x43, 0xA0, 0x47),
    Color::rgb(0xFB, 0x8C, 0x00),
    Color::rgb(0x8E, 0x24, 0xAA),
    Color::rgb(0x00, 0xAC, 0xC1),
    Color::rgb(0xD8, 0x1B, 0x60),
    Color::rgb(0x6D, 0x4C, 0x41),
    Color::rgb(0xFD, 0xD8, 0x35),
    Color::rgb(0x54, 0x6E, 0x7A),
];

/// An opaque RGB color encoded as a hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

/// Errors that can occur while parsing a hex color
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The string does not have exactly six hex digits
    #[error("color must have six hex digits")]
    Length,
    /// The string contains a character that is not a hex digit
    #[error("color contains a non-hex digit")]
    Digit,
}

impl Color {
    /// Creates a color from its red, green and blue components
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Picks a random color from the default palette
    pub fn random() -> Self {
        PALETTE[fastrand::usize(..PALETTE.len())]
    }

    /// Returns the `(red, green, blue)` components
    pub fn components(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

impl Default for Color {
    fn default() -> Self {
        PALETTE[0]
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parses a color from `#RRGGBB` or `RRGGBB`
    ///
    /// # Errors
    ///
    /// * `Error::Length` - The string does not hold exactly six digits
    /// * `Error::Digit` - A character is not a hex digit
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Digit);
        }
        if hex.len() != 6 {
            return Err(Error::Length);
        }
        let component = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| Error::Digit);
        Ok(Self::rgb(component(0)?, component(2)?, component(4)?))
    }
}

// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Category palette and colour conversion.
//!
//! This module defines the accent colour of each waste category as used by
//! the panel (RGB565) and provides the conversions between that packed form
//! and the hexadecimal strings found in the catalog files.

use crate::model::Category;

/// A colour packed as 5 bits red, 6 bits green, 5 bits blue.
pub type Rgb565 = u16;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub background_colour: Rgb565,
    pub accent_colour: Rgb565,
    pub header_colour: Rgb565,

    pub plastic_colour: Rgb565,
    pub paper_colour: Rgb565,
    pub green_colour: Rgb565,
    pub waste_colour: Rgb565,
}

impl Default for Theme {
    // Returns the standard kiosk theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub const fn default_theme() -> Self {
        Self {
            background_colour: 0x1082,
            accent_colour: 0x03FF,
            header_colour: 0x000A,

            plastic_colour: 0xFC00,
            paper_colour: 0x03BF,
            green_colour: 0x07E0,
            waste_colour: 0x6B4D,
        }
    }

    /// Accent colour used for a category's grid cells and LED strip.
    pub const fn category_colour(&self, category: Category) -> Rgb565 {
        match category {
            Category::Plastic => self.plastic_colour,
            Category::Paper => self.paper_colour,
            Category::Green => self.green_colour,
            Category::Waste => self.waste_colour,
        }
    }

    /// Converts a packed colour into the `0xHEX` string form used by the
    /// local catalog files.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortkiosk::theme::Theme;
    /// assert_eq!(Theme::to_hex(0xFC00), "0xFC00");
    /// assert_eq!(Theme::to_hex(0x7E0), "0x7E0");
    /// ```
    pub fn to_hex(colour: Rgb565) -> String {
        format!("0x{:X}", colour)
    }

    /// Parses a hexadecimal colour string, with or without a `0x` prefix.
    ///
    /// Returns `None` when the string is not valid hex or does not fit in
    /// 16 bits.
    pub fn from_hex(text: &str) -> Option<Rgb565> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u16::from_str_radix(digits, 16).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_keeps_value() {
        for colour in [0x0000, 0x6B4D, 0xFC00, 0xFFFF] {
            assert_eq!(Theme::from_hex(&Theme::to_hex(colour)), Some(colour));
        }
    }

    #[test]
    fn from_hex_accepts_bare_digits_and_rejects_garbage() {
        assert_eq!(Theme::from_hex("03bf"), Some(0x03BF));
        assert_eq!(Theme::from_hex("0Xfd20"), Some(0xFD20));
        assert_eq!(Theme::from_hex("0xGG"), None);
        assert_eq!(Theme::from_hex("0x12345"), None);
    }

    #[test]
    fn every_category_has_a_distinct_colour() {
        let theme = Theme::default();
        let colours: Vec<Rgb565> = Category::ALL
            .iter()
            .map(|c| theme.category_colour(*c))
            .collect();
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

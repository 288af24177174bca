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

//! 8-bit colour arithmetic for the LED strips.

use crate::theme::Rgb565;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const GREEN: Rgb = Rgb::new(0, 128, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Expands a panel colour to 8 bits per channel.
    pub const fn from_rgb565(colour: Rgb565) -> Self {
        Self {
            r: ((colour >> 11) << 3) as u8,
            g: (((colour >> 5) & 0x3F) << 2) as u8,
            b: ((colour & 0x1F) << 3) as u8,
        }
    }

    /// Scales every channel by `brightness / 256`, keeping full brightness
    /// lossless.
    pub const fn scale(self, brightness: u8) -> Self {
        Self {
            r: scale8(self.r, brightness),
            g: scale8(self.g, brightness),
            b: scale8(self.b, brightness),
        }
    }

    /// Fully saturated colour for a hue on a 0..=255 wheel.
    pub fn from_hue(hue: u8) -> Self {
        let sector = hue / 43;
        let offset = (hue - sector * 43) as u16 * 6;
        let rising = offset.min(255) as u8;
        let falling = 255 - rising;

        match sector {
            0 => Rgb::new(255, rising, 0),
            1 => Rgb::new(falling, 255, 0),
            2 => Rgb::new(0, 255, rising),
            3 => Rgb::new(0, falling, 255),
            4 => Rgb::new(rising, 0, 255),
            _ => Rgb::new(255, 0, falling),
        }
    }
}

pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (scale as u16 + 1)) >> 8) as u8
}

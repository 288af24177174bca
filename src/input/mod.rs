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

//! Touch input.
//!
//! Raw samples from the resistive touch controller are calibrated into screen
//! coordinates and turned into [`Intent`]s by the [`GestureRecognizer`].

pub mod gesture;

pub use gesture::GestureRecognizer;

pub const SCREEN_WIDTH: i32 = 240;
pub const SCREEN_HEIGHT: i32 = 320;

/// Raw readings outside this range are sensor noise.
pub const RAW_VALID: std::ops::RangeInclusive<i32> = 100..=4000;

/// One poll of the touch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchSample {
    pub touched: bool,
    pub raw_x: i32,
    pub raw_y: i32,
}

impl TouchSample {
    pub const fn down(raw_x: i32, raw_y: i32) -> Self {
        Self {
            touched: true,
            raw_x,
            raw_y,
        }
    }

    pub const fn released() -> Self {
        Self {
            touched: false,
            raw_x: 0,
            raw_y: 0,
        }
    }

    pub fn is_plausible(&self) -> bool {
        RAW_VALID.contains(&self.raw_x) && RAW_VALID.contains(&self.raw_y)
    }
}

/// What the user meant by a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Tap { x: i32, y: i32 },
    SwipeLeft,
    SwipeRight,
}

/// Mapping from raw controller readings to portrait screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub raw_x_min: i32,
    pub raw_x_max: i32,
    pub raw_y_min: i32,
    pub raw_y_max: i32,
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            raw_x_min: 200,
            raw_x_max: 3800,
            raw_y_min: 200,
            raw_y_max: 3800,
            swap_xy: false,
            invert_x: false,
            invert_y: false,
        }
    }
}

impl Calibration {
    /// Maps a raw reading onto the screen, clamped to its bounds.
    pub fn map(&self, raw_x: i32, raw_y: i32) -> (i32, i32) {
        let (raw_x, raw_y) = if self.swap_xy {
            (raw_y, raw_x)
        } else {
            (raw_x, raw_y)
        };

        let mut x = scale(raw_x, self.raw_x_min, self.raw_x_max, SCREEN_WIDTH);
        let mut y = scale(raw_y, self.raw_y_min, self.raw_y_max, SCREEN_HEIGHT);

        if self.invert_x {
            x = SCREEN_WIDTH - 1 - x;
        }
        if self.invert_y {
            y = SCREEN_HEIGHT - 1 - y;
        }

        (x.clamp(0, SCREEN_WIDTH - 1), y.clamp(0, SCREEN_HEIGHT - 1))
    }

    /// Raw reading that maps back onto a screen position, ignoring swap and
    /// inversion. Used by the simulator and tests.
    pub fn raw_for(&self, x: i32, y: i32) -> (i32, i32) {
        let raw_x = self.raw_x_min + div_ceil(x * (self.raw_x_max - self.raw_x_min), SCREEN_WIDTH);
        let raw_y = self.raw_y_min + div_ceil(y * (self.raw_y_max - self.raw_y_min), SCREEN_HEIGHT);
        (raw_x, raw_y)
    }
}

fn scale(value: i32, in_min: i32, in_max: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return 0;
    }
    (value - in_min) * out_max / (in_max - in_min)
}

fn div_ceil(a: i32, b: i32) -> i32 {
    (a + b - 1) / b
}

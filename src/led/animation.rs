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

//! Time-based animation curves.
//!
//! An [`Animation`] is a pure function of the current time: its state is only
//! the moment it started, so rendering never depends on how often it is
//! called.

use std::f32::consts::TAU;

use crate::{led::color::Rgb, model::Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Ramps up from dark to full over each cycle.
    Pulse,
    /// Ramps down from full to dark over each cycle.
    Fade,
    Rainbow,
    /// Sinusoidal brightness around half intensity.
    Breathing,
    /// Ten flashes per cycle.
    Strobe,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub kind: AnimationKind,
    pub color: Rgb,
    pub duration_ms: u64,
    pub started_at: u64,
    pub category: Category,
}

impl Animation {
    /// Position within the current cycle, in `0.0..1.0`.
    pub fn progress(&self, now: u64) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed % self.duration_ms) as f32 / self.duration_ms as f32
    }

    /// Renders the strip for time `now`.
    pub fn render(&self, now: u64, leds: usize) -> Vec<Rgb> {
        let p = self.progress(now);

        match self.kind {
            AnimationKind::Breathing => {
                let brightness = 128.0 + 128.0 * (p * TAU).sin();
                vec![self.color.scale(to_brightness(brightness)); leds]
            }
            AnimationKind::Pulse => vec![self.color.scale(to_brightness(255.0 * p)); leds],
            AnimationKind::Fade => {
                vec![self.color.scale(to_brightness(255.0 * (1.0 - p))); leds]
            }
            AnimationKind::Solid => vec![self.color; leds],
            AnimationKind::Strobe => {
                if (p * 10.0).fract() < 0.5 {
                    vec![self.color; leds]
                } else {
                    vec![Rgb::BLACK; leds]
                }
            }
            AnimationKind::Rainbow => {
                let base = (p * 255.0) as u32;
                (0..leds)
                    .map(|i| {
                        let offset = (i * 255 / leds.max(1)) as u32;
                        Rgb::from_hue(((base + offset) % 256) as u8)
                    })
                    .collect()
            }
        }
    }
}

fn to_brightness(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

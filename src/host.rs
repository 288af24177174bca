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

//! Log-backed stand-ins for the display and LED hardware, used when the
//! kiosk runs on a development host.

use anyhow::Result;
use log::{debug, info};

use crate::{
    led::{LedDriver, Rgb, CHANNEL_COUNT},
    model::Category,
    screens::render::{Renderer, ScreenDescriptor},
};

#[derive(Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn show_screen(&mut self, screen: &ScreenDescriptor) -> Result<()> {
        match screen {
            ScreenDescriptor::Idle { lines, .. } => info!("[idle] {}", lines.join(" / ")),
            ScreenDescriptor::Grid { cells, page, stale } => {
                let labels: Vec<&str> = cells.iter().map(|c| c.label.as_str()).collect();
                info!(
                    "[grid {}{}] {}",
                    page,
                    if *stale { ", cached" } else { "" },
                    labels.join(" | ")
                );
            }
            ScreenDescriptor::Confirm { name, .. } => info!("[confirm] Is the {} clean?", name),
            ScreenDescriptor::Result {
                name,
                category,
                is_dirty,
                ..
            } => info!(
                "[result] {}{} goes in {}",
                name,
                if *is_dirty { " (dirty)" } else { "" },
                category.as_str()
            ),
            ScreenDescriptor::Search {
                query,
                results,
                total,
            } => info!("[search '{}'] {} of {}: {}", query, results.len(), total, results.join(", ")),
            ScreenDescriptor::Unavailable { message } => info!("[unavailable] {}", message),
        }
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        info!("[message] {}", text);
        Ok(())
    }
}

/// Keeps the pending frame and logs a strip only when its first pixel
/// changes.
pub struct LogLedDriver {
    pending: [Vec<Rgb>; CHANNEL_COUNT],
    shown: [Rgb; CHANNEL_COUNT],
}

impl Default for LogLedDriver {
    fn default() -> Self {
        Self {
            pending: Default::default(),
            shown: [Rgb::BLACK; CHANNEL_COUNT],
        }
    }
}

impl LedDriver for LogLedDriver {
    fn set_channel_pixels(&mut self, channel: usize, colors: &[Rgb]) -> Result<()> {
        if let Some(slot) = self.pending.get_mut(channel) {
            slot.clear();
            slot.extend_from_slice(colors);
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        for (channel, pixels) in self.pending.iter().enumerate() {
            let lead = pixels.first().copied().unwrap_or(Rgb::BLACK);
            if lead != self.shown[channel] {
                let name = Category::from_channel(channel).map_or("?", |c| c.as_str());
                debug!("LED {} -> #{:02X}{:02X}{:02X}", name, lead.r, lead.g, lead.b);
                self.shown[channel] = lead;
            }
        }
        Ok(())
    }
}

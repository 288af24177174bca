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

//! # Sort kiosk control core.
//!
//! Guides a user to sort an item into one of four waste categories, with
//! feedback on the screen and on one LED strip per category, while keeping
//! the item catalog in step with a remote service over an unreliable link.
//!
//! The core is hardware-agnostic. Drawing, LED output and the network are
//! reached through the [`screens::render::Renderer`], [`led::LedDriver`],
//! [`sync::api::CatalogApi`] and [`sync::link::NetworkLink`] traits, and
//! [`app::Kiosk`] ties the components together on a single-threaded loop.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod idle;
pub mod input;
pub mod led;
pub mod model;
pub mod screens;
pub mod sync;
pub mod theme;
pub mod util;

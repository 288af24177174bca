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

//! Application events and their distribution.
//!
//! This module acts as the central hub between input, screens, feedback and
//! synchronization. Everything that happens in the kiosk is expressed as an
//! [`AppEvent`] and routed through the [`bus::EventBus`].
//!
//! # Organization
//!
//! * [`bus`]: The synchronous publish/subscribe dispatcher.
//! * [`handlers`]: The reactions of the kiosk components to each event.

pub mod bus;
pub(crate) mod handlers;

pub use bus::{BusEvent, EventBus, Outbox};

use crate::{
    idle::IdleTransition,
    input::Intent,
    model::{Category, ItemId, Provenance},
    screens::ScreenKind,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A recognised gesture, stamped with the tick time it was seen at.
    Intent { intent: Intent, at: u64 },

    ItemSelected {
        item_id: ItemId,
        is_dirty: bool,
        display_category: Category,
    },

    ScreenChanged { from: ScreenKind, to: ScreenKind },

    Idle { transition: IdleTransition, at: u64 },

    /// The attract loop moved on to another item.
    AttractItem(ItemId),

    CatalogUpdated { provenance: Provenance, count: usize },

    ConnectivityChanged(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Intent,
    ItemSelected,
    ScreenChanged,
    Idle,
    AttractItem,
    CatalogUpdated,
    ConnectivityChanged,
}

impl BusEvent for AppEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            AppEvent::Intent { .. } => EventKind::Intent,
            AppEvent::ItemSelected { .. } => EventKind::ItemSelected,
            AppEvent::ScreenChanged { .. } => EventKind::ScreenChanged,
            AppEvent::Idle { .. } => EventKind::Idle,
            AppEvent::AttractItem(_) => EventKind::AttractItem,
            AppEvent::CatalogUpdated { .. } => EventKind::CatalogUpdated,
            AppEvent::ConnectivityChanged(_) => EventKind::ConnectivityChanged,
        }
    }
}

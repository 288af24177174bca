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

//! Reactions of the kiosk components to application events.
//!
//! [`register`] subscribes one handler per event kind. Every handler borrows
//! the components it needs only for as long as it uses them, so follow-up
//! events published to the outbox are delivered with nothing borrowed.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    events::{AppEvent, EventBus, EventKind, Outbox},
    idle::{IdleMonitor, IdleTransition},
    led::{AnimationKind, LedFeedbackEngine, Rgb},
    model::catalog::CatalogStore,
    screens::{ScreenKind, ScreenStateMachine},
    sync::{CatalogSyncService, PostOutcome},
    theme::Theme,
};

/// Components shared between the kiosk loop and the event handlers.
#[derive(Clone)]
pub(crate) struct Shared {
    pub(crate) store: Rc<RefCell<CatalogStore>>,
    pub(crate) screens: Rc<RefCell<ScreenStateMachine>>,
    pub(crate) idle: Rc<RefCell<IdleMonitor>>,
    pub(crate) leds: Rc<RefCell<LedFeedbackEngine>>,
    pub(crate) sync: Rc<RefCell<CatalogSyncService>>,
    /// Time of the tick being processed.
    pub(crate) now: Rc<Cell<u64>>,
    pub(crate) location: Rc<str>,
    pub(crate) feedback_cycle_ms: u64,
    pub(crate) theme: Theme,
}

pub(crate) fn register(bus: &mut EventBus<AppEvent>, shared: &Shared) {
    bus.subscribe_all(|event, _| {
        debug!("Event {:?}", event);
        Ok(())
    });

    let s = shared.clone();
    bus.subscribe(EventKind::Intent, move |event, outbox| handle_intent(&s, event, outbox));

    let s = shared.clone();
    bus.subscribe(EventKind::Idle, move |event, outbox| handle_idle(&s, event, outbox));

    let s = shared.clone();
    bus.subscribe(EventKind::ScreenChanged, move |event, _| {
        handle_screen_changed(&s, event)
    });

    let s = shared.clone();
    bus.subscribe(EventKind::ItemSelected, move |event, _| {
        handle_item_selected(&s, event)
    });

    let s = shared.clone();
    bus.subscribe(EventKind::AttractItem, move |event, _| {
        handle_attract_item(&s, event)
    });

    let s = shared.clone();
    bus.subscribe(EventKind::CatalogUpdated, move |event, _| {
        handle_catalog_updated(&s, event)
    });

    let s = shared.clone();
    bus.subscribe(EventKind::ConnectivityChanged, move |event, outbox| {
        handle_connectivity_changed(&s, event, outbox)
    });
}

fn handle_intent(s: &Shared, event: &AppEvent, outbox: &mut Outbox<AppEvent>) -> Result<()> {
    let AppEvent::Intent { at, .. } = event else {
        return Ok(());
    };

    let events = s.screens.borrow_mut().handle(event, &s.store.borrow());
    outbox.publish_all(events);

    if let Some(transition) = s.idle.borrow_mut().record_activity(*at) {
        outbox.publish(AppEvent::Idle {
            transition,
            at: *at,
        });
    }
    Ok(())
}

fn handle_idle(s: &Shared, event: &AppEvent, outbox: &mut Outbox<AppEvent>) -> Result<()> {
    if let AppEvent::Idle {
        transition: IdleTransition::Entered,
        ..
    } = event
    {
        info!("Entering attract mode");
    }
    let events = s.screens.borrow_mut().handle(event, &s.store.borrow());
    outbox.publish_all(events);
    Ok(())
}

fn handle_screen_changed(s: &Shared, event: &AppEvent) -> Result<()> {
    let AppEvent::ScreenChanged { from, to } = event else {
        return Ok(());
    };

    let leaving_attract = *from == ScreenKind::Idle;
    let browsing = matches!(to, ScreenKind::Grid | ScreenKind::Search);
    if leaving_attract || browsing {
        s.leds.borrow_mut().stop().context("Failed to switch off LEDs")?;
    }
    Ok(())
}

fn handle_item_selected(s: &Shared, event: &AppEvent) -> Result<()> {
    let AppEvent::ItemSelected {
        item_id,
        is_dirty,
        display_category,
    } = event
    else {
        return Ok(());
    };

    let item = {
        let mut store = s.store.borrow_mut();
        store.mark_dirty(*item_id, *is_dirty);
        store.get(*item_id).cloned()
    };
    let Some(item) = item else {
        warn!("Selected item {} is not in the catalog", item_id);
        return Ok(());
    };
    info!(
        "Selected {} ({}), goes in {}",
        item.name,
        if *is_dirty { "dirty" } else { "clean" },
        display_category.as_str()
    );

    let now = s.now.get();
    s.idle.borrow_mut().record_activity(now);

    let colour = if *is_dirty {
        s.theme.category_colour(*display_category)
    } else {
        item.color
    };
    s.leds
        .borrow_mut()
        .start_animation_for_category(
            *display_category,
            AnimationKind::Breathing,
            Rgb::from_rgb565(colour),
            s.feedback_cycle_ms,
            now,
        )
        .context("Failed to start feedback animation")?;

    match s.sync.borrow_mut().post_interaction(&s.location, &item.name, *is_dirty) {
        PostOutcome::Sent { server_queued } => {
            debug!("Interaction sent (server queued: {})", server_queued)
        }
        PostOutcome::Queued => info!("Interaction queued for later"),
        PostOutcome::Dropped => warn!("Interaction for {} was lost", item.name),
    }
    Ok(())
}

fn handle_attract_item(s: &Shared, event: &AppEvent) -> Result<()> {
    let AppEvent::AttractItem(item_id) = event else {
        return Ok(());
    };
    let Some(item) = s.store.borrow().get(*item_id).cloned() else {
        return Ok(());
    };

    s.leds
        .borrow_mut()
        .start_animation_for_category(
            item.category,
            AnimationKind::Breathing,
            Rgb::from_rgb565(item.color),
            s.feedback_cycle_ms,
            s.now.get(),
        )
        .context("Failed to start attract animation")
}

fn handle_catalog_updated(s: &Shared, event: &AppEvent) -> Result<()> {
    if let AppEvent::CatalogUpdated { provenance, count } = event {
        info!("Catalog now has {} items ({})", count, provenance.as_str());
    }
    s.screens.borrow_mut().on_catalog_replaced(&s.store.borrow());
    Ok(())
}

fn handle_connectivity_changed(
    s: &Shared,
    event: &AppEvent,
    outbox: &mut Outbox<AppEvent>,
) -> Result<()> {
    let AppEvent::ConnectivityChanged(true) = event else {
        info!("Working offline");
        return Ok(());
    };

    let flushed = s.sync.borrow_mut().flush_pending();
    if flushed.sent > 0 || !flushed.is_complete() {
        info!(
            "Replayed {} queued posts, {} remaining",
            flushed.sent, flushed.remaining
        );
    }

    let snapshot = s.sync.borrow_mut().fetch_catalog()?;
    let provenance = snapshot.provenance;
    let count = snapshot.len();
    s.store.borrow_mut().replace(snapshot);
    outbox.publish(AppEvent::CatalogUpdated { provenance, count });
    Ok(())
}

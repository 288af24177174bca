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

//! The kiosk control loop.
//!
//! [`Kiosk`] owns every component and wires them together through the event
//! bus. The host calls [`Kiosk::boot`] once and then [`Kiosk::tick`] at a
//! steady cadence with the current time and the latest touch sample. All
//! time-based behaviour is driven by the `now` passed in, so the loop can be
//! run against a simulated clock.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use anyhow::{Context, Result};
use log::{debug, error, info, warn};

use crate::{
    config::AppConfig,
    events::{AppEvent, EventBus, handlers},
    idle::IdleMonitor,
    input::{Calibration, GestureRecognizer, TouchSample},
    led::{LedDriver, LedFeedbackEngine},
    model::{Category, catalog::CatalogStore},
    screens::{ScreenKind, ScreenStateMachine, render::Renderer},
    sync::{CatalogSyncService, Connectivity},
    theme::Theme,
};

/// Timings and identity of one kiosk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskSettings {
    pub location: String,
    pub idle_timeout_ms: u64,
    pub attract_interval_ms: u64,
    pub feedback_cycle_ms: u64,
    pub link_poll_interval_ms: u64,
    pub leds_per_strip: usize,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for KioskSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            location: config.location.clone(),
            idle_timeout_ms: config.idle_timeout_ms,
            attract_interval_ms: config.attract_interval_ms,
            feedback_cycle_ms: config.feedback_cycle_ms,
            link_poll_interval_ms: config.link_poll_interval_ms,
            leds_per_strip: config.leds_per_strip,
        }
    }
}

pub struct Kiosk {
    bus: EventBus<AppEvent>,
    gestures: GestureRecognizer,
    shared: handlers::Shared,
    renderer: Box<dyn Renderer>,
    link_poll_interval_ms: u64,
    next_link_poll: u64,
}

impl Kiosk {
    pub fn new(
        settings: KioskSettings,
        sync: CatalogSyncService,
        led_driver: Box<dyn LedDriver>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let shared = handlers::Shared {
            store: Rc::new(RefCell::new(CatalogStore::new())),
            screens: Rc::new(RefCell::new(ScreenStateMachine::new(
                settings.attract_interval_ms,
            ))),
            idle: Rc::new(RefCell::new(IdleMonitor::new(settings.idle_timeout_ms, 0))),
            leds: Rc::new(RefCell::new(LedFeedbackEngine::new(
                led_driver,
                settings.leds_per_strip,
            ))),
            sync: Rc::new(RefCell::new(sync)),
            now: Rc::new(Cell::new(0)),
            location: settings.location.as_str().into(),
            feedback_cycle_ms: settings.feedback_cycle_ms,
            theme: Theme::default(),
        };

        let mut bus = EventBus::new();
        handlers::register(&mut bus, &shared);

        Self {
            bus,
            gestures: GestureRecognizer::new(Calibration::default()),
            shared,
            renderer,
            link_poll_interval_ms: settings.link_poll_interval_ms,
            next_link_poll: 0,
        }
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.gestures = GestureRecognizer::new(calibration);
        self
    }

    /// Loads the catalog, replays interactions left from a previous run and
    /// enters the attract loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the LEDs cannot be initialised or a status message
    /// cannot be shown. A failure to draw the screen is only logged.
    pub fn boot(&mut self, now: u64) -> Result<()> {
        self.shared.now.set(now);
        self.shared.idle.borrow_mut().reset(now);

        self.shared
            .leds
            .borrow_mut()
            .all_off()
            .context("Failed to initialise LEDs")?;

        self.renderer.show_message("Connecting...")?;
        let online = self.shared.sync.borrow_mut().refresh_link().unwrap_or(false);
        if online {
            let flushed = self.shared.sync.borrow_mut().flush_pending();
            if flushed.sent > 0 {
                info!("Replayed {} posts from the previous session", flushed.sent);
            }
        } else {
            self.renderer.show_message("Offline, using cached data")?;
        }

        self.load_catalog()?;
        self.next_link_poll = now + self.link_poll_interval_ms;

        let events = self
            .shared
            .screens
            .borrow_mut()
            .start(now, &self.shared.store.borrow());
        for event in events {
            self.bus.dispatch(event);
        }

        if let Err(e) = self.render() {
            warn!("{:#}", e);
        }
        Ok(())
    }

    fn load_catalog(&mut self) -> Result<()> {
        let fetched = self.shared.sync.borrow_mut().fetch_catalog();
        match fetched {
            Ok(snapshot) => {
                let stale = snapshot.stale;
                let provenance = snapshot.provenance;
                let count = snapshot.len();
                self.shared.store.borrow_mut().replace(snapshot);
                if stale {
                    self.renderer.show_message("Using cached data")?;
                }
                self.bus.dispatch(AppEvent::CatalogUpdated { provenance, count });
            }
            Err(e) if !e.is_recoverable() => {
                error!("Starting without a catalog: {}", e);
                self.renderer.show_message("Catalog unavailable")?;
            }
            Err(e) => warn!("Catalog load failed: {}", e),
        }
        Ok(())
    }

    /// Runs one iteration of the loop.
    ///
    /// # Arguments
    ///
    /// * `now` - Milliseconds on the kiosk's monotonic clock.
    /// * `sample` - Touch controller reading for this tick, if one was taken.
    pub fn tick(&mut self, now: u64, sample: Option<TouchSample>) -> Result<()> {
        self.shared.now.set(now);

        if let Some(sample) = sample {
            if let Some(intent) = self.gestures.sample(sample, now) {
                self.bus.dispatch(AppEvent::Intent { intent, at: now });
            }
        }

        let went_idle = self.shared.idle.borrow_mut().update(now);
        if let Some(transition) = went_idle {
            self.bus.dispatch(AppEvent::Idle {
                transition,
                at: now,
            });
        }

        let attract = self
            .shared
            .screens
            .borrow_mut()
            .update(now, &self.shared.store.borrow());
        for event in attract {
            self.bus.dispatch(event);
        }

        if now >= self.next_link_poll {
            self.next_link_poll = now + self.link_poll_interval_ms;
            let changed = self.shared.sync.borrow_mut().refresh_link();
            if let Some(online) = changed {
                self.bus.dispatch(AppEvent::ConnectivityChanged(online));
            }
            self.poll_status();
        }

        if let Err(e) = self.shared.leds.borrow_mut().update(now) {
            warn!("LED update failed: {:#}", e);
        }

        if let Err(e) = self.render() {
            warn!("{:#}", e);
        }
        Ok(())
    }

    fn poll_status(&mut self) {
        let mut sync = self.shared.sync.borrow_mut();
        if !sync.connectivity().online {
            return;
        }
        if let Err(e) = sync.check_status() {
            debug!("Status check failed: {}", e);
        }
    }

    fn render(&mut self) -> Result<()> {
        if !self.shared.screens.borrow_mut().take_redraw() {
            return Ok(());
        }
        let screen = self
            .shared
            .screens
            .borrow()
            .descriptor(&self.shared.store.borrow());
        self.renderer
            .show_screen(&screen)
            .context("Failed to render screen")
    }

    /// Runs the LED strip self test.
    pub fn self_test(&mut self) -> Result<Vec<Category>> {
        self.shared.leds.borrow_mut().self_test()
    }

    pub fn screen(&self) -> ScreenKind {
        self.shared.screens.borrow().kind()
    }

    pub fn screen_state(&self) -> crate::screens::ScreenState {
        self.shared.screens.borrow().state().clone()
    }

    pub fn is_idle(&self) -> bool {
        self.shared.idle.borrow().is_idle()
    }

    /// Category of the LED strip currently animating, if any.
    pub fn lit_category(&self) -> Option<Category> {
        self.shared.leds.borrow().active_category()
    }

    pub fn catalog_len(&self) -> usize {
        self.shared.store.borrow().len()
    }

    pub fn item_is_dirty(&self, item_id: crate::model::ItemId) -> Option<bool> {
        self.shared.store.borrow().get(item_id).map(|i| i.is_dirty)
    }

    pub fn connectivity(&self) -> Connectivity {
        self.shared.sync.borrow().connectivity().clone()
    }
}

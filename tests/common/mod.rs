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

//! In-memory stand-ins for the kiosk's hardware and network seams.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
    rc::Rc,
};

use anyhow::Result;
use sortkiosk::{
    app::{Kiosk, KioskSettings},
    error::{self, SyncError},
    input::{Calibration, TouchSample},
    led::{CHANNEL_COUNT, LedDriver, Rgb},
    screens::render::{Renderer, ScreenDescriptor},
    sync::{
        CatalogSyncService,
        api::CatalogApi,
        link::NetworkLink,
        wire::{ItemsResponse, PostResponse, StatusResponse},
    },
};

#[derive(Default)]
pub struct ApiState {
    /// Body returned by `GET /items`; `None` behaves like a timeout.
    pub items: Option<String>,
    pub posts: Vec<(String, String, bool)>,
    pub fail_posts: bool,
}

#[derive(Clone, Default)]
pub struct FakeApi(pub Rc<RefCell<ApiState>>);

impl FakeApi {
    pub fn serving(body: &str) -> Self {
        let api = FakeApi::default();
        api.0.borrow_mut().items = Some(body.into());
        api
    }

    pub fn posts(&self) -> Vec<(String, String, bool)> {
        self.0.borrow().posts.clone()
    }
}

impl CatalogApi for FakeApi {
    fn fetch_items(&self) -> error::Result<ItemsResponse> {
        match &self.0.borrow().items {
            Some(body) => Ok(serde_json::from_str(body)?),
            None => Err(SyncError::Network("operation timed out".into())),
        }
    }

    fn post_interaction(&self, location: &str, item: &str, dirty: bool) -> error::Result<PostResponse> {
        let mut state = self.0.borrow_mut();
        if state.fail_posts {
            return Err(SyncError::Network("connection reset".into()));
        }
        state.posts.push((location.into(), item.into(), dirty));
        Ok(PostResponse::default())
    }

    fn status(&self) -> error::Result<StatusResponse> {
        Ok(StatusResponse {
            database_online: true,
            pending_posts_count: 0,
        })
    }
}

#[derive(Clone)]
pub struct FakeLink(pub Rc<Cell<bool>>);

impl FakeLink {
    pub fn new(up: bool) -> Self {
        FakeLink(Rc::new(Cell::new(up)))
    }
}

impl NetworkLink for FakeLink {
    fn is_connected(&self) -> bool {
        self.0.get()
    }
}

pub type Frame = [Vec<Rgb>; CHANNEL_COUNT];

#[derive(Clone, Default)]
pub struct RecordingLeds {
    pending: Rc<RefCell<Frame>>,
    pub commits: Rc<RefCell<Vec<Frame>>>,
}

impl RecordingLeds {
    pub fn last_frame(&self) -> Option<Frame> {
        self.commits.borrow().last().cloned()
    }
}

impl LedDriver for RecordingLeds {
    fn set_channel_pixels(&mut self, channel: usize, colors: &[Rgb]) -> Result<()> {
        self.pending.borrow_mut()[channel] = colors.to_vec();
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let frame = self.pending.borrow().clone();
        self.commits.borrow_mut().push(frame);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub screens: Rc<RefCell<Vec<ScreenDescriptor>>>,
    pub messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingRenderer {
    pub fn last_screen(&self) -> Option<ScreenDescriptor> {
        self.screens.borrow().last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn show_screen(&mut self, screen: &ScreenDescriptor) -> Result<()> {
        self.screens.borrow_mut().push(screen.clone());
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        self.messages.borrow_mut().push(text.into());
        Ok(())
    }
}

/// A kiosk wired to fakes, with helpers that drive it through touches.
pub struct Harness {
    pub kiosk: Kiosk,
    pub api: FakeApi,
    pub link: FakeLink,
    pub leds: RecordingLeds,
    pub renderer: RecordingRenderer,
    pub now: u64,
}

impl Harness {
    pub fn new(api: FakeApi, link: FakeLink, storage_dir: Option<PathBuf>) -> Self {
        let leds = RecordingLeds::default();
        let renderer = RecordingRenderer::default();
        let sync =
            CatalogSyncService::new(Box::new(api.clone()), Box::new(link.clone()), storage_dir);
        let settings = KioskSettings {
            location: "hall".into(),
            ..KioskSettings::default()
        };
        let kiosk = Kiosk::new(
            settings,
            sync,
            Box::new(leds.clone()),
            Box::new(renderer.clone()),
        );
        Self {
            kiosk,
            api,
            link,
            leds,
            renderer,
            now: 0,
        }
    }

    pub fn boot(&mut self) {
        self.kiosk.boot(self.now).unwrap();
    }

    /// Runs ticks without input up to and including `until`.
    pub fn idle_until(&mut self, until: u64) {
        while self.now < until {
            self.now = (self.now + 500).min(until);
            self.kiosk.tick(self.now, None).unwrap();
        }
    }

    /// Presses and releases at a screen position, then waits out the
    /// debounce window.
    pub fn tap(&mut self, x: i32, y: i32) {
        let (raw_x, raw_y) = Calibration::default().raw_for(x, y);
        self.kiosk
            .tick(self.now, Some(TouchSample::down(raw_x, raw_y)))
            .unwrap();
        self.now += 30;
        self.kiosk
            .tick(self.now, Some(TouchSample::released()))
            .unwrap();
        self.now += 200;
        self.kiosk.tick(self.now, None).unwrap();
    }

    /// Drags horizontally across the middle of the screen.
    pub fn swipe(&mut self, from_x: i32, to_x: i32) {
        let calibration = Calibration::default();
        let (start_x, raw_y) = calibration.raw_for(from_x, 160);
        let (end_x, _) = calibration.raw_for(to_x, 160);
        self.kiosk
            .tick(self.now, Some(TouchSample::down(start_x, raw_y)))
            .unwrap();
        self.now += 40;
        self.kiosk
            .tick(self.now, Some(TouchSample::down(end_x, raw_y)))
            .unwrap();
        self.now += 20;
        self.kiosk
            .tick(self.now, Some(TouchSample::released()))
            .unwrap();
        self.now += 200;
        self.kiosk.tick(self.now, None).unwrap();
    }
}

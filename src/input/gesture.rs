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

//! Gesture recognition.
//!
//! A contact is tracked from the first plausible touched sample. While it is
//! held, a fast mostly-horizontal movement is reported as a swipe straight
//! away. A contact released quickly without having swiped is a tap at the
//! position where it started.

use log::debug;

use crate::input::{Calibration, Intent, TouchSample};

pub const DEBOUNCE_MS: u64 = 150;
pub const SWIPE_MIN_DISTANCE: i32 = 50;
pub const GESTURE_WINDOW_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Idle,
    Tracking { x: i32, y: i32, started_at: u64 },
}

pub struct GestureRecognizer {
    calibration: Calibration,
    contact: Contact,
    was_touched: bool,
    last_dispatch_at: Option<u64>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

impl GestureRecognizer {
    pub fn new(calibration: Calibration) -> Self {
        Self {
            calibration,
            contact: Contact::Idle,
            was_touched: false,
            last_dispatch_at: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.contact, Contact::Tracking { .. })
    }

    /// Feeds one controller sample taken at `now` (milliseconds).
    ///
    /// Returns the intent recognised by this sample, if any. Touched samples
    /// with implausible raw readings are ignored entirely.
    pub fn sample(&mut self, sample: TouchSample, now: u64) -> Option<Intent> {
        if sample.touched && !sample.is_plausible() {
            return None;
        }

        let intent = if sample.touched {
            let (x, y) = self.calibration.map(sample.raw_x, sample.raw_y);
            if !self.was_touched {
                debug!("Touch start at {},{}", x, y);
                self.contact = Contact::Tracking {
                    x,
                    y,
                    started_at: now,
                };
            }
            self.check_swipe(x, y, now)
        } else if self.was_touched {
            self.check_tap(now)
        } else {
            None
        };

        self.was_touched = sample.touched;
        intent
    }

    fn check_swipe(&mut self, x: i32, y: i32, now: u64) -> Option<Intent> {
        let Contact::Tracking {
            x: start_x,
            y: start_y,
            started_at,
        } = self.contact
        else {
            return None;
        };

        let dx = x - start_x;
        let dy = y - start_y;
        let elapsed = now.saturating_sub(started_at);

        if elapsed < GESTURE_WINDOW_MS && dx.abs() > SWIPE_MIN_DISTANCE && dx.abs() > dy.abs() * 2
        {
            self.contact = Contact::Idle;
            self.last_dispatch_at = Some(now);

            let intent = if dx < 0 {
                Intent::SwipeLeft
            } else {
                Intent::SwipeRight
            };
            debug!("{:?} detected, dx={}", intent, dx);
            return Some(intent);
        }

        None
    }

    fn check_tap(&mut self, now: u64) -> Option<Intent> {
        let Contact::Tracking { x, y, started_at } = self.contact else {
            return None;
        };
        self.contact = Contact::Idle;

        let elapsed = now.saturating_sub(started_at);
        let debounced = self
            .last_dispatch_at
            .is_some_and(|last| now.saturating_sub(last) < DEBOUNCE_MS);

        if elapsed < GESTURE_WINDOW_MS && !debounced {
            self.last_dispatch_at = Some(now);
            debug!("Tap at {},{}", x, y);
            return Some(Intent::Tap { x, y });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> TouchSample {
        let (rx, ry) = Calibration::default().raw_for(x, y);
        TouchSample::down(rx, ry)
    }

    #[test]
    fn quick_press_and_release_is_a_tap_at_the_start_point() {
        let mut g = GestureRecognizer::default();
        assert_eq!(g.sample(at(60, 100), 1000), None);
        assert_eq!(g.sample(at(62, 104), 1050), None);
        assert_eq!(
            g.sample(TouchSample::released(), 1100),
            Some(Intent::Tap { x: 60, y: 100 })
        );
        assert!(!g.is_tracking());
    }

    #[test]
    fn long_press_is_not_a_tap() {
        let mut g = GestureRecognizer::default();
        g.sample(at(60, 100), 1000);
        assert_eq!(g.sample(TouchSample::released(), 1500), None);
    }

    #[test]
    fn horizontal_movement_is_a_swipe_once() {
        let mut g = GestureRecognizer::default();
        g.sample(at(180, 150), 0);
        assert_eq!(g.sample(at(120, 160), 100), Some(Intent::SwipeLeft));
        assert_eq!(g.sample(at(60, 160), 150), None);
        assert_eq!(g.sample(TouchSample::released(), 200), None);

        g.sample(at(40, 150), 1000);
        assert_eq!(g.sample(at(100, 150), 1100), Some(Intent::SwipeRight));
    }

    #[test]
    fn steep_or_short_movement_is_not_a_swipe() {
        let mut g = GestureRecognizer::default();
        g.sample(at(100, 100), 0);
        // 60 across but 40 down is not horizontal enough
        assert_eq!(g.sample(at(160, 140), 100), None);
        // only 40 across
        assert_eq!(g.sample(at(140, 100), 120), None);
    }

    #[test]
    fn no_swipe_after_the_window() {
        let mut g = GestureRecognizer::default();
        g.sample(at(200, 150), 0);
        assert_eq!(g.sample(at(200, 150), 400), None);
        assert_eq!(g.sample(at(40, 150), 500), None);
        assert_eq!(g.sample(TouchSample::released(), 600), None);
    }

    #[test]
    fn taps_closer_than_the_debounce_are_dropped() {
        let mut g = GestureRecognizer::default();
        g.sample(at(50, 50), 0);
        assert!(g.sample(TouchSample::released(), 40).is_some());

        g.sample(at(50, 50), 80);
        assert_eq!(g.sample(TouchSample::released(), 150), None);

        g.sample(at(50, 50), 200);
        assert!(g.sample(TouchSample::released(), 260).is_some());
    }

    #[test]
    fn implausible_samples_change_nothing() {
        let mut g = GestureRecognizer::default();
        assert_eq!(g.sample(TouchSample::down(20, 2000), 0), None);
        assert!(!g.is_tracking());

        g.sample(at(50, 50), 10);
        assert_eq!(g.sample(TouchSample::down(5000, 5000), 20), None);
        assert!(g.is_tracking());
        assert_eq!(
            g.sample(TouchSample::released(), 30),
            Some(Intent::Tap { x: 50, y: 50 })
        );
    }
}

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

//! LED feedback.
//!
//! The kiosk has one addressable strip per waste category. The
//! [`LedFeedbackEngine`] owns one animation slot per strip; starting a new
//! animation overwrites whatever was playing, and only the strip of the most
//! recently started animation is lit.

pub mod animation;
pub mod color;

pub use animation::{Animation, AnimationKind};
pub use color::Rgb;

use anyhow::Result;
use log::{debug, info};

use crate::model::Category;

pub const CHANNEL_COUNT: usize = 4;

/// Hardware seam for the LED strips.
///
/// Pixel data written with [`LedDriver::set_channel_pixels`] is only shown on
/// the next [`LedDriver::commit`].
pub trait LedDriver {
    fn set_channel_pixels(&mut self, channel: usize, colors: &[Rgb]) -> Result<()>;

    fn commit(&mut self) -> Result<()>;
}

pub struct LedFeedbackEngine {
    driver: Box<dyn LedDriver>,
    leds_per_strip: usize,
    channels: [Option<Animation>; CHANNEL_COUNT],
    frame: [Vec<Rgb>; CHANNEL_COUNT],
}

impl LedFeedbackEngine {
    pub fn new(driver: Box<dyn LedDriver>, leds_per_strip: usize) -> Self {
        Self {
            driver,
            leds_per_strip,
            channels: Default::default(),
            frame: std::array::from_fn(|_| vec![Rgb::BLACK; leds_per_strip]),
        }
    }

    /// Plays an animation on the strip of `category`, silencing every other
    /// strip.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to blank the strips.
    pub fn start_animation_for_category(
        &mut self,
        category: Category,
        kind: AnimationKind,
        color: Rgb,
        duration_ms: u64,
        now: u64,
    ) -> Result<()> {
        debug!("Starting {:?} on the {} strip", kind, category.as_str());

        self.channels = Default::default();
        self.channels[category.channel()] = Some(Animation {
            kind,
            color,
            duration_ms,
            started_at: now,
            category,
        });
        self.all_off()
    }

    /// Lights one strip with a steady colour and no animation.
    pub fn show_static(&mut self, category: Category, color: Rgb) -> Result<()> {
        self.channels = Default::default();
        for (channel, pixels) in self.frame.iter_mut().enumerate() {
            let fill = if channel == category.channel() {
                color
            } else {
                Rgb::BLACK
            };
            pixels.fill(fill);
        }
        self.flush()
    }

    /// Stops any animation and blanks every strip.
    pub fn stop(&mut self) -> Result<()> {
        self.channels = Default::default();
        self.all_off()
    }

    /// Blanks every strip. A running animation lights up again on the next
    /// [`LedFeedbackEngine::update`].
    pub fn all_off(&mut self) -> Result<()> {
        for pixels in &mut self.frame {
            pixels.fill(Rgb::BLACK);
        }
        self.flush()
    }

    /// Renders the running animation for time `now`. Does nothing when no
    /// animation is running.
    pub fn update(&mut self, now: u64) -> Result<()> {
        if !self.is_animating() {
            return Ok(());
        }

        for (slot, pixels) in self.channels.iter().zip(self.frame.iter_mut()) {
            match slot {
                Some(animation) => *pixels = animation.render(now, self.leds_per_strip),
                None => pixels.fill(Rgb::BLACK),
            }
        }
        self.flush()
    }

    pub fn is_animating(&self) -> bool {
        self.channels.iter().any(Option::is_some)
    }

    pub fn active_category(&self) -> Option<Category> {
        self.channels.iter().flatten().map(|a| a.category).next()
    }

    pub fn animation(&self, category: Category) -> Option<&Animation> {
        self.channels[category.channel()].as_ref()
    }

    /// The pixels last written for a channel.
    pub fn channel_pixels(&self, channel: usize) -> &[Rgb] {
        self.frame.get(channel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lights each strip in turn with its test colour, then blanks it.
    ///
    /// Returns the categories in the order they were tested.
    pub fn self_test(&mut self) -> Result<Vec<Category>> {
        info!("Testing all LED strips");
        self.channels = Default::default();

        let mut tested = Vec::with_capacity(CHANNEL_COUNT);
        for category in Category::ALL {
            let color = match category {
                Category::Plastic => Rgb::ORANGE,
                Category::Paper => Rgb::BLUE,
                Category::Green => Rgb::GREEN,
                Category::Waste => Rgb::WHITE.scale(128),
            };
            self.show_static(category, color)?;
            tested.push(category);
        }
        self.all_off()?;

        info!("LED strip test complete");
        Ok(tested)
    }

    fn flush(&mut self) -> Result<()> {
        for (channel, pixels) in self.frame.iter().enumerate() {
            self.driver.set_channel_pixels(channel, pixels)?;
        }
        self.driver.commit()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    /// Records every committed frame.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingDriver {
        pending: Rc<RefCell<[Vec<Rgb>; CHANNEL_COUNT]>>,
        pub(crate) commits: Rc<RefCell<Vec<[Vec<Rgb>; CHANNEL_COUNT]>>>,
    }

    impl LedDriver for RecordingDriver {
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

    fn lit_channels(engine: &LedFeedbackEngine) -> Vec<usize> {
        (0..CHANNEL_COUNT)
            .filter(|c| engine.channel_pixels(*c).iter().any(|p| *p != Rgb::BLACK))
            .collect()
    }

    #[test]
    fn only_the_started_channel_renders() {
        let mut engine = LedFeedbackEngine::new(Box::new(RecordingDriver::default()), 8);
        engine
            .start_animation_for_category(Category::Paper, AnimationKind::Solid, Rgb::BLUE, 2000, 0)
            .unwrap();
        engine.update(10).unwrap();
        assert_eq!(lit_channels(&engine), vec![1]);

        engine
            .start_animation_for_category(Category::Waste, AnimationKind::Solid, Rgb::WHITE, 2000, 20)
            .unwrap();
        engine.update(30).unwrap();
        assert_eq!(lit_channels(&engine), vec![3]);
        assert_eq!(engine.active_category(), Some(Category::Waste));
        assert!(engine.animation(Category::Paper).is_none());
    }

    #[test]
    fn stop_is_idempotent_and_blanks_everything() {
        let driver = RecordingDriver::default();
        let mut engine = LedFeedbackEngine::new(Box::new(driver.clone()), 4);
        engine
            .start_animation_for_category(Category::Green, AnimationKind::Breathing, Rgb::GREEN, 2000, 0)
            .unwrap();
        engine.update(500).unwrap();

        engine.stop().unwrap();
        engine.stop().unwrap();
        assert!(!engine.is_animating());
        assert!(lit_channels(&engine).is_empty());

        let commits = driver.commits.borrow();
        let last = commits.last().unwrap();
        assert!(last.iter().flatten().all(|p| *p == Rgb::BLACK));
    }

    #[test]
    fn update_without_animation_writes_nothing() {
        let driver = RecordingDriver::default();
        let mut engine = LedFeedbackEngine::new(Box::new(driver.clone()), 4);
        engine.update(100).unwrap();
        assert!(driver.commits.borrow().is_empty());
    }

    #[test]
    fn all_off_keeps_the_animation_running() {
        let mut engine = LedFeedbackEngine::new(Box::new(RecordingDriver::default()), 4);
        engine
            .start_animation_for_category(Category::Plastic, AnimationKind::Solid, Rgb::ORANGE, 1000, 0)
            .unwrap();
        engine.update(1).unwrap();
        engine.all_off().unwrap();
        assert!(lit_channels(&engine).is_empty());
        assert!(engine.is_animating());
        engine.update(2).unwrap();
        assert_eq!(lit_channels(&engine), vec![0]);
    }

    #[test]
    fn show_static_lights_one_strip() {
        let mut engine = LedFeedbackEngine::new(Box::new(RecordingDriver::default()), 4);
        engine.show_static(Category::Green, Rgb::GREEN).unwrap();
        assert_eq!(lit_channels(&engine), vec![2]);
        assert!(!engine.is_animating());
    }

    #[test]
    fn self_test_visits_each_strip_in_order() {
        let driver = RecordingDriver::default();
        let mut engine = LedFeedbackEngine::new(Box::new(driver.clone()), 2);
        assert_eq!(engine.self_test().unwrap(), Category::ALL.to_vec());

        let commits = driver.commits.borrow();
        assert_eq!(commits.len(), 5);
        for (step, frame) in commits.iter().take(4).enumerate() {
            let lit: Vec<usize> = (0..CHANNEL_COUNT)
                .filter(|c| frame[*c].iter().any(|p| *p != Rgb::BLACK))
                .collect();
            assert_eq!(lit, vec![step]);
        }
        assert!(lit_channels(&engine).is_empty());
    }
}

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

//! Inactivity tracking.

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTransition {
    /// No activity for longer than the timeout.
    Entered,
    /// Activity after a period of idleness.
    Resumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    Active,
    Idle,
}

pub struct IdleMonitor {
    timeout_ms: u64,
    last_activity: u64,
    state: Activity,
}

impl IdleMonitor {
    pub fn new(timeout_ms: u64, now: u64) -> Self {
        Self {
            timeout_ms,
            last_activity: now,
            state: Activity::Active,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == Activity::Idle
    }

    pub fn last_activity(&self) -> u64 {
        self.last_activity
    }

    /// Restarts the timer from `now` without emitting a transition.
    pub fn reset(&mut self, now: u64) {
        self.last_activity = now;
        self.state = Activity::Active;
    }

    /// Resets the inactivity timer. Returns [`IdleTransition::Resumed`] if the
    /// monitor was idle.
    pub fn record_activity(&mut self, now: u64) -> Option<IdleTransition> {
        self.last_activity = now;
        match self.state {
            Activity::Idle => {
                info!("Activity resumed");
                self.state = Activity::Active;
                Some(IdleTransition::Resumed)
            }
            Activity::Active => None,
        }
    }

    /// Returns [`IdleTransition::Entered`] exactly once when the timeout
    /// elapses without activity.
    pub fn update(&mut self, now: u64) -> Option<IdleTransition> {
        if self.state == Activity::Active && now.saturating_sub(self.last_activity) > self.timeout_ms
        {
            info!("No activity for {} ms, going idle", self.timeout_ms);
            self.state = Activity::Idle;
            return Some(IdleTransition::Entered);
        }
        None
    }
}

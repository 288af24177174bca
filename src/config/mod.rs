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

//! Application configuration.
//!
//! This module manages the kiosk configuration file: where the catalog service
//! lives, where local caches are kept, and the timings that drive the loop.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "sortkiosk";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,

    pub api_host: String,
    pub api_port: u16,
    pub api_timeout_ms: u64,
    pub status_timeout_ms: u64,

    /// Name of the physical location, sent with every interaction.
    pub location: String,

    /// Directory for the catalog cache and pending queue files. When unset,
    /// the directory holding the configuration file is used.
    pub storage_dir: Option<PathBuf>,

    /// Optional catalog shipped with the device, used when no cache exists.
    pub seed_catalog: Option<PathBuf>,

    pub idle_timeout_ms: u64,
    pub attract_interval_ms: u64,
    pub feedback_cycle_ms: u64,
    pub tick_interval_ms: u64,
    pub link_poll_interval_ms: u64,

    pub leds_per_strip: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api_host: "127.0.0.1".into(),
            api_port: 5000,
            api_timeout_ms: 5000,
            status_timeout_ms: 3000,
            location: "kiosk".into(),
            storage_dir: None,
            seed_catalog: None,
            idle_timeout_ms: 10_000,
            attract_interval_ms: 5000,
            feedback_cycle_ms: 2000,
            tick_interval_ms: 16,
            link_poll_interval_ms: 30_000,
            leds_per_strip: 8,
        }
    }
}

impl AppConfig {
    pub fn api_base_url(&self) -> String {
        format!("http://{}:{}", self.api_host, self.api_port)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_timings() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.idle_timeout_ms, 10_000);
        assert_eq!(cfg.attract_interval_ms, 5000);
        assert_eq!(cfg.api_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.status_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.leds_per_strip, 8);
    }

    #[test]
    fn base_url_uses_host_and_port() {
        let cfg = AppConfig {
            api_host: "10.0.0.7".into(),
            api_port: 8080,
            ..AppConfig::default()
        };
        assert_eq!(cfg.api_base_url(), "http://10.0.0.7:8080");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"location":"hall"}"#).unwrap();
        assert_eq!(cfg.location, "hall");
        assert_eq!(cfg.api_port, 5000);
        assert!(cfg.storage_dir.is_none());
    }
}

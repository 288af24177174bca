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

//! # Sort kiosk.
//!
//! Runs the kiosk control loop on a development host. The screen and LED
//! strips are replaced by log output, and touches are read from standard
//! input, one sample per line:
//!
//! ```text
//! down 1200 1800    contact at a raw controller reading
//! move 2000 1800    contact moved
//! up                contact released
//! tap 60 100        tap at a screen position
//! ```
//!
//! Catalog data comes from the configured API, falling back to the local
//! cache and the built-in items when it cannot be reached.

use anyhow::{Context, Result};
use log::{info, warn};
use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread,
    time::Instant,
};

use sortkiosk::{
    app::{Kiosk, KioskSettings},
    config::{self, AppConfig},
    host::{LogLedDriver, LogRenderer},
    input::{Calibration, TouchSample},
    sync::{CatalogSyncService, api::HttpCatalogApi, link::TcpProbeLink},
};

/// The entry point of the application.
///
/// Loads the configuration, builds the kiosk from it and runs the loop until
/// standard input is closed.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load_config();

    let calibration = Calibration::default();
    let mut kiosk = build_kiosk(&config)
        .context("Failed to initialise kiosk")?
        .with_calibration(calibration);

    let (touch_tx, touch_rx) = mpsc::channel();
    spawn_touch_reader(touch_tx, calibration);

    run(&mut kiosk, &config, touch_rx).context("Kiosk loop failed")
}

fn build_kiosk(config: &AppConfig) -> Result<Kiosk> {
    let api = HttpCatalogApi::new(
        &config.api_base_url(),
        config.api_timeout(),
        config.status_timeout(),
    )
    .context("Failed to create HTTP client")?;
    let link = TcpProbeLink::new(&config.api_host, config.api_port, config.status_timeout());

    let storage_dir = config.storage_dir.clone().or_else(default_storage_dir);
    info!("Storing catalog cache in {:?}", storage_dir);

    let sync = CatalogSyncService::new(Box::new(api), Box::new(link), storage_dir)
        .with_seed_catalog(config.seed_catalog.clone());

    Ok(Kiosk::new(
        KioskSettings::from(config),
        sync,
        Box::new(LogLedDriver::default()),
        Box::new(LogRenderer),
    ))
}

/// Directory holding the configuration file.
fn default_storage_dir() -> Option<PathBuf> {
    confy::get_configuration_file_path("sortkiosk", None)
        .ok()
        .and_then(|path| path.parent().map(PathBuf::from))
}

/// Reads touch samples from standard input on a helper thread.
///
/// The thread ends when standard input closes, which disconnects the channel.
fn spawn_touch_reader(tx: Sender<TouchSample>, calibration: Calibration) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_touch(&line, &calibration) {
                Some(samples) => {
                    for sample in samples {
                        if tx.send(sample).is_err() {
                            return;
                        }
                    }
                }
                None if line.trim().is_empty() => {}
                None => warn!("Unrecognised touch input '{}'", line.trim()),
            }
        }
    });
}

fn parse_touch(line: &str, calibration: &Calibration) -> Option<Vec<TouchSample>> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let mut coords = || -> Option<(i32, i32)> {
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        Some((x, y))
    };

    match command {
        "down" | "move" => {
            let (x, y) = coords()?;
            Some(vec![TouchSample::down(x, y)])
        }
        "up" => Some(vec![TouchSample::released()]),
        "tap" => {
            let (x, y) = coords()?;
            let (raw_x, raw_y) = calibration.raw_for(x, y);
            Some(vec![TouchSample::down(raw_x, raw_y), TouchSample::released()])
        }
        _ => None,
    }
}

/// Runs the fixed-rate loop, feeding at most one touch sample per tick.
fn run(kiosk: &mut Kiosk, config: &AppConfig, touch_rx: Receiver<TouchSample>) -> Result<()> {
    let started = Instant::now();
    let now = || started.elapsed().as_millis() as u64;

    let tested = kiosk.self_test().context("LED self test failed")?;
    info!("Tested {} LED strips", tested.len());

    kiosk.boot(now())?;

    let mut input_open = true;
    loop {
        let sample = if input_open {
            match touch_rx.try_recv() {
                Ok(sample) => Some(sample),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    info!("Touch input closed");
                    input_open = false;
                    None
                }
            }
        } else {
            None
        };

        kiosk.tick(now(), sample)?;

        if !input_open {
            return Ok(());
        }
        thread::sleep(config.tick_interval());
    }
}

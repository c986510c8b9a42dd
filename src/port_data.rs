/*
 *  port_data.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Record providers: time-of-day port activity model plus the live
 *  weather reading when one is available
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use chrono::{Local, Timelike};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;

use crate::record::{DataSource, DisplayRecord};
use crate::weather::WeatherReading;

/// Source of display records. Called once per view advance.
pub trait DataProvider {
    fn fetch(&mut self) -> DisplayRecord;
}

impl<F> DataProvider for F
where
    F: FnMut() -> DisplayRecord,
{
    fn fetch(&mut self) -> DisplayRecord {
        self()
    }
}

pub const SHIP_NAMES: &[&str] = &[
    "MSC GULSUN", "MAERSK MC-KINNEY", "CMA CGM JACQUES", "EVER GIVEN",
    "ONE APUS", "COSCO SHIPPING LEO", "MSC ZOE", "OOCL GERMANY",
    "HMM ALGECIRAS", "NYK VEGA", "MOL TRIUMPH", "APL CHONGQING",
    "HYUNDAI BUSAN", "SITC SHENZHEN", "WAN HAI 501", "TS SINGAPORE",
    "MARIANNA", "ALEXANDRA", "CONTAINER SHIP", "BULK CARRIER",
    "TANKER VESSEL", "CAR CARRIER", "REEFER SHIP", "LNG CARRIER",
];

pub const DESTINATIONS: &[&str] = &[
    "SHANGHAI", "SINGAPORE", "HAMBURG", "ANTWERP", "FELIXSTOWE",
    "ROTTERDAM", "BREMERHAVEN", "LE HAVRE", "VALENCIA", "GENOA",
    "NEW YORK", "LOS ANGELES", "LONG BEACH", "HOUSTON", "MIAMI",
];

pub const TERMINALS: &[&str] = &[
    "MAASVLAKTE", "EUROPOORT", "BOTLEK", "WAALHAVEN", "AMSTERDAM", "VLAARDINGEN",
];

const FOCUS_STATUSES: &[&str] = &["MOORED", "INBOUND", "OUTBOUND", "ANCHORED"];

/// Shown when no live reading has arrived
pub const FALLBACK_WEATHER: &str = "Cloudy 15°C";
pub const FALLBACK_WIND: &str = "18 km/h";

/// Simulated Rotterdam traffic, busier between 06:00 and 20:00.
///
/// Weather comes from the polling task's channel when one is attached; a
/// record carrying a live reading is marked [`DataSource::Real`].
pub struct PortDataProvider<R = StdRng> {
    rng: R,
    weather: Option<watch::Receiver<Option<WeatherReading>>>,
}

impl PortDataProvider<StdRng> {
    pub fn new(weather: Option<watch::Receiver<Option<WeatherReading>>>) -> Self {
        Self::with_rng(StdRng::from_os_rng(), weather)
    }
}

impl<R: Rng> PortDataProvider<R> {
    pub fn with_rng(rng: R, weather: Option<watch::Receiver<Option<WeatherReading>>>) -> Self {
        Self { rng, weather }
    }

    /// Latest live reading, if any
    pub fn live_weather(&self) -> Option<WeatherReading> {
        self.weather.as_ref().and_then(|rx| rx.borrow().clone())
    }

    /// Build a record for local hour `hour`, stamped with `timestamp`.
    pub fn generate_at(&mut self, hour: u32, timestamp: String) -> DisplayRecord {
        let business_hours = (6..20).contains(&hour);
        let (total_ships, multiplier) = if business_hours {
            (self.rng.random_range(140..=200u32), 1.2)
        } else {
            (self.rng.random_range(80..=130u32), 0.8)
        };

        let inbound = scaled(self.rng.random_range(8..=25u32), multiplier);
        let outbound = scaled(self.rng.random_range(6..=20u32), multiplier);
        let anchored = self.rng.random_range(5..=15u32);
        let moored = total_ships
            .saturating_sub(inbound)
            .saturating_sub(outbound)
            .saturating_sub(anchored);

        let activity_level = if multiplier > 1.0 {
            "HIGH"
        } else if hour >= 6 {
            "NORMAL"
        } else {
            "LOW"
        };
        let port_status = if total_ships > 160 {
            "BUSY"
        } else if total_ships > 120 {
            "NORMAL"
        } else {
            "QUIET"
        };

        let live = self.live_weather();
        let data_source = if live.is_some() { DataSource::Real } else { DataSource::Simulation };
        let (weather, wind) = match &live {
            Some(reading) => (reading.summary(), reading.wind()),
            None => (FALLBACK_WEATHER.to_string(), FALLBACK_WIND.to_string()),
        };

        let focus_eta = format!(
            "{}:{:02}",
            self.rng.random_range(10..=23u32),
            self.rng.random_range(10..=59u32)
        );

        let record = DisplayRecord {
            total_ships,
            inbound: inbound.max(1),
            outbound: outbound.max(1),
            anchored,
            moored,
            weather: Some(weather),
            wind: Some(wind),
            largest_ship: self.pick(SHIP_NAMES),
            largest_dwt: self.rng.random_range(180_000..=235_000u32),
            focus_ship: self.pick(SHIP_NAMES),
            focus_destination: self.pick(DESTINATIONS),
            focus_status: self.pick(FOCUS_STATUSES),
            focus_eta: Some(focus_eta),
            terminal: self.pick(TERMINALS),
            port_status: port_status.to_string(),
            activity_level: activity_level.to_string(),
            data_source,
            timestamp,
        };
        debug!("generated record: {:?}", record);
        record
    }

    fn pick(&mut self, list: &[&str]) -> Option<String> {
        list.choose(&mut self.rng).map(|s| s.to_string())
    }
}

impl<R: Rng> DataProvider for PortDataProvider<R> {
    fn fetch(&mut self) -> DisplayRecord {
        let now = Local::now();
        self.generate_at(now.hour(), now.format("%H:%M").to_string())
    }
}

fn scaled(count: u32, multiplier: f64) -> u32 {
    (f64::from(count) * multiplier).floor() as u32
}

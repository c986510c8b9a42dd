/*
 *  weather.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Current conditions from Open-Meteo, polled in the background and
 *  published on a watch channel
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

use log::{info, warn};
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,weather_code,wind_speed_10m";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing weather data: {0}")]
    MissingData(String),
}

/// One set of current conditions
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub condition: String,
    pub temperature_c: f64,
    pub wind_kmh: f64,
}

impl WeatherReading {
    /// `"Overcast 12.5°C"`
    pub fn summary(&self) -> String {
        format!("{} {}°C", self.condition, self.temperature_c)
    }

    /// `"18.4 km/h"`
    pub fn wind(&self) -> String {
        format!("{} km/h", self.wind_kmh)
    }
}

#[derive(Debug, Deserialize)]
struct Forecast {
    current: Option<Current>,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: Option<f64>,
    weather_code: Option<i64>,
    wind_speed_10m: Option<f64>,
}

/// WMO weather code to a short label that fits beside a temperature
pub fn describe_code(code: i64) -> &'static str {
    match code {
        0 => "Clear",
        1 => "MainlyClear",
        2 => "PartlyCldy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 => "Drizzle",
        61 => "Rain",
        80 => "Showers",
        95 => "Thunderstorm",
        _ => "Unknown",
    }
}

/// Pull the current block out of an Open-Meteo forecast response
pub fn parse_forecast(body: &str) -> Result<WeatherReading, WeatherError> {
    let forecast: Forecast = serde_json::from_str(body)?;
    let current = forecast
        .current
        .ok_or_else(|| WeatherError::MissingData("current".into()))?;

    let temperature_c = current
        .temperature_2m
        .ok_or_else(|| WeatherError::MissingData("current.temperature_2m".into()))?;
    let wind_kmh = current
        .wind_speed_10m
        .ok_or_else(|| WeatherError::MissingData("current.wind_speed_10m".into()))?;
    // a missing code still leaves a usable reading
    let condition = current.weather_code.map_or("Unknown", describe_code);

    Ok(WeatherReading {
        condition: condition.to_string(),
        temperature_c,
        wind_kmh,
    })
}

/// Open-Meteo client for one location
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    client: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl OpenMeteo {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));
        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Connection", header::HeaderValue::from_static("close"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .default_headers(headers)
            .timeout(Duration::from_secs(8))
            .build()?;

        Ok(Self {
            client,
            base_url: OPEN_METEO_URL.to_string(),
            latitude,
            longitude,
        })
    }

    /// Point at another endpoint (a local stub in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn fetch_current(&self) -> Result<WeatherReading, WeatherError> {
        let params = [
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
        ];
        let body = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()? // none 2xx raise
            .text()
            .await?;
        parse_forecast(&body)
    }

    /// Poll every `interval`, starting now.
    ///
    /// The channel holds the latest good reading, or `None` until the first
    /// success. A failed poll leaves it untouched. The task ends once every
    /// receiver is gone.
    pub fn start_polling(
        self,
        interval: Duration,
    ) -> (JoinHandle<()>, watch::Receiver<Option<WeatherReading>>) {
        let (weather_tx, weather_rx) = watch::channel(None);

        let poll_handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match self.fetch_current().await {
                            Ok(reading) => {
                                info!("Weather polling successful: {}, wind {}", reading.summary(), reading.wind());
                                weather_tx.send_replace(Some(reading));
                            }
                            Err(e) => warn!("Weather polling failed: {}", e),
                        }
                    }
                    _ = weather_tx.closed() => {
                        info!("Weather polling has no listeners. Exiting.");
                        break;
                    }
                }
            }
        });

        (poll_handle, weather_rx)
    }
}

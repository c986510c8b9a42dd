/*
 *  record.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Snapshot of port data consumed by one render pass
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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a record's live-looking values came from.
///
/// Serializes as `"REAL"` or `"SIMULATION"`; any other label reads back as
/// [`DataSource::Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    Real,
    #[default]
    Simulation,
}

impl DataSource {
    /// Parse a provider label. Only `"REAL"` counts as live.
    pub fn from_label(label: &str) -> Self {
        if label == "REAL" {
            DataSource::Real
        } else {
            DataSource::Simulation
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Real => "REAL",
            DataSource::Simulation => "SIMULATION",
        }
    }

    /// Single glyph shown in the top-right cell
    pub fn indicator(&self) -> char {
        match self {
            DataSource::Real => 'R',
            DataSource::Simulation => 'S',
        }
    }
}

impl From<String> for DataSource {
    fn from(label: String) -> Self {
        DataSource::from_label(&label)
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.label().to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One refresh worth of port data.
///
/// Replaced wholesale on every refresh, never patched in place. Text fields a
/// provider could not fill are `None` and render as a blank line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayRecord {
    pub total_ships: u32,
    pub inbound: u32,
    pub outbound: u32,
    pub anchored: u32,
    pub moored: u32,
    pub weather: Option<String>,
    pub wind: Option<String>,
    pub largest_ship: Option<String>,
    pub largest_dwt: u32,
    pub focus_ship: Option<String>,
    pub focus_destination: Option<String>,
    pub focus_status: Option<String>,
    pub focus_eta: Option<String>,
    pub terminal: Option<String>,
    pub port_status: String,
    pub activity_level: String,
    pub data_source: DataSource,
    /// Local wall clock `HH:MM` at fetch time
    pub timestamp: String,
}

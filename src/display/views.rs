/*
 *  display/views.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  The fixed view rotation and what each view shows
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

use arrayvec::ArrayVec;
use std::fmt;

use crate::record::DisplayRecord;

/// Views in rotation order
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Overview,    // Ship count
    Traffic,     // Inbound / outbound
    Weather,     // Current conditions
    LargestShip, // Biggest vessel in port
    FocusShip,   // Vessel name, then its destination
    Terminal,    // Terminal of interest
    PortStatus,  // Busy-ness and activity
}

/// The most screens a single view occupies
pub const MAX_SCREENS: usize = 2;

/// One physical screen: a title on row 0, a message on row 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: &'static str,
    pub message: String,
    /// Overrides the renderer's default dwell
    pub dwell_ms: Option<u32>,
}

impl Screen {
    fn new(title: &'static str, message: String) -> Self {
        Self { title, message, dwell_ms: None }
    }

    fn with_dwell(mut self, dwell_ms: u32) -> Self {
        self.dwell_ms = Some(dwell_ms);
        self
    }
}

/// Focus screens hold for less than the default dwell
pub const FOCUS_DWELL_MS: u32 = 2000;

impl View {
    pub const ALL: [View; 7] = [
        View::Overview,
        View::Traffic,
        View::Weather,
        View::LargestShip,
        View::FocusShip,
        View::Terminal,
        View::PortStatus,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// View at `index`, wrapping
    pub fn from_index(index: usize) -> View {
        Self::ALL[index % Self::COUNT]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> View {
        Self::from_index(self.index() + 1)
    }

    /// Row 0 text of the view's first screen
    pub fn title(self) -> &'static str {
        match self {
            View::Overview => "ROTTERDAM PORT",
            View::Traffic => "TRAFFIC FLOW",
            View::Weather => "LIVE WEATHER",
            View::LargestShip => "LARGEST VESSEL",
            View::FocusShip => "FOCUS VESSEL",
            View::Terminal => "TERMINAL INFO",
            View::PortStatus => "PORT STATUS",
        }
    }

    /// Pull this view's text out of `record`.
    ///
    /// Every view is one screen except FocusShip, which is the vessel and
    /// then where it is headed.
    pub fn screens(self, record: &DisplayRecord) -> ArrayVec<Screen, MAX_SCREENS> {
        let mut screens = ArrayVec::new();
        match self {
            View::Overview => {
                screens.push(Screen::new(self.title(), format!("Ships: {}", record.total_ships)));
            }
            View::Traffic => {
                screens.push(Screen::new(
                    self.title(),
                    format!("IN:{} OUT:{}", record.inbound, record.outbound),
                ));
            }
            View::Weather => {
                screens.push(Screen::new(self.title(), text(&record.weather)));
            }
            View::LargestShip => {
                screens.push(Screen::new(self.title(), text(&record.largest_ship)));
            }
            View::FocusShip => {
                screens.push(
                    Screen::new(self.title(), text(&record.focus_ship)).with_dwell(FOCUS_DWELL_MS),
                );
                screens.push(
                    Screen::new("DESTINATION", text(&record.focus_destination))
                        .with_dwell(FOCUS_DWELL_MS),
                );
            }
            View::Terminal => {
                screens.push(Screen::new(self.title(), text(&record.terminal)));
            }
            View::PortStatus => {
                screens.push(Screen::new(
                    self.title(),
                    format!("{} {}", record.port_status, record.activity_level),
                ));
            }
        }
        screens
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// absent text renders as a blank line
fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/*
 *  lib.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Two-line character LCD dashboard: port traffic and weather views,
 *  scrolled on the panel and rotated by timer or push button
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

pub mod button;
pub mod config;
pub mod display;
pub mod port_data;
pub mod record;
pub mod weather;

pub use button::ButtonLatch;
pub use port_data::{DataProvider, PortDataProvider};
pub use record::{DataSource, DisplayRecord};

/*
 *  display/mod.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Display subsystem - character panel drivers, views, renderer and
 *  the view scheduler
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

// Core trait definitions
pub mod traits;
pub mod error;

// Panel drivers: I2C HD44780 and the in-memory mock
pub mod drivers;

// What to show and how to draw it
pub mod views;
pub mod renderer;

// Rotation
pub mod scheduler;

// Re-exports for convenience
pub use traits::{CharacterDisplay, DisplayGeometry};
pub use error::DisplayError;
pub use drivers::hd44780::{open_i2c, Lcd1602};
pub use drivers::mock::{MockDelay, MockLcd};
pub use views::{Screen, View};
pub use renderer::{ScrollTiming, ViewRenderer};
pub use scheduler::{SchedulerTiming, ViewScheduler};

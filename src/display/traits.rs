/*
 *  display/traits.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Character display abstraction
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

/// Character grid of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    /// Visible cells per row
    pub columns: u8,

    /// Visible rows
    pub rows: u8,
}

impl DisplayGeometry {
    /// The 1602 panel
    pub const LCD_16X2: DisplayGeometry = DisplayGeometry { columns: 16, rows: 2 };
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::LCD_16X2
    }
}

/// Minimal character LCD operations the renderer draws with.
///
/// None of these report failure. A character panel gives no acknowledgement
/// that a byte landed, so drivers drop transfer errors.
pub trait CharacterDisplay: Send {
    /// Panel grid size
    fn geometry(&self) -> DisplayGeometry {
        DisplayGeometry::LCD_16X2
    }

    /// Power-on initialization. Called exactly once, before anything else.
    fn init(&mut self);

    /// Erase the panel and put the cursor at (0,0). Blocks until the
    /// controller has settled.
    fn clear(&mut self);

    /// Move the write cursor. Out of range positions are not clamped.
    fn set_cursor(&mut self, col: u8, row: u8);

    /// Write text at the cursor without wrapping.
    fn print(&mut self, text: &str);

    /// Backlight on/off, where the hardware has one
    fn set_backlight(&mut self, _on: bool) {}
}

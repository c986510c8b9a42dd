/*
 *  display/drivers/mock.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  In-memory character panel for testing and emulation without hardware
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

use embedded_hal::delay::DelayNs;
use log::info;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::traits::{CharacterDisplay, DisplayGeometry};

/// HD44780 keeps 40 cells of DDRAM per row, only the first 16 are visible
const DDRAM_ROW_CELLS: usize = 40;

/// One `print` call as the panel received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCall {
    pub col: u8,
    pub row: u8,
    pub text: String,
}

/// Internal state for the mock panel (shared for inspection in tests)
#[derive(Debug)]
pub struct MockLcdState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Last backlight state set
    pub backlight: bool,

    /// DDRAM contents, row-major
    pub ddram: [[char; DDRAM_ROW_CELLS]; 2],

    /// Write cursor (column, row)
    pub cursor: (u8, u8),

    /// Every print, in order
    pub prints: Vec<PrintCall>,
}

impl Default for MockLcdState {
    fn default() -> Self {
        Self {
            init_count: 0,
            clear_count: 0,
            backlight: true,
            ddram: [[' '; DDRAM_ROW_CELLS]; 2],
            cursor: (0, 0),
            prints: Vec::new(),
        }
    }
}

impl MockLcdState {
    /// Visible part of `row`
    pub fn row_text(&self, row: u8) -> String {
        self.ddram[usize::from(row) % 2][..usize::from(DisplayGeometry::LCD_16X2.columns)]
            .iter()
            .collect()
    }

    /// Prints that started on `row`
    pub fn prints_on(&self, row: u8) -> Vec<&PrintCall> {
        self.prints.iter().filter(|p| p.row == row).collect()
    }

    fn put(&mut self, ch: char) {
        let (col, row) = self.cursor;
        self.ddram[usize::from(row) % 2][usize::from(col) % DDRAM_ROW_CELLS] = ch;
        // address counter runs 0x00..0x27 then 0x40..0x67
        let next = usize::from(col) + 1;
        self.cursor = if next >= DDRAM_ROW_CELLS {
            (0, (row + 1) % 2)
        } else {
            (next as u8, row)
        };
    }
}

/// Character panel that lives in memory.
///
/// Models DDRAM the way the controller does, so text written past column 15
/// lands in invisible cells instead of wrapping. With `echo` on, both visible
/// rows are logged after every print; `--emulated` runs on that.
#[derive(Debug, Clone, Default)]
pub struct MockLcd {
    state: Arc<Mutex<MockLcdState>>,
    echo: bool,
}

impl MockLcd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the panel contents after each print
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockLcdState>> {
        Arc::clone(&self.state)
    }

    /// Both visible rows
    pub fn screen(&self) -> [String; 2] {
        let state = self.lock();
        [state.row_text(0), state.row_text(1)]
    }

    fn lock(&self) -> MutexGuard<'_, MockLcdState> {
        // a panicked test thread must not hide the panel from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CharacterDisplay for MockLcd {
    fn init(&mut self) {
        let mut state = self.lock();
        state.init_count += 1;
        state.ddram = [[' '; DDRAM_ROW_CELLS]; 2];
        state.cursor = (0, 0);
    }

    fn clear(&mut self) {
        let mut state = self.lock();
        state.clear_count += 1;
        state.ddram = [[' '; DDRAM_ROW_CELLS]; 2];
        state.cursor = (0, 0);
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.lock().cursor = (col, row);
    }

    fn print(&mut self, text: &str) {
        let mut state = self.lock();
        let (col, row) = state.cursor;
        state.prints.push(PrintCall { col, row, text: text.to_string() });
        for ch in text.chars() {
            state.put(ch);
        }
        if self.echo {
            info!(target: "lcd", "|{}|{}|", state.row_text(0), state.row_text(1));
        }
    }

    fn set_backlight(&mut self, on: bool) {
        self.lock().backlight = on;
    }
}

/// Delay provider that returns immediately and remembers what was asked for
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    state: Arc<Mutex<MockDelayState>>,
}

#[derive(Debug, Default)]
pub struct MockDelayState {
    /// Every delay_ms call, in order
    pub ms_calls: Vec<u32>,

    /// Sum of everything requested
    pub total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<Mutex<MockDelayState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockDelayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.lock().total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.lock().total_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut state = self.lock();
        state.ms_calls.push(ms);
        state.total_ns += u64::from(ms) * 1_000_000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_lcd_creation() {
        let lcd = MockLcd::new();
        assert_eq!(lcd.geometry(), DisplayGeometry::LCD_16X2);
        assert_eq!(lcd.screen(), [" ".repeat(16), " ".repeat(16)]);
        assert!(lcd.state().lock().unwrap().backlight);
    }

    #[test]
    fn test_mock_lcd_init() {
        let mut lcd = MockLcd::new();
        let state = lcd.state();
        assert_eq!(state.lock().unwrap().init_count, 0);
        lcd.init();
        assert_eq!(state.lock().unwrap().init_count, 1);
    }

    #[test]
    fn test_print_advances_cursor() {
        let mut lcd = MockLcd::new();
        lcd.print("AB");
        lcd.print("CD");
        assert_eq!(lcd.screen()[0], "ABCD            ");
        assert_eq!(lcd.state().lock().unwrap().cursor, (4, 0));
    }

    #[test]
    fn test_set_cursor_and_overwrite() {
        let mut lcd = MockLcd::new();
        lcd.print("ROTTERDAM PORT");
        lcd.set_cursor(15, 0);
        lcd.print("S");
        lcd.set_cursor(0, 1);
        lcd.print("Ships: 150");
        assert_eq!(lcd.screen(), ["ROTTERDAM PORT S".to_string(), "Ships: 150      ".to_string()]);

        let state = lcd.state();
        let state = state.lock().unwrap();
        assert_eq!(state.prints.len(), 3);
        assert_eq!(state.prints[1], PrintCall { col: 15, row: 0, text: "S".into() });
        assert_eq!(state.prints_on(1).len(), 1);
    }

    #[test]
    fn test_clear_resets_cells_and_cursor() {
        let mut lcd = MockLcd::new();
        lcd.set_cursor(3, 1);
        lcd.print("xyz");
        lcd.clear();
        assert_eq!(lcd.screen(), [" ".repeat(16), " ".repeat(16)]);
        let state = lcd.state();
        assert_eq!(state.lock().unwrap().cursor, (0, 0));
        assert_eq!(state.lock().unwrap().clear_count, 1);
    }

    #[test]
    fn test_overlong_print_goes_to_hidden_ddram() {
        let mut lcd = MockLcd::new();
        lcd.print("0123456789ABCDEFGHIJ");
        // nothing wraps onto the second row
        assert_eq!(lcd.screen()[0], "0123456789ABCDEF");
        assert_eq!(lcd.screen()[1], " ".repeat(16));
        assert_eq!(lcd.state().lock().unwrap().ddram[0][19], 'J');
    }

    #[test]
    fn test_ddram_end_wraps_to_next_row() {
        let mut lcd = MockLcd::new();
        lcd.set_cursor(39, 0);
        lcd.print("XY");
        assert_eq!(lcd.screen()[1], "Y               ");
    }

    #[test]
    fn test_backlight() {
        let mut lcd = MockLcd::new();
        lcd.set_backlight(false);
        assert!(!lcd.state().lock().unwrap().backlight);
    }

    #[test]
    fn test_mock_delay_records() {
        let mut delay = MockDelay::new();
        delay.delay_ms(3000);
        delay.delay_ms(250);
        delay.delay_us(10);
        let state = delay.state();
        let state = state.lock().unwrap();
        assert_eq!(state.ms_calls, vec![3000, 250]);
        assert_eq!(state.total_ns, 3_250_010_000);
    }
}

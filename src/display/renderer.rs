/*
 *  display/renderer.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  Draws one view of a record onto the 16x2 panel, scrolling lines
 *  that do not fit
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
use log::debug;

use crate::display::traits::CharacterDisplay;
use crate::display::views::View;
use crate::record::{DataSource, DisplayRecord};

/// Blank cells appended before scrolling, so the tail clears the panel
pub const SCROLL_GAP: usize = 3;

/// Hold and step times for row 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTiming {
    /// How long a line that fits stays up
    pub dwell_ms: u32,

    /// How long each scroll position stays up
    pub step_ms: u32,
}

impl Default for ScrollTiming {
    fn default() -> Self {
        Self { dwell_ms: 3000, step_ms: 250 }
    }
}

/// Renders views through a character display.
///
/// All waiting goes through `delay`, so a render blocks the caller for the
/// full dwell or scroll time.
pub struct ViewRenderer<L, D> {
    lcd: L,
    delay: D,
    timing: ScrollTiming,
}

impl<L, D> ViewRenderer<L, D>
where
    L: CharacterDisplay,
    D: DelayNs,
{
    pub fn new(lcd: L, delay: D, timing: ScrollTiming) -> Self {
        Self { lcd, delay, timing }
    }

    pub fn lcd(&self) -> &L {
        &self.lcd
    }

    pub fn lcd_mut(&mut self) -> &mut L {
        &mut self.lcd
    }

    pub fn timing(&self) -> ScrollTiming {
        self.timing
    }

    /// Draw every screen of `view` for `record`.
    ///
    /// Each screen: clear, title on row 0, message on row 1 (held or
    /// scrolled), then the data source glyph in the last cell of row 0.
    pub fn render_view(&mut self, view: View, record: &DisplayRecord) {
        for screen in view.screens(record) {
            self.lcd.clear();
            self.lcd.print(screen.title);
            let dwell_ms = screen.dwell_ms.unwrap_or(self.timing.dwell_ms);
            let writes = self.write_scrolling_line(&screen.message, 1, dwell_ms, self.timing.step_ms);
            debug!("{} '{}': {} write(s) on row 1", view, screen.title, writes);
            self.show_source_indicator(record.data_source);
        }
    }

    /// Put `text` on `row`.
    ///
    /// Text that fits is padded to the full width, written once and held for
    /// `dwell_ms`. Longer text gets [`SCROLL_GAP`] trailing blanks and is
    /// walked through a panel-wide window one column at a time, `step_ms` per
    /// position, in a single pass. Returns the number of writes made.
    pub fn write_scrolling_line(&mut self, text: &str, row: u8, dwell_ms: u32, step_ms: u32) -> usize {
        let width = usize::from(self.lcd.geometry().columns);

        if text.chars().count() <= width {
            self.lcd.set_cursor(0, row);
            self.lcd.print(&pad_line(text, width));
            self.delay.delay_ms(dwell_ms);
            return 1;
        }

        let windows = scroll_windows(text, width);
        for window in &windows {
            self.lcd.set_cursor(0, row);
            self.lcd.print(window);
            self.delay.delay_ms(step_ms);
        }
        windows.len()
    }

    /// `R` for live data, `S` for simulated, top-right cell
    pub fn show_source_indicator(&mut self, source: DataSource) {
        let last_col = self.lcd.geometry().columns.saturating_sub(1);
        self.lcd.set_cursor(last_col, 0);
        self.lcd.print(&source.indicator().to_string());
    }

    /// Blank the panel
    pub fn clear(&mut self) {
        self.lcd.clear();
    }
}

/// Right-pad `text` with spaces to `width` characters
pub fn pad_line(text: &str, width: usize) -> String {
    let mut line = String::with_capacity(width);
    line.push_str(text);
    let len = text.chars().count();
    if len < width {
        line.extend(std::iter::repeat_n(' ', width - len));
    }
    line
}

/// Every window a scrolled line goes through, first to last.
///
/// For text of `n > width` characters that is `n + SCROLL_GAP - width + 1`
/// windows; the first is the head of the text and the last ends on the gap.
pub fn scroll_windows(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text
        .chars()
        .chain(std::iter::repeat_n(' ', SCROLL_GAP))
        .collect();
    if chars.len() <= width {
        return vec![pad_line(text, width)];
    }
    chars
        .windows(width)
        .map(|w| w.iter().collect())
        .collect()
}

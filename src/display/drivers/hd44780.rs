/*
 *  display/drivers/hd44780.rs
 *
 *  PortLCD - Rotterdam port at a glance
 *  (c) 2026 PortLCD contributors
 *
 *  HD44780 1602 panel on a Linux I2C bus
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
use embedded_hal::i2c::I2c;
use linux_embedded_hal::{Delay, I2cdev};
use portlcd_driver_hd44780::{Hd44780I2c, COLUMNS, ROWS};

use crate::display::error::DisplayError;
use crate::display::traits::{CharacterDisplay, DisplayGeometry};

use log::info;

/// The panel as wired on the Pi: `/dev/i2c-N` plus the thread-sleep delay
pub type Lcd1602 = Hd44780I2c<I2cdev, Delay>;

/// Open the I2C device and wrap it in the HD44780 driver.
///
/// The panel is not initialized here; the scheduler does that once through
/// [`CharacterDisplay::init`].
///
/// # Arguments
///
/// * `i2c_bus_path` - Path to I2C device (e.g., "/dev/i2c-1")
/// * `address` - backpack address (typically 0x27 or 0x3F)
pub fn open_i2c(i2c_bus_path: &str, address: u8) -> Result<Lcd1602, DisplayError> {
    info!("Opening HD44780 on {} at address 0x{:02X}", i2c_bus_path, address);

    let i2c = I2cdev::new(i2c_bus_path)
        .map_err(|e| DisplayError::I2cError(format!("Failed to open {}: {}", i2c_bus_path, e)))?;

    Ok(Hd44780I2c::new(i2c, Delay, address))
}

impl<I2C, D> CharacterDisplay for Hd44780I2c<I2C, D>
where
    I2C: I2c + Send,
    D: DelayNs + Send,
{
    fn geometry(&self) -> DisplayGeometry {
        DisplayGeometry { columns: COLUMNS, rows: ROWS }
    }

    fn init(&mut self) {
        Hd44780I2c::init(self);
        info!("HD44780 at 0x{:02X} initialized", self.address());
    }

    fn clear(&mut self) {
        Hd44780I2c::clear(self);
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        Hd44780I2c::set_cursor(self, col, row);
    }

    fn print(&mut self, text: &str) {
        Hd44780I2c::print(self, text);
    }

    fn set_backlight(&mut self, on: bool) {
        Hd44780I2c::set_backlight(self, on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Default)]
    struct ByteLog(Vec<u8>);

    impl ErrorType for ByteLog {
        type Error = ErrorKind;
    }

    impl I2c for ByteLog {
        fn transaction(&mut self, _address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            for op in operations.iter_mut() {
                if let Operation::Write(bytes) = op {
                    self.0.extend_from_slice(bytes);
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn draw<L: CharacterDisplay>(lcd: &mut L) {
        lcd.clear();
        lcd.set_cursor(15, 0);
        lcd.print("S");
    }

    #[test]
    fn test_trait_dispatch_reaches_driver() {
        let mut lcd = Hd44780I2c::new(ByteLog::default(), NoDelay, 0x27);
        assert_eq!(lcd.geometry(), DisplayGeometry::LCD_16X2);
        draw(&mut lcd);
        let (bus, _) = lcd.release();
        // clear, set cursor, one data byte
        assert_eq!(bus.0.len(), 3 * 4);
        // DDRAM address 0x0F on row 0
        assert_eq!(bus.0[4] & 0xF0, 0x80);
        assert_eq!(bus.0[6] & 0xF0, 0xF0);
    }
}

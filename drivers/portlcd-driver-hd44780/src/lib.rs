/*
 *  PortLCD HD44780 Driver
 *
 *  Character LCD driver for HD44780-compatible controllers wired
 *  through a PCF8574 I2C backpack (the common "LCD1602 I2C" module).
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 */

//! # PortLCD HD44780 Character LCD Driver
//!
//! Drives a 16x2 character LCD in 4-bit mode. Every controller byte is split
//! into two nibbles and latched with the EN line of the backpack expander.
//!
//! ## Hardware Support
//!
//! - HD44780 / KS0066 / ST7066 1602 modules
//! - PCF8574 / PCF8574A backpacks
//! - Typical I2C addresses: 0x27, 0x3F
//!
//! ## Transfer model
//!
//! The backpack has no read-back path that the driver uses, so every bus
//! write is fire-and-forget. A failed write shows up as garbage on the glass,
//! never as an error value.
//!
//! ## Usage
//!
//! ```ignore
//! let mut lcd = Hd44780I2c::new(i2c, delay, 0x27);
//! lcd.init();
//! lcd.set_cursor(0, 1);
//! lcd.print("Hello");
//! ```

mod driver;

pub use driver::{rom_code, Hd44780I2c, COLUMNS, DEFAULT_ADDRESS, ROWS};

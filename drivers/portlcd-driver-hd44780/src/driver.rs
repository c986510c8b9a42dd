/*
 *  PortLCD HD44780 Driver - 4-bit transfer implementation
 *
 *  Nibble protocol, command set and settle timing for HD44780
 *  controllers behind a PCF8574 expander
 */

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Visible columns per row
pub const COLUMNS: u8 = 16;

/// Visible rows
pub const ROWS: u8 = 2;

/// PCF8574 backpack default address (0x3F on the "A" variant)
pub const DEFAULT_ADDRESS: u8 = 0x27;

// PCF8574 pin mapping: P0=RS P1=RW P2=EN P3=backlight P4..P7=D4..D7
const RS_DATA: u8 = 0x01;
const ENABLE: u8 = 0x04;
const BACKLIGHT_ON: u8 = 0x08;
const BACKLIGHT_OFF: u8 = 0x00;

const CMD_CLEAR: u8 = 0x01;
const CMD_HOME: u8 = 0x02;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM base address of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Power-on sequence: 8-bit wake, switch to 4-bit, 2 lines 5x8,
/// display on / cursor off, entry increment, clear.
const INIT_SEQUENCE: [u8; 6] = [0x33, 0x32, 0x28, 0x0C, 0x06, 0x01];

const POWER_ON_WAIT_MS: u32 = 50;
const INIT_STEP_WAIT_MS: u32 = 5;
// clear and home need 1.52 ms on the datasheet, round up
const LONG_COMMAND_WAIT_MS: u32 = 5;
const ENABLE_SETTLE_US: u32 = 10;
const BYTE_SETTLE_US: u32 = 100;

/// HD44780 driver over an I2C backpack
pub struct Hd44780I2c<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: u8,
}

impl<I2C, D> Hd44780I2c<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for the backpack at `address`.
    ///
    /// Nothing is sent on the bus until [`init`](Self::init).
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: BACKLIGHT_ON,
        }
    }

    /// Run the controller power-on sequence. Call exactly once before
    /// anything else.
    pub fn init(&mut self) {
        self.delay.delay_ms(POWER_ON_WAIT_MS);
        for cmd in INIT_SEQUENCE {
            self.command(cmd);
            self.delay.delay_ms(INIT_STEP_WAIT_MS);
        }
    }

    /// Erase both rows and return the cursor to (0,0).
    pub fn clear(&mut self) {
        self.command(CMD_CLEAR);
        self.delay.delay_ms(LONG_COMMAND_WAIT_MS);
    }

    /// Return the cursor to (0,0) and undo any display shift.
    pub fn home(&mut self) {
        self.command(CMD_HOME);
        self.delay.delay_ms(LONG_COMMAND_WAIT_MS);
    }

    /// Move the write cursor. Values are not clamped: a column past 39 or a
    /// row past 1 addresses whatever DDRAM cell the sum lands on.
    pub fn set_cursor(&mut self, col: u8, row: u8) {
        let offset = ROW_OFFSETS[1].wrapping_mul(row);
        self.command(CMD_SET_DDRAM | col.wrapping_add(offset));
    }

    /// Write `text` at the cursor, one ROM code per character.
    ///
    /// The controller does not wrap at column 16; callers size lines first.
    pub fn print(&mut self, text: &str) {
        for ch in text.chars() {
            self.write_char(ch);
        }
    }

    /// Write a single character at the cursor.
    pub fn write_char(&mut self, ch: char) {
        self.data(rom_code(ch));
    }

    /// Switch the backpack backlight. Takes effect immediately.
    pub fn set_backlight(&mut self, on: bool) {
        self.backlight = if on { BACKLIGHT_ON } else { BACKLIGHT_OFF };
        self.write_byte(self.backlight);
    }

    /// Current backlight state
    pub fn backlight(&self) -> bool {
        self.backlight == BACKLIGHT_ON
    }

    /// Backpack I2C address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus and delay provider back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, cmd: u8) {
        self.send(cmd, 0);
    }

    fn data(&mut self, value: u8) {
        self.send(value, RS_DATA);
    }

    fn send(&mut self, value: u8, mode: u8) {
        self.pulse((value & 0xF0) | mode);
        self.pulse(((value << 4) & 0xF0) | mode);
        self.delay.delay_us(BYTE_SETTLE_US);
    }

    fn pulse(&mut self, nibble: u8) {
        let latched = nibble | self.backlight | ENABLE;
        self.write_byte(latched);
        self.delay.delay_us(ENABLE_SETTLE_US);
        self.write_byte(latched & !ENABLE);
        self.delay.delay_us(ENABLE_SETTLE_US);
    }

    fn write_byte(&mut self, byte: u8) {
        // no acknowledgement channel worth acting on; drop the error
        if let Err(_e) = self.i2c.write(self.address, &[byte]) {
            #[cfg(feature = "debug-logging")]
            log::trace!("hd44780 write 0x{:02X} to 0x{:02X} dropped: {:?}", byte, self.address, _e);
        }
    }
}

/// Map a character onto the A00 character ROM.
///
/// Printable ASCII is identity, the degree sign has its own glyph at 0xDF and
/// everything else is shown as `?`.
pub fn rom_code(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '°' => 0xDF,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, u8)>,
        fail: bool,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        for &b in bytes.iter() {
                            self.writes.push((address, b));
                        }
                    }
                    Operation::Read(buf) => buf.fill(0),
                }
            }
            if self.fail {
                Err(ErrorKind::Other)
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
        ms_calls: Vec<u32>,
        us_calls: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }

        fn delay_us(&mut self, us: u32) {
            self.us_calls.push(us);
            self.total_ns += u64::from(us) * 1_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.ms_calls.push(ms);
            self.total_ns += u64::from(ms) * 1_000_000;
        }
    }

    fn driver() -> Hd44780I2c<RecordingBus, RecordingDelay> {
        Hd44780I2c::new(RecordingBus::default(), RecordingDelay::default(), DEFAULT_ADDRESS)
    }

    fn bytes(lcd: Hd44780I2c<RecordingBus, RecordingDelay>) -> (Vec<u8>, RecordingDelay) {
        let (bus, delay) = lcd.release();
        (bus.writes.into_iter().map(|(_, b)| b).collect(), delay)
    }

    #[test]
    fn test_new_is_silent() {
        let (writes, delay) = bytes(driver());
        assert!(writes.is_empty());
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = driver();
        lcd.init();
        let (writes, delay) = bytes(lcd);

        // six commands, two nibbles each, EN high then low per nibble
        assert_eq!(writes.len(), 6 * 4);
        assert_eq!(&writes[0..4], &[0x3C, 0x38, 0x3C, 0x38]); // 0x33
        assert_eq!(&writes[4..8], &[0x3C, 0x38, 0x2C, 0x28]); // 0x32
        assert_eq!(&writes[8..12], &[0x2C, 0x28, 0x8C, 0x88]); // 0x28
        assert_eq!(&writes[20..24], &[0x0C, 0x08, 0x1C, 0x18]); // 0x01

        assert_eq!(delay.ms_calls, vec![50, 5, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn test_every_write_targets_backpack_address() {
        let mut lcd = Hd44780I2c::new(RecordingBus::default(), RecordingDelay::default(), 0x3F);
        lcd.init();
        lcd.print("ok");
        let (bus, _) = lcd.release();
        assert!(bus.writes.iter().all(|&(addr, _)| addr == 0x3F));
    }

    #[test]
    fn test_data_byte_sets_rs() {
        let mut lcd = driver();
        lcd.print("A");
        let (writes, delay) = bytes(lcd);
        // 'A' = 0x41 -> high nibble 0x4, low nibble 0x1, RS + backlight
        assert_eq!(writes, vec![0x4D, 0x49, 0x1D, 0x19]);
        assert_eq!(delay.us_calls, vec![10, 10, 10, 10, 100]);
    }

    #[test]
    fn test_clear_waits_for_controller() {
        let mut lcd = driver();
        lcd.clear();
        let (writes, delay) = bytes(lcd);
        assert_eq!(writes, vec![0x0C, 0x08, 0x1C, 0x18]);
        assert_eq!(delay.ms_calls, vec![5]);
        assert!(delay.total_ns >= 1_600_000);
    }

    #[test]
    fn test_home_waits_for_controller() {
        let mut lcd = driver();
        lcd.home();
        let (writes, delay) = bytes(lcd);
        assert_eq!(writes, vec![0x0C, 0x08, 0x2C, 0x28]);
        assert_eq!(delay.ms_calls, vec![5]);
    }

    #[test]
    fn test_set_cursor_row_offsets() {
        let mut lcd = driver();
        lcd.set_cursor(0, 0);
        lcd.set_cursor(15, 0);
        lcd.set_cursor(0, 1);
        lcd.set_cursor(15, 1);
        let (writes, _) = bytes(lcd);

        let commands: Vec<u8> = writes
            .chunks(4)
            .map(|c| (c[0] & 0xF0) | (c[2] >> 4))
            .collect();
        assert_eq!(commands, vec![0x80, 0x8F, 0xC0, 0xCF]);
    }

    #[test]
    fn test_backlight_off_clears_bit_on_following_bytes() {
        let mut lcd = driver();
        lcd.set_backlight(false);
        assert!(!lcd.backlight());
        lcd.print(" ");
        let (writes, _) = bytes(lcd);
        assert_eq!(writes[0], 0x00);
        assert!(writes[1..].iter().all(|b| b & BACKLIGHT_ON == 0));
    }

    #[test]
    fn test_bus_failures_are_swallowed() {
        let bus = RecordingBus { fail: true, ..Default::default() };
        let mut lcd = Hd44780I2c::new(bus, RecordingDelay::default(), DEFAULT_ADDRESS);
        lcd.init();
        lcd.clear();
        lcd.print("still here");
        let (bus, _) = lcd.release();
        // every transfer was still attempted
        assert_eq!(bus.writes.len(), (6 + 1 + 10) * 4);
    }

    #[test]
    fn test_rom_code_mapping() {
        assert_eq!(rom_code('A'), 0x41);
        assert_eq!(rom_code(' '), 0x20);
        assert_eq!(rom_code('}'), 0x7D);
        assert_eq!(rom_code('~'), 0x7E);
        assert_eq!(rom_code('\u{7f}'), b'?');
        assert_eq!(rom_code('°'), 0xDF);
        assert_eq!(rom_code('é'), b'?');
        assert_eq!(rom_code('\n'), b'?');
    }
}

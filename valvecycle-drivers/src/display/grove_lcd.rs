//! Grove RGB LCD 16x2
//!
//! Two devices behind one connector:
//!
//! - An HD44780-compatible character controller at `0x3E`. Every transfer
//!   is a control byte (`0x80` command, `0x40` data) followed by one byte.
//! - A PCA9633-style backlight LED driver at `0x62` with one PWM register
//!   per colour.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use valvecycle_core::traits::{DisplayError, TextDisplay};

/// Character controller address
pub const LCD_ADDRESS: u8 = 0x3E;
/// Backlight controller address
pub const RGB_ADDRESS: u8 = 0x62;

/// Visible columns
pub const COLS: u8 = 16;
/// Visible rows
pub const ROWS: u8 = 2;

const CONTROL_COMMAND: u8 = 0x80;
const CONTROL_DATA: u8 = 0x40;

/// HD44780 instructions
mod lcd {
    pub const CLEAR: u8 = 0x01;
    /// Increment cursor, no shift
    pub const ENTRY_MODE: u8 = 0x06;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// Two lines, 5x8 font
    pub const FUNCTION_SET: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
    /// DDRAM offset of the second row
    pub const ROW1_OFFSET: u8 = 0x40;
}

/// Backlight registers
mod rgb {
    pub const MODE1: u8 = 0x00;
    pub const MODE2: u8 = 0x01;
    pub const BLUE: u8 = 0x02;
    pub const GREEN: u8 = 0x03;
    pub const RED: u8 = 0x04;
    pub const LEDOUT: u8 = 0x08;
}

/// Backlight colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

/// Grove RGB LCD driver
pub struct GroveLcd<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> GroveLcd<I2C, D> {
    /// Create a driver; call [`init`](Self::init) before use
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Power-on initialisation
    ///
    /// Follows the HD44780 reset-by-instruction sequence, then turns the
    /// display on with a white backlight.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);

        self.command(lcd::FUNCTION_SET)?;
        self.delay.delay_us(4500);
        self.command(lcd::FUNCTION_SET)?;
        self.delay.delay_us(150);
        self.command(lcd::FUNCTION_SET)?;
        self.command(lcd::FUNCTION_SET)?;

        self.command(lcd::DISPLAY_ON)?;
        self.clear()?;
        self.command(lcd::ENTRY_MODE)?;

        self.set_reg(rgb::MODE1, 0x00)?;
        self.set_reg(rgb::LEDOUT, 0xFF)?;
        self.set_reg(rgb::MODE2, 0x20)?;
        self.set_rgb(Rgb::WHITE)
    }

    /// Set the backlight colour
    pub fn set_rgb(&mut self, color: Rgb) -> Result<(), DisplayError> {
        self.set_reg(rgb::RED, color.r)?;
        self.set_reg(rgb::GREEN, color.g)?;
        self.set_reg(rgb::BLUE, color.b)
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(LCD_ADDRESS, &[CONTROL_COMMAND, value])
            .map_err(|_| DisplayError::Bus)
    }

    fn data(&mut self, value: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(LCD_ADDRESS, &[CONTROL_DATA, value])
            .map_err(|_| DisplayError::Bus)
    }

    fn set_reg(&mut self, reg: u8, value: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(RGB_ADDRESS, &[reg, value])
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I2C: I2c, D: DelayNs> TextDisplay for GroveLcd<I2C, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(lcd::CLEAR)?;
        // Clear takes up to 1.52 ms
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        let col = col.min(COLS - 1);
        let offset = if row == 0 { 0 } else { lcd::ROW1_OFFSET };
        self.command(lcd::SET_DDRAM | (offset + col))
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        for byte in text.bytes().take(COLS as usize) {
            // The character ROM only covers printable ASCII reliably
            let byte = if byte.is_ascii() && !byte.is_ascii_control() {
                byte
            } else {
                b'?'
            };
            self.data(byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeI2c;
    use valvecycle_core::traits::TextDisplayExt;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd() -> GroveLcd<FakeI2c, NoDelay> {
        GroveLcd::new(FakeI2c::new(&[LCD_ADDRESS, RGB_ADDRESS]), NoDelay)
    }

    #[test]
    fn test_init_sequence() {
        let mut display = lcd();
        display.init().unwrap();
        let (bus, _) = display.release();

        let commands: heapless::Vec<u8, 16> = bus.writes_to(LCD_ADDRESS).map(|w| w[1]).collect();
        assert_eq!(commands.as_slice(), &[0x28, 0x28, 0x28, 0x28, 0x0C, 0x01, 0x06]);

        let backlight: heapless::Vec<&[u8], 8> = bus.writes_to(RGB_ADDRESS).collect();
        assert_eq!(backlight[0], &[0x00, 0x00]);
        assert_eq!(backlight[3], &[0x04, 255]);
    }

    #[test]
    fn test_cursor_rows() {
        let mut display = lcd();
        display.set_cursor(0, 0).unwrap();
        display.set_cursor(3, 1).unwrap();
        let (bus, _) = display.release();
        let cmds: heapless::Vec<&[u8], 4> = bus.writes_to(LCD_ADDRESS).collect();
        assert_eq!(cmds.as_slice(), &[&[0x80, 0x80][..], &[0x80, 0xC3][..]]);
    }

    #[test]
    fn test_print_sends_data() {
        let mut display = lcd();
        display.print("Hi\n").unwrap();
        let (bus, _) = display.release();
        let data: heapless::Vec<&[u8], 4> = bus.writes_to(LCD_ADDRESS).collect();
        assert_eq!(data.as_slice(), &[&[0x40, b'H'][..], &[0x40, b'i'][..], &[0x40, b'?'][..]]);
    }

    #[test]
    fn test_draw_lines() {
        let mut display = lcd();
        display.draw_lines(&[" Ready", ""]).unwrap();
        let (bus, _) = display.release();
        // clear + cursor + six characters; the empty row is skipped
        assert_eq!(bus.writes_to(LCD_ADDRESS).count(), 8);
    }

    #[test]
    fn test_bus_error() {
        let mut display = GroveLcd::new(FakeI2c::new(&[]), NoDelay);
        assert_eq!(display.clear(), Err(DisplayError::Bus));
    }
}

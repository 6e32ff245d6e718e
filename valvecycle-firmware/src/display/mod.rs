//! LCD output
//!
//! Pushes rendered screens to the Grove LCD, skipping the bus traffic when
//! the screen has not changed.

use defmt::*;

use valvecycle_core::traits::{DisplayError, TextDisplayExt};
use valvecycle_core::view::Screen;

use crate::board::Lcd;

/// Display sink with a copy of what is on the glass
pub struct LcdSink {
    lcd: Lcd,
    shown: Option<Screen>,
}

impl LcdSink {
    /// Initialise the LCD
    ///
    /// A failed init is logged; drawing is retried on every screen change.
    pub fn new(mut lcd: Lcd) -> Self {
        if let Err(e) = lcd.init() {
            warn!("LCD init failed: {:?}", e);
        }
        Self { lcd, shown: None }
    }

    /// Draw `screen` unless it is already shown
    pub fn show(&mut self, screen: &Screen) {
        if self.shown.as_ref() == Some(screen) {
            return;
        }
        match self.draw(screen) {
            Ok(()) => self.shown = Some(screen.clone()),
            Err(e) => {
                warn!("LCD write failed: {:?}", e);
                self.shown = None;
            }
        }
    }

    fn draw(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        self.lcd.draw_lines(&screen.lines())
    }
}

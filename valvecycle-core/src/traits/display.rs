//! Character display trait for the 16x2 operator panel

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed
    Bus,
}

/// Passive text sink
///
/// The display is never read back. All layout decisions are made by the
/// caller; the driver only places characters.
pub trait TextDisplay {
    /// Clear the entire screen and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `col`: Column number (0-15)
    /// - `row`: Row number (0-1)
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Print ASCII text at the cursor
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;
}

/// Helper for drawing whole lines
pub trait TextDisplayExt: TextDisplay {
    /// Clear the screen and print one string per row
    fn draw_lines(&mut self, lines: &[&str]) -> Result<(), DisplayError> {
        self.clear()?;
        for (row, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            self.set_cursor(0, row as u8)?;
            self.print(line)?;
        }
        Ok(())
    }
}

impl<T: TextDisplay> TextDisplayExt for T {}

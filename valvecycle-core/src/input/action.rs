//! Logical operator actions

/// The three discrete actions produced by the encoder and button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Encoder turned one detent counter-clockwise
    Left,
    /// Encoder turned one detent clockwise
    Right,
    /// Button pressed
    Select,
}

impl Action {
    /// Returns the rotation direction as a signed delta (-1, 0, or +1)
    pub fn rotation_delta(&self) -> i8 {
        match self {
            Action::Right => 1,
            Action::Left => -1,
            Action::Select => 0,
        }
    }
}

//! Input dispatcher
//!
//! Turns the raw encoder position counter and button level into a stream
//! of [`Action`]s, one per loop iteration.

use super::action::Action;
use super::debounce::Debouncer;
use crate::time::Millis;

/// Raw input sampled once per loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    /// Encoder position counter
    pub position: i32,
    /// Raw button level (true = high)
    pub button: bool,
}

/// Actions produced by one poll
///
/// Rotation steps come first, one per unit of counter change, in the order
/// they accumulated; a button press follows.
#[derive(Debug, Clone)]
pub struct Actions {
    rotation: Action,
    steps: u32,
    select: bool,
}

impl Actions {
    /// Nothing happened
    pub const fn none() -> Self {
        Self {
            rotation: Action::Right,
            steps: 0,
            select: false,
        }
    }

    /// True if no action is left
    pub fn is_empty(&self) -> bool {
        self.steps == 0 && !self.select
    }
}

impl Iterator for Actions {
    type Item = Action;

    fn next(&mut self) -> Option<Action> {
        if self.steps > 0 {
            self.steps -= 1;
            return Some(self.rotation);
        }
        if self.select {
            self.select = false;
            return Some(Action::Select);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.steps as usize + usize::from(self.select);
        (n, Some(n))
    }
}

/// Input dispatcher
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    last_position: i32,
    button: Debouncer,
}

impl InputDispatcher {
    /// Create a dispatcher from the first raw sample
    pub fn new(initial: InputSample, debounce_ms: u32, active_low: bool, now: Millis) -> Self {
        Self {
            last_position: initial.position,
            button: Debouncer::new(debounce_ms, active_low, initial.button, now),
        }
    }

    /// Poll the inputs
    ///
    /// The counter is compared with wrapping arithmetic so a counter that
    /// overflows still yields the true signed change.
    pub fn poll(&mut self, sample: InputSample, now: Millis) -> Actions {
        let delta = sample.position.wrapping_sub(self.last_position);
        self.last_position = sample.position;

        let rotation = if delta < 0 { Action::Left } else { Action::Right };
        Actions {
            rotation,
            steps: delta.unsigned_abs(),
            select: self.button.update(sample.button, now),
        }
    }

    /// Button is currently held
    pub fn button_pressed(&self) -> bool {
        self.button.is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    fn dispatcher() -> InputDispatcher {
        InputDispatcher::new(
            InputSample {
                position: 0,
                button: true,
            },
            50,
            true,
            Millis(0),
        )
    }

    fn collect(actions: Actions) -> Vec<Action, 16> {
        actions.collect()
    }

    #[test]
    fn test_no_change_no_actions() {
        let mut d = dispatcher();
        let actions = d.poll(InputSample { position: 0, button: true }, Millis(1));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_multi_step_delivered_individually() {
        let mut d = dispatcher();
        let actions = d.poll(InputSample { position: 3, button: true }, Millis(1));
        assert_eq!(actions.size_hint(), (3, Some(3)));
        assert_eq!(collect(actions).as_slice(), &[Action::Right; 3]);

        let actions = d.poll(InputSample { position: 1, button: true }, Millis(2));
        assert_eq!(collect(actions).as_slice(), &[Action::Left; 2]);
    }

    #[test]
    fn test_counter_wrap() {
        let mut d = InputDispatcher::new(
            InputSample {
                position: i32::MAX,
                button: true,
            },
            50,
            true,
            Millis(0),
        );
        let actions = d.poll(
            InputSample {
                position: i32::MIN,
                button: true,
            },
            Millis(1),
        );
        assert_eq!(collect(actions).as_slice(), &[Action::Right]);
    }

    #[test]
    fn test_select_after_rotation() {
        let mut d = dispatcher();
        d.poll(InputSample { position: 0, button: false }, Millis(10));
        let actions = d.poll(InputSample { position: -1, button: false }, Millis(61));
        assert_eq!(collect(actions).as_slice(), &[Action::Left, Action::Select]);
        assert!(d.button_pressed());
    }
}

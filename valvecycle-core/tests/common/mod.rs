//! Shared fakes for the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use valvecycle_core::config::MachineConfig;
use valvecycle_core::input::Action;
use valvecycle_core::state::CycleState;
use valvecycle_core::traits::{Eeprom, RelayError, RelayMask, RelayOutput, StorageError};
use valvecycle_core::{BootReport, ControlError, Controller, Millis};

pub const EEPROM_SIZE: usize = 256;

/// Handle on an EEPROM image that survives a simulated reset
///
/// Handles made with [`TestEeprom::attach`] see the same cells and the same
/// fault switch, like a second driver on the same chip.
pub struct TestEeprom {
    cells: Rc<RefCell<Vec<u8>>>,
    failing: Rc<Cell<bool>>,
    pub writes: usize,
}

impl TestEeprom {
    pub fn blank() -> Self {
        Self {
            cells: Rc::new(RefCell::new(vec![0xFF; EEPROM_SIZE])),
            failing: Rc::new(Cell::new(false)),
            writes: 0,
        }
    }

    /// Another handle on the same chip
    pub fn attach(&self) -> Self {
        Self {
            cells: Rc::clone(&self.cells),
            failing: Rc::clone(&self.failing),
            writes: 0,
        }
    }

    /// Make every write fail with a bus error until switched off
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl Eeprom for TestEeprom {
    fn capacity(&self) -> usize {
        self.cells.borrow().len()
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        let cells = self.cells.borrow();
        let src = cells
            .get(offset..offset + buffer.len())
            .ok_or(StorageError::OutOfBounds)?;
        buffer.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        if self.failing.get() {
            return Err(StorageError::Bus);
        }
        let mut cells = self.cells.borrow_mut();
        let dst = cells
            .get_mut(offset..offset + data.len())
            .ok_or(StorageError::OutOfBounds)?;
        dst.copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

/// Relay board that records every applied mask
#[derive(Default)]
pub struct TestRelay {
    pub history: Vec<RelayMask>,
    /// Number of upcoming writes that NACK
    pub failures: usize,
}

impl TestRelay {
    /// Relay board that NACKs its first `failures` writes
    pub fn failing(failures: usize) -> Self {
        Self {
            history: Vec::new(),
            failures,
        }
    }

    pub fn current(&self) -> RelayMask {
        self.history.last().copied().unwrap_or(RelayMask::CLOSED)
    }
}

impl RelayOutput for TestRelay {
    fn set_channels(&mut self, mask: RelayMask) -> Result<(), RelayError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(RelayError::Bus);
        }
        self.history.push(mask);
        Ok(())
    }
}

pub type TestController = Controller<TestEeprom, TestRelay>;

pub fn try_boot(
    eeprom: TestEeprom,
    relay: TestRelay,
) -> Result<(TestController, BootReport), ControlError> {
    Controller::boot(eeprom, relay, &MachineConfig::default())
}

pub fn boot_with(eeprom: TestEeprom) -> (TestController, BootReport) {
    try_boot(eeprom, TestRelay::default()).unwrap()
}

pub fn boot_fresh() -> TestController {
    boot_with(TestEeprom::blank()).0
}

/// Power-cycle: keep the EEPROM, lose everything else
pub fn reset(controller: TestController) -> (TestController, BootReport) {
    let (eeprom, _relay) = controller.into_parts();
    boot_with(eeprom)
}

pub fn press(controller: &mut TestController, actions: &[Action], now: Millis) {
    for &action in actions {
        controller.handle_action(action, now).unwrap();
    }
}

/// Start the cycle and run until `target` is the active state
pub fn run_until(c: &mut TestController, target: CycleState) -> Millis {
    let mut now = Millis(0);
    c.handle_action(Action::Select, now).unwrap();
    c.tick(now).unwrap();
    while c.current() != target {
        now = now.wrapping_add(c.remaining_ms(now));
        c.tick(now).unwrap();
    }
    now
}

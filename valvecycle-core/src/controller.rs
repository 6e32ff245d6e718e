//! Main controller coordinating the cycle, the menu and persistence
//!
//! The controller is the central brain that:
//! - Boots from the persistent store, recovering an interrupted cycle
//! - Routes operator actions through the menu
//! - Executes the menu's commands against the scheduler and the store
//! - Advances the cycle and forwards relay updates
//! - Decides when the screen needs redrawing

use crate::config::MachineConfig;
use crate::input::Action;
use crate::menu::{MenuCommand, MenuState, SettingsMenu};
use crate::persist::{OpenOutcome, PersistentStore};
use crate::scheduler::{BootOutcome, CycleScheduler, SchedulerEvent};
use crate::state::{CycleState, CycleTable, Durations};
use crate::time::Millis;
use crate::traits::{Eeprom, RelayError, RelayOutput, StorageError};
use crate::view::{self, Notice, RunSnapshot, Screen};

/// Error from a controller operation
///
/// Never fatal: the controller stays consistent and the caller carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    Storage(StorageError),
    Relay(RelayError),
}

impl From<StorageError> for ControlError {
    fn from(e: StorageError) -> Self {
        ControlError::Storage(e)
    }
}

impl From<RelayError> for ControlError {
    fn from(e: RelayError) -> Self {
        ControlError::Relay(e)
    }
}

/// What happened during boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    /// Whether the store had to be formatted
    pub store: OpenOutcome,
    /// Crash recovery result
    pub outcome: BootOutcome,
    /// Persisted crash counter after recovery
    pub crash_count: u16,
    /// Durations in effect
    pub durations: Durations,
}

/// What the controller did in response to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Menu moved or a value changed
    Navigated,
    /// Cycle started or resumed
    Started,
    /// Cycle stopped with this much time left in the active state
    Stopped { remaining_ms: u32 },
    /// Durations persisted on leaving the settings list
    Persisted { fields_written: usize },
    /// Explicit settings action; show the notice
    Notice(Notice),
}

/// Controller state for coordinating subsystems
pub struct Controller<E, R> {
    table: CycleTable,
    scheduler: CycleScheduler,
    menu: SettingsMenu,
    store: PersistentStore<E>,
    relay: R,
    crash_count: u16,
    render_requested: bool,
    shown_seconds: Option<u32>,
}

impl<E: Eeprom, R: RelayOutput> Controller<E, R> {
    /// Boot sequence
    ///
    /// Closes every relay, then opens the store (formatting it with the
    /// configured factory durations if its schema marker is stale), loads
    /// the persisted durations and runs crash recovery. Recovery is the last
    /// fallible step, so a failed boot leaves an in-progress flag in place
    /// for the next attempt. A recovered state's relay mask is applied by
    /// the first [`tick`](Self::tick).
    pub fn boot(
        eeprom: E,
        mut relay: R,
        config: &MachineConfig,
    ) -> Result<(Self, BootReport), ControlError> {
        relay.close_all()?;

        let mut table = config.table();
        let (mut store, opened) = PersistentStore::open(eeprom, &table.durations)?;
        table.durations = store.load_durations()?;

        let mut scheduler = CycleScheduler::new();
        let outcome = scheduler.recover(&mut store)?;
        let crash_count = match outcome {
            BootOutcome::Recovered { crash_count, .. } => crash_count,
            BootOutcome::Fresh => store.crash_count()?,
        };

        let report = BootReport {
            store: opened,
            outcome,
            crash_count,
            durations: table.durations,
        };
        let controller = Self {
            table,
            scheduler,
            menu: SettingsMenu::new(),
            store,
            relay,
            crash_count,
            render_requested: true,
            shown_seconds: None,
        };
        Ok((controller, report))
    }

    /// Apply one operator action
    pub fn handle_action(&mut self, action: Action, now: Millis) -> Result<Outcome, ControlError> {
        self.render_requested = true;
        let Some(command) = self.menu.handle(action, &mut self.table.durations) else {
            return Ok(Outcome::Navigated);
        };
        let result = self.execute(command, now);
        self.flush_relay()?;
        Ok(result?)
    }

    fn execute(&mut self, command: MenuCommand, now: Millis) -> Result<Outcome, StorageError> {
        match command {
            MenuCommand::ToggleRun => {
                if self.scheduler.is_running() {
                    let remaining_ms = self.scheduler.stop(now, &self.table, &mut self.store)?;
                    Ok(Outcome::Stopped { remaining_ms })
                } else {
                    self.scheduler.start();
                    Ok(Outcome::Started)
                }
            }
            MenuCommand::ExitSettings => {
                let fields_written = self.store.save_durations(&self.table.durations)?;
                Ok(Outcome::Persisted { fields_written })
            }
            MenuCommand::Save => {
                self.store.save_durations(&self.table.durations)?;
                Ok(Outcome::Notice(Notice::Saved))
            }
            MenuCommand::Load => {
                self.table.durations = self.store.load_durations()?;
                Ok(Outcome::Notice(Notice::Loaded))
            }
            MenuCommand::Reset => {
                self.scheduler.reset(&mut self.store)?;
                Ok(Outcome::Notice(Notice::CycleReset))
            }
        }
    }

    /// Advance the cycle
    ///
    /// Also requests a redraw on every state entry and whenever the
    /// displayed remaining seconds change.
    pub fn tick(&mut self, now: Millis) -> Result<Option<SchedulerEvent>, ControlError> {
        let result = self.scheduler.advance(now, &self.table, &mut self.store);
        self.flush_relay()?;
        let event = result?;

        if event.is_some() {
            self.render_requested = true;
        } else if self.scheduler.is_running() {
            let seconds = self.scheduler.remaining_ms(now, &self.table) / 1000;
            if self.shown_seconds != Some(seconds) {
                self.render_requested = true;
            }
        }
        Ok(event)
    }

    fn flush_relay(&mut self) -> Result<(), RelayError> {
        match self.scheduler.take_relay_update() {
            Some(mask) => self.relay.set_channels(mask),
            None => Ok(()),
        }
    }

    /// Take the pending redraw request
    pub fn take_render_request(&mut self) -> bool {
        core::mem::take(&mut self.render_requested)
    }

    /// Request a redraw, e.g. after a notice was shown
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Render the current screen
    pub fn screen(&mut self, now: Millis) -> Screen {
        let run = self.snapshot(now);
        self.shown_seconds = run.running.then_some(run.remaining_ms / 1000);
        view::render(self.menu.state(), &run, &self.table.durations, self.crash_count)
    }

    /// Cycle state as shown on the main tabs
    pub fn snapshot(&self, now: Millis) -> RunSnapshot {
        RunSnapshot {
            running: self.scheduler.is_running(),
            paused: self.scheduler.is_paused(),
            current: self.scheduler.current(),
            remaining_ms: self.scheduler.remaining_ms(now, &self.table),
        }
    }

    /// Cycle is running
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Active cycle state
    pub fn current(&self) -> CycleState {
        self.scheduler.current()
    }

    /// Time left in the active state
    pub fn remaining_ms(&self, now: Millis) -> u32 {
        self.scheduler.remaining_ms(now, &self.table)
    }

    /// Durations in RAM, including unsaved edits
    pub fn durations(&self) -> &Durations {
        &self.table.durations
    }

    /// Cycle table in effect
    pub fn table(&self) -> &CycleTable {
        &self.table
    }

    /// Current menu state
    pub fn menu_state(&self) -> MenuState {
        self.menu.state()
    }

    /// Crash counter read at boot
    pub fn crash_count(&self) -> u16 {
        self.crash_count
    }

    /// Relay sink
    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Persistent store
    pub fn store(&self) -> &PersistentStore<E> {
        &self.store
    }

    /// Release the devices
    pub fn into_parts(self) -> (E, R) {
        (self.store.into_inner(), self.relay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MainTab, SettingsEntry};
    use crate::mock::{MemEeprom, RecordingRelay};
    use crate::state::TimedState;
    use crate::traits::RelayMask;

    type TestController = Controller<MemEeprom<64>, RecordingRelay>;

    fn boot() -> TestController {
        let (controller, report) =
            Controller::boot(MemEeprom::new(), RecordingRelay::new(), &MachineConfig::default())
                .unwrap();
        assert_eq!(report.store, OpenOutcome::Formatted);
        assert_eq!(report.outcome, BootOutcome::Fresh);
        controller
    }

    #[test]
    fn test_boot_closes_relays() {
        let c = boot();
        assert_eq!(c.relay().history.as_slice(), &[RelayMask::CLOSED]);
        assert_eq!(c.durations().get(TimedState::Filtration), 360_000);
        assert_eq!(c.crash_count(), 0);
    }

    #[test]
    fn test_start_applies_on_tick() {
        let mut c = boot();
        assert_eq!(c.handle_action(Action::Select, Millis(0)).unwrap(), Outcome::Started);
        assert_eq!(c.relay().current, RelayMask::CLOSED);

        let event = c.tick(Millis(5)).unwrap();
        assert!(matches!(event, Some(SchedulerEvent::Applied { .. })));
        assert_eq!(c.relay().current, RelayMask(0b0001));
    }

    #[test]
    fn test_stop_closes_relays() {
        let mut c = boot();
        c.handle_action(Action::Select, Millis(0)).unwrap();
        c.tick(Millis(0)).unwrap();
        let outcome = c.handle_action(Action::Select, Millis(10_000)).unwrap();
        assert_eq!(outcome, Outcome::Stopped { remaining_ms: 350_000 });
        assert_eq!(c.relay().current, RelayMask::CLOSED);
    }

    #[test]
    fn test_render_requests() {
        let mut c = boot();
        assert!(c.take_render_request());
        assert!(!c.take_render_request());

        c.handle_action(Action::Right, Millis(0)).unwrap();
        assert!(c.take_render_request());
        assert_eq!(c.menu_state(), MenuState::Main(MainTab::Settings));
    }

    #[test]
    fn test_countdown_requests_render_each_second() {
        let mut c = boot();
        c.handle_action(Action::Select, Millis(0)).unwrap();
        c.tick(Millis(0)).unwrap();
        c.take_render_request();
        let _ = c.screen(Millis(0));

        c.tick(Millis(1)).unwrap();
        assert!(c.take_render_request());
        assert_eq!(c.screen(Millis(1)).line(1), ">Stop       359s");

        c.tick(Millis(1000)).unwrap();
        assert!(!c.take_render_request());
        c.tick(Millis(1001)).unwrap();
        assert!(c.take_render_request());
    }

    #[test]
    fn test_load_replaces_edits() {
        let mut c = boot();
        c.handle_action(Action::Right, Millis(0)).unwrap();
        c.handle_action(Action::Select, Millis(0)).unwrap();
        c.handle_action(Action::Right, Millis(0)).unwrap();
        c.handle_action(Action::Select, Millis(0)).unwrap();
        c.handle_action(Action::Right, Millis(0)).unwrap();
        assert_eq!(c.durations().get(TimedState::Filtration), 420_000);

        c.handle_action(Action::Select, Millis(0)).unwrap();
        c.handle_action(Action::Select, Millis(0)).unwrap();
        for _ in 0..5 {
            c.handle_action(Action::Right, Millis(0)).unwrap();
        }
        assert_eq!(c.menu_state(), MenuState::Settings(SettingsEntry::Load));
        let outcome = c.handle_action(Action::Select, Millis(0)).unwrap();
        assert_eq!(outcome, Outcome::Notice(Notice::Loaded));
        assert_eq!(c.durations().get(TimedState::Filtration), 360_000);
    }

    #[test]
    fn test_reset_returns_to_main() {
        let mut c = boot();
        c.handle_action(Action::Select, Millis(0)).unwrap();
        c.tick(Millis(0)).unwrap();

        c.handle_action(Action::Right, Millis(10)).unwrap();
        c.handle_action(Action::Select, Millis(10)).unwrap();
        for _ in 0..2 {
            c.handle_action(Action::Left, Millis(10)).unwrap();
        }
        assert_eq!(c.menu_state(), MenuState::Settings(SettingsEntry::Reset));
        let outcome = c.handle_action(Action::Select, Millis(20)).unwrap();
        assert_eq!(outcome, Outcome::Notice(Notice::CycleReset));
        assert!(!c.is_running());
        assert_eq!(c.current(), CycleState::Filtration);
        assert_eq!(c.relay().current, RelayMask::CLOSED);
        assert_eq!(c.menu_state(), MenuState::Main(MainTab::StartStop));
        assert_eq!(c.screen(Millis(30)).lines(), [" Ready", ">Start  Settings"]);
    }
}

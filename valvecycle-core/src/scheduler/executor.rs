//! Valve cycle scheduler
//!
//! Advances the cycle by elapsed time, tracks the pause/resume override,
//! and keeps the failsafe checkpoint in the persistent store in step with
//! the active state.

use crate::persist::PersistentStore;
use crate::state::{CycleState, CycleTable};
use crate::time::Millis;
use crate::traits::{Eeprom, RelayMask, StorageError};

/// Transient execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunContext {
    /// Cycle is running
    pub running: bool,
    /// Active state
    pub current: CycleState,
    /// When the active state's relay mask was applied
    pub state_start: Millis,
    /// Unconsumed time of the active state, captured at stop
    pub remaining_override: Option<u32>,
    /// The active state's relay mask still has to be applied
    pub execute_pending: bool,
}

impl RunContext {
    /// Stopped at the first state with nothing pending
    pub const fn initial() -> Self {
        Self {
            running: false,
            current: CycleState::Filtration,
            state_start: Millis::ZERO,
            remaining_override: None,
            execute_pending: false,
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::initial()
    }
}

/// What a call to [`CycleScheduler::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerEvent {
    /// Pending relay mask applied after start, resume or recovery
    Applied { state: CycleState, mask: RelayMask },
    /// Active state's duration elapsed; moved to the next state
    Advanced {
        from: CycleState,
        to: CycleState,
        mask: RelayMask,
    },
}

/// Result of boot-time crash recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootOutcome {
    /// No in-progress flag; stopped at the first state
    Fresh,
    /// A reset interrupted the cycle; resuming `state`
    Recovered { state: CycleState, crash_count: u16 },
}

/// Cycle scheduler
///
/// Owns the [`RunContext`]. Relay updates are queued and collected with
/// [`CycleScheduler::take_relay_update`] so the output is refreshed even when
/// a checkpoint write fails.
#[derive(Debug, Clone)]
pub struct CycleScheduler {
    ctx: RunContext,
    relay_update: Option<RelayMask>,
}

impl Default for CycleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleScheduler {
    /// Create a stopped scheduler at the first state
    pub const fn new() -> Self {
        Self {
            ctx: RunContext::initial(),
            relay_update: None,
        }
    }

    /// Current run context
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Cycle is running
    pub fn is_running(&self) -> bool {
        self.ctx.running
    }

    /// Active state
    pub fn current(&self) -> CycleState {
        self.ctx.current
    }

    /// Stopped part-way through a state
    pub fn is_paused(&self) -> bool {
        !self.ctx.running && self.ctx.remaining_override.is_some()
    }

    /// Duration governing the active state: the override if set, else nominal
    pub fn active_duration(&self, table: &CycleTable) -> u32 {
        self.ctx
            .remaining_override
            .unwrap_or_else(|| table.duration(self.ctx.current))
    }

    /// Time left in the active state
    pub fn remaining_ms(&self, now: Millis, table: &CycleTable) -> u32 {
        let duration = self.active_duration(table);
        if self.ctx.running && !self.ctx.execute_pending {
            duration.saturating_sub(now.elapsed_since(self.ctx.state_start))
        } else {
            duration
        }
    }

    /// Relay mask queued since the last call, if any
    pub fn take_relay_update(&mut self) -> Option<RelayMask> {
        self.relay_update.take()
    }

    /// Resume after an unexpected reset
    ///
    /// If the store holds an in-progress flag, the matching state is
    /// re-entered from zero elapsed time, the crash counter incremented and
    /// the flag cleared. Any pause override is discarded.
    ///
    /// The flag is cleared last: if a write fails the flag survives and the
    /// next boot recovers again. The context is only replaced once both
    /// writes went through.
    pub fn recover<E: Eeprom>(
        &mut self,
        store: &mut PersistentStore<E>,
    ) -> Result<BootOutcome, StorageError> {
        let Some(group) = store.in_progress()? else {
            return Ok(BootOutcome::Fresh);
        };

        let crash_count = store.record_crash()?;
        store.clear_flag(group)?;

        let state = group.state();
        self.ctx = RunContext {
            running: true,
            current: state,
            state_start: Millis::ZERO,
            remaining_override: None,
            execute_pending: true,
        };
        Ok(BootOutcome::Recovered { state, crash_count })
    }

    /// Start or resume the cycle
    ///
    /// The active state's relay mask is applied on the next
    /// [`advance`](Self::advance).
    pub fn start(&mut self) {
        if self.ctx.running {
            return;
        }
        self.ctx.running = true;
        self.ctx.execute_pending = true;
    }

    /// Stop the cycle, keeping the unconsumed time of the active state
    ///
    /// Queues a closed relay mask and clears every failsafe flag; a clean
    /// stop is not a crash. Returns the captured remaining time.
    pub fn stop<E: Eeprom>(
        &mut self,
        now: Millis,
        table: &CycleTable,
        store: &mut PersistentStore<E>,
    ) -> Result<u32, StorageError> {
        if !self.ctx.running {
            return Ok(self.active_duration(table));
        }

        let remaining = self.remaining_ms(now, table);
        self.ctx.running = false;
        self.ctx.execute_pending = false;
        self.ctx.remaining_override = Some(remaining);
        self.relay_update = Some(RelayMask::CLOSED);

        store.clear_flags()?;
        Ok(remaining)
    }

    /// Return to the initial condition without touching durations
    pub fn reset<E: Eeprom>(&mut self, store: &mut PersistentStore<E>) -> Result<(), StorageError> {
        self.ctx = RunContext::initial();
        self.relay_update = Some(RelayMask::CLOSED);
        store.clear_flags()
    }

    /// Advance by elapsed time
    ///
    /// Applies a pending relay mask first; otherwise moves to the next state
    /// once the active duration has elapsed. Either way the new state's
    /// failsafe group is checkpointed.
    pub fn advance<E: Eeprom>(
        &mut self,
        now: Millis,
        table: &CycleTable,
        store: &mut PersistentStore<E>,
    ) -> Result<Option<SchedulerEvent>, StorageError> {
        if !self.ctx.running {
            return Ok(None);
        }

        if self.ctx.execute_pending {
            let state = self.ctx.current;
            let mask = table.relay_mask(state);
            self.ctx.execute_pending = false;
            self.ctx.state_start = now;
            self.relay_update = Some(mask);

            store.set_exclusive_flag(state.failsafe_group())?;
            return Ok(Some(SchedulerEvent::Applied { state, mask }));
        }

        if !now.has_elapsed(self.ctx.state_start, self.active_duration(table)) {
            return Ok(None);
        }

        let from = self.ctx.current;
        let to = from.next();
        let mask = table.relay_mask(to);
        self.ctx.current = to;
        self.ctx.state_start = now;
        self.ctx.remaining_override = None;
        self.relay_update = Some(mask);

        store.set_exclusive_flag(to.failsafe_group())?;
        Ok(Some(SchedulerEvent::Advanced { from, to, mask }))
    }
}

//! Menu action handling

use super::state::{MainTab, MenuCommand, MenuState, SettingsEntry};
use crate::input::Action;
use crate::state::{Durations, TimedState};

/// Two-level settings menu
///
/// Duration edits are applied live to the [`Durations`] passed into
/// [`handle`](Self::handle); persistence is left to the owner via the
/// returned [`MenuCommand`].
#[derive(Debug, Clone, Default)]
pub struct SettingsMenu {
    state: MenuState,
}

impl SettingsMenu {
    /// Start at the Start/Stop tab
    pub const fn new() -> Self {
        Self {
            state: MenuState::Main(MainTab::StartStop),
        }
    }

    /// Current menu state
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// True while the settings list is open
    pub fn in_settings(&self) -> bool {
        matches!(self.state, MenuState::Settings(_))
    }

    /// Back to the Start/Stop tab
    pub fn return_to_main(&mut self) {
        self.state = MenuState::Main(MainTab::StartStop);
    }

    /// Apply one operator action
    pub fn handle(&mut self, action: Action, durations: &mut Durations) -> Option<MenuCommand> {
        match self.state {
            MenuState::Main(tab) => self.handle_main(tab, action),
            MenuState::Settings(entry) => self.handle_settings(entry, action, durations),
        }
    }

    fn handle_main(&mut self, tab: MainTab, action: Action) -> Option<MenuCommand> {
        match (tab, action) {
            (_, Action::Left | Action::Right) => {
                self.state = MenuState::Main(tab.toggle());
                None
            }
            (MainTab::StartStop, Action::Select) => Some(MenuCommand::ToggleRun),
            (MainTab::Settings, Action::Select) => {
                self.state = MenuState::Settings(SettingsEntry::Return);
                None
            }
        }
    }

    fn handle_settings(
        &mut self,
        entry: SettingsEntry,
        action: Action,
        durations: &mut Durations,
    ) -> Option<MenuCommand> {
        if let SettingsEntry::Duration(phase, edit) = entry {
            if let Some(step) = edit.step_ms() {
                match action {
                    Action::Left | Action::Right => {
                        adjust(durations, phase, step, action);
                        return None;
                    }
                    Action::Select => {}
                }
            }
        }

        match action {
            Action::Left | Action::Right => {
                self.state = MenuState::Settings(entry.step(action.rotation_delta()));
                None
            }
            Action::Select => self.select(entry),
        }
    }

    fn select(&mut self, entry: SettingsEntry) -> Option<MenuCommand> {
        match entry {
            SettingsEntry::Return => {
                self.return_to_main();
                Some(MenuCommand::ExitSettings)
            }
            SettingsEntry::Duration(phase, edit) => {
                self.state = MenuState::Settings(SettingsEntry::Duration(phase, edit.next()));
                None
            }
            SettingsEntry::Save => Some(MenuCommand::Save),
            SettingsEntry::Load => Some(MenuCommand::Load),
            SettingsEntry::Reset => {
                self.return_to_main();
                Some(MenuCommand::Reset)
            }
            SettingsEntry::Failsafe => None,
        }
    }
}

/// Saturating step; LEFT floors at zero, RIGHT clamps at `u32::MAX`
fn adjust(durations: &mut Durations, phase: TimedState, step: u32, action: Action) {
    let value = durations.get_mut(phase);
    *value = match action {
        Action::Right => value.saturating_add(step),
        _ => value.saturating_sub(step),
    };
}

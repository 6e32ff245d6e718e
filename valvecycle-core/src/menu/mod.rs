//! Operator menu
//!
//! Main level: Start/Stop and Settings tabs. Settings level: Return, the
//! four duration editors, Save, Load, Reset and the failsafe counter view.

pub mod settings;
pub mod state;

pub use settings::SettingsMenu;
pub use state::{
    EditState, MainTab, MenuCommand, MenuState, SettingsEntry, MINUTE_STEP_MS, SECOND_STEP_MS,
};

//! Screen rendering
//!
//! Builds the 2x16 character screen shown on the LCD from the menu state
//! and a snapshot of the cycle. The display itself is a passive sink.

use core::fmt::Write;

use heapless::String;

use crate::menu::{EditState, MainTab, MenuState, SettingsEntry};
use crate::state::{CycleState, Durations, TimedState};

/// Display columns
pub const DISPLAY_COLS: usize = 16;
/// Display rows
pub const DISPLAY_ROWS: usize = 2;

/// Line buffer
pub type Line = String<DISPLAY_COLS>;

/// A screen buffer that can be sent to the display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    lines: [Line; DISPLAY_ROWS],
}

impl Screen {
    /// Create an empty screen
    pub const fn new() -> Self {
        Self {
            lines: [String::new(), String::new()],
        }
    }

    /// Clear both lines
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Set a line, truncating to the display width
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            push_truncated(line, text);
        }
    }

    /// Text of a line
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }

    /// Both lines, top first
    pub fn lines(&self) -> [&str; DISPLAY_ROWS] {
        [self.lines[0].as_str(), self.lines[1].as_str()]
    }

    /// Boot splash
    pub fn boot() -> Self {
        let mut screen = Self::new();
        screen.set_line(0, "Initialize...");
        screen
    }

    /// Confirmation message
    pub fn notice(notice: Notice) -> Self {
        let mut screen = Self::new();
        screen.set_line(0, notice.text());
        screen
    }
}

/// Confirmation shown after an explicit settings action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    Saved,
    Loaded,
    CycleReset,
}

impl Notice {
    /// Message text
    pub const fn text(self) -> &'static str {
        match self {
            Notice::Saved => "Settings Saved",
            Notice::Loaded => "Settings Loaded",
            Notice::CycleReset => "Cycle Reset",
        }
    }

    /// How long the message stays up
    pub const fn hold_ms(self) -> u32 {
        match self {
            Notice::Saved | Notice::Loaded => 2000,
            Notice::CycleReset => 1000,
        }
    }
}

/// What the main tabs need to know about the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSnapshot {
    pub running: bool,
    /// Stopped part-way through a state
    pub paused: bool,
    pub current: CycleState,
    /// Time left in the active state
    pub remaining_ms: u32,
}

/// Render the screen for a menu state
pub fn render(
    menu: MenuState,
    run: &RunSnapshot,
    durations: &Durations,
    crash_count: u16,
) -> Screen {
    let mut screen = Screen::new();
    match menu {
        MenuState::Main(tab) => render_main(&mut screen, tab, run),
        MenuState::Settings(entry) => render_settings(&mut screen, entry, durations, crash_count),
    }
    screen
}

fn render_main(screen: &mut Screen, tab: MainTab, run: &RunSnapshot) {
    let mut title = Line::new();
    let _ = title.push(' ');
    if run.running || run.paused {
        push_truncated(&mut title, run.current.name());
    } else {
        let _ = title.push_str("Ready");
    }
    screen.set_line(0, &title);

    if run.running {
        match tab {
            MainTab::StartStop => {
                let mut line = Line::new();
                let _ = write!(line, ">Stop {:>9}s", run.remaining_ms / 1000);
                screen.set_line(1, &line);
            }
            MainTab::Settings => screen.set_line(1, " Stop  >Settings"),
        }
        return;
    }

    let label = match (tab, run.paused) {
        (MainTab::StartStop, true) => ">Resume Settings",
        (MainTab::StartStop, false) => ">Start  Settings",
        (MainTab::Settings, true) => " Resume>Settings",
        (MainTab::Settings, false) => " Start >Settings",
    };
    screen.set_line(1, label);
}

fn render_settings(
    screen: &mut Screen,
    entry: SettingsEntry,
    durations: &Durations,
    crash_count: u16,
) {
    match entry {
        SettingsEntry::Return => screen.set_line(0, ">Return"),
        SettingsEntry::Duration(phase, edit) => render_duration(screen, phase, edit, durations),
        SettingsEntry::Save => screen.set_line(0, ">Save Settings"),
        SettingsEntry::Load => screen.set_line(0, ">Load Settings"),
        SettingsEntry::Reset => screen.set_line(0, ">Reset Cycles"),
        SettingsEntry::Failsafe => {
            screen.set_line(0, ">Failsafe");
            let mut line = Line::new();
            let _ = write!(line, "Crashes: {}", crash_count);
            screen.set_line(1, &line);
        }
    }
}

/// `>Name` over `[>]MM min [>]SS sec`
///
/// Minutes are at least two digits in a three-wide field.
fn render_duration(
    screen: &mut Screen,
    phase: TimedState,
    edit: EditState,
    durations: &Durations,
) {
    let mut title = Line::new();
    let _ = title.push(if edit.is_editing() { ' ' } else { '>' });
    push_truncated(&mut title, phase.name());
    screen.set_line(0, &title);

    let ms = durations.get(phase);
    let minutes = ms / 60_000;
    let seconds = ms / 1000 % 60;

    let mut line = Line::new();
    let _ = line.push(marker(edit == EditState::Minutes));
    if minutes < 100 {
        let _ = write!(line, " {:02}", minutes);
    } else {
        let _ = write!(line, "{}", minutes);
    }
    let _ = line.push_str("min ");
    let _ = line.push(marker(edit == EditState::Seconds));
    let _ = write!(line, "{:02}sec", seconds);
    screen.set_line(1, &line);
}

fn marker(active: bool) -> char {
    if active {
        '>'
    } else {
        ' '
    }
}

fn push_truncated(line: &mut Line, text: &str) {
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
}

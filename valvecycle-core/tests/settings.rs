//! Settings menu behaviour through the controller

mod common;

use common::*;
use valvecycle_core::input::Action;
use valvecycle_core::menu::{EditState, MainTab, MenuState, SettingsEntry};
use valvecycle_core::state::TimedState;
use valvecycle_core::view::Notice;
use valvecycle_core::{Millis, Outcome};

const NOW: Millis = Millis(0);

/// Main menu -> Settings -> Filtration editor, minutes field
fn edit_filtration_minutes(c: &mut TestController) {
    press(c, &[Action::Right, Action::Select, Action::Right, Action::Select], NOW);
    assert_eq!(
        c.menu_state(),
        MenuState::Settings(SettingsEntry::Duration(
            TimedState::Filtration,
            EditState::Minutes
        ))
    );
}

#[test]
fn test_minutes_field_steps() {
    let mut c = boot_fresh();
    edit_filtration_minutes(&mut c);
    press(&mut c, &[Action::Right; 5], NOW);
    assert_eq!(c.durations().get(TimedState::Filtration), 660_000);
}

#[test]
fn test_seconds_field_floors_at_zero() {
    let mut c = boot_fresh();
    edit_filtration_minutes(&mut c);
    // 360 s -> 0 s through the minutes field
    press(&mut c, &[Action::Left; 6], NOW);
    assert_eq!(c.durations().get(TimedState::Filtration), 0);

    press(&mut c, &[Action::Select], NOW);
    press(&mut c, &[Action::Left; 61], NOW);
    assert_eq!(c.durations().get(TimedState::Filtration), 0);
}

#[test]
fn test_edit_screen_marks_field() {
    let mut c = boot_fresh();
    edit_filtration_minutes(&mut c);
    assert_eq!(c.screen(NOW).lines(), [" Filtration", "> 06min  00sec"]);
    press(&mut c, &[Action::Select], NOW);
    assert_eq!(c.screen(NOW).lines(), [" Filtration", "  06min >00sec"]);
    press(&mut c, &[Action::Select], NOW);
    assert_eq!(c.screen(NOW).lines(), [">Filtration", "  06min  00sec"]);
}

#[test]
fn test_save_twice_writes_nothing_the_second_time() {
    let mut c = boot_fresh();
    edit_filtration_minutes(&mut c);
    press(&mut c, &[Action::Right, Action::Select, Action::Select], NOW);
    // Filtration -> Save is four steps right
    press(&mut c, &[Action::Right; 4], NOW);
    assert_eq!(c.menu_state(), MenuState::Settings(SettingsEntry::Save));

    let outcome = c.handle_action(Action::Select, NOW).unwrap();
    assert_eq!(outcome, Outcome::Notice(Notice::Saved));
    let after_first = c.store().eeprom().writes;

    c.handle_action(Action::Select, NOW).unwrap();
    assert_eq!(c.store().eeprom().writes, after_first);
}

#[test]
fn test_return_persists_only_changes() {
    let mut c = boot_fresh();
    press(&mut c, &[Action::Right, Action::Select], NOW);
    let outcome = c.handle_action(Action::Select, NOW).unwrap();
    assert_eq!(outcome, Outcome::Persisted { fields_written: 0 });
    assert_eq!(c.menu_state(), MenuState::Main(MainTab::StartStop));
}

#[test]
fn test_failsafe_view_shows_counter() {
    let mut c = boot_fresh();
    press(&mut c, &[Action::Right, Action::Select, Action::Left], NOW);
    assert_eq!(c.menu_state(), MenuState::Settings(SettingsEntry::Failsafe));
    assert_eq!(
        c.handle_action(Action::Select, NOW).unwrap(),
        Outcome::Navigated
    );
    assert_eq!(c.screen(NOW).lines(), [">Failsafe", "Crashes: 0"]);
}

#[test]
fn test_reset_keeps_durations() {
    let mut c = boot_fresh();
    c.handle_action(Action::Select, NOW).unwrap();
    c.tick(NOW).unwrap();
    edit_filtration_minutes(&mut c);
    press(&mut c, &[Action::Right], NOW);
    press(&mut c, &[Action::Select, Action::Select], NOW);
    // Filtration -> Reset is six steps right
    press(&mut c, &[Action::Right; 6], NOW);

    let outcome = c.handle_action(Action::Select, Millis(100)).unwrap();
    assert_eq!(outcome, Outcome::Notice(Notice::CycleReset));
    assert!(!c.is_running());
    assert_eq!(c.durations().get(TimedState::Filtration), 420_000);
}

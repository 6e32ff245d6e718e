//! Control loop task
//!
//! One iteration, in order: re-render if requested, poll input, dispatch
//! actions, advance the scheduler, drive the button LED, ping the watchdog.
//! Errors are logged and the loop carries on.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Duration, Ticker, Timer};

use valvecycle_core::controller::{ControlError, Outcome};
use valvecycle_core::indicator::RunIndicator;
use valvecycle_core::input::{Action, InputDispatcher, InputSample};
use valvecycle_core::safety::{LoopHealth, WatchdogSupervisor};
use valvecycle_core::scheduler::SchedulerEvent;
use valvecycle_core::view::{Notice, Screen};
use valvecycle_core::Controller;

use crate::board::{self, BoardWatchdog, Eeprom, Relay};
use crate::channels::encoder_position;
use crate::display::LcdSink;

/// Loop period in milliseconds
pub const LOOP_INTERVAL_MS: u64 = 5;

/// Everything the control loop owns
pub struct ControlLoop {
    pub controller: Controller<Eeprom, Relay>,
    pub display: LcdSink,
    pub input: InputDispatcher,
    pub button: Input<'static>,
    pub led: Output<'static>,
    pub indicator: RunIndicator,
    pub supervisor: WatchdogSupervisor<BoardWatchdog>,
}

impl ControlLoop {
    fn sample(&self) -> InputSample {
        InputSample {
            position: encoder_position(),
            button: self.button.is_high(),
        }
    }

    async fn iterate(&mut self) {
        let now = board::now();

        if self.controller.take_render_request() {
            let screen = self.controller.screen(now);
            self.display.show(&screen);
        }

        let actions = self.input.poll(self.sample(), now);
        for action in actions {
            self.dispatch(action).await;
        }

        match self.controller.tick(board::now()) {
            Ok(Some(event)) => log_event(&event),
            Ok(None) => {}
            Err(e) => log_error("tick", e),
        }

        if let Some(lit) = self.indicator.update(self.controller.is_running(), board::now()) {
            self.led.set_level(lit.into());
        }

        if let LoopHealth::Late { gap_ms } = self.supervisor.ping(board::now()) {
            warn!("Control loop late: {}ms since last ping", gap_ms);
        }
    }

    async fn dispatch(&mut self, action: Action) {
        debug!("Action {:?} in {:?}", action, self.controller.menu_state());

        match self.controller.handle_action(action, board::now()) {
            Ok(Outcome::Navigated) => {}
            Ok(Outcome::Started) => {
                info!("Cycle started in {:?}", self.controller.current());
            }
            Ok(Outcome::Stopped { remaining_ms }) => {
                info!(
                    "Cycle stopped in {:?}, {}ms remaining",
                    self.controller.current(),
                    remaining_ms
                );
            }
            Ok(Outcome::Persisted { fields_written }) => {
                info!("Durations persisted ({} fields written)", fields_written);
            }
            Ok(Outcome::Notice(notice)) => {
                match notice {
                    Notice::Saved => info!("Settings saved"),
                    Notice::Loaded => info!("Settings loaded: {:?}", self.controller.durations()),
                    Notice::CycleReset => info!("Cycle reset"),
                }
                self.hold_notice(notice).await;
            }
            Err(e) => log_error("action", e),
        }
    }

    /// Show a confirmation for its fixed hold time
    async fn hold_notice(&mut self, notice: Notice) {
        self.display.show(&Screen::notice(notice));
        self.supervisor.ping(board::now());
        Timer::after_millis(u64::from(notice.hold_ms())).await;
        self.controller.request_render();
    }
}

fn log_event(event: &SchedulerEvent) {
    match event {
        SchedulerEvent::Applied { state, mask } => {
            info!("Entered {:?} (relays {:?})", state, mask);
        }
        SchedulerEvent::Advanced { from, to, mask } => {
            info!("{:?} -> {:?} (relays {:?})", from, to, mask);
        }
    }
}

fn log_error(context: &str, e: ControlError) {
    match e {
        ControlError::Storage(e) => warn!("{}: storage error {:?}", context, e),
        ControlError::Relay(e) => warn!("{}: relay error {:?}", context, e),
    }
}

/// Control task
#[embassy_executor::task]
pub async fn control_task(mut control: ControlLoop) {
    info!("Control task started");

    control.controller.request_render();
    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));

    loop {
        control.iterate().await;
        ticker.next().await;
    }
}

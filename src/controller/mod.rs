//! The timer controller: owns the countdown and session-transition logic.
//!
//! Runs as a background tokio task. Commands arrive over an unbounded
//! channel (fire-and-forget, no reply); while the countdown is running a
//! 1-second interval drives ticks. Every transition is written through the
//! shared store, which persists it and notifies subscribers.

use crate::config::AppConfig;
use crate::model::{BREAK_MINUTES, MAX_WORK_MINUTES, MIN_WORK_MINUTES};
use crate::notify;
use crate::store::Store;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval_at, Instant, Interval};
use tracing::{debug, info};

/// A user intent forwarded from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    IncreaseTime,
    DecreaseTime,
}

/// Produced when a countdown crosses zero and the session flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChange {
    /// Session type being entered.
    pub is_work_session: bool,
    /// Configured work length at the moment of the flip.
    pub work_minutes: u32,
}

const TICK: Duration = Duration::from_secs(1);

/// Command and tick handling, separated from the async driver so the state
/// machine can be exercised directly.
pub struct TimerController {
    store: Store,
    ticking: bool,
}

impl TimerController {
    pub fn new(store: Store) -> Self {
        // The store normalizes to paused on load, so no tick is pending yet.
        Self {
            store,
            ticking: false,
        }
    }

    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::IncreaseTime => self.adjust_work_minutes(1),
            Command::DecreaseTime => self.adjust_work_minutes(-1),
        }
    }

    fn start(&mut self) {
        self.store.set_running(true);
        self.ticking = true;
    }

    fn pause(&mut self) {
        self.store.set_running(false);
        self.ticking = false;
    }

    fn reset(&mut self) {
        self.ticking = false;
        self.store.apply(|record| {
            record.timer = record.work_minutes as u64 * 60;
            record.is_running = false;
            // Reset always previews the upcoming work session.
            record.is_work_session = true;
        });
    }

    /// Adjust the configured work length by `delta` minutes, clamped to the
    /// valid range. Ignored while the countdown is running. Editing the work
    /// length always previews it as an upcoming work session, discarding any
    /// in-progress break countdown.
    fn adjust_work_minutes(&mut self, delta: i64) {
        if self.store.is_running() {
            debug!("ignoring work length adjustment while running");
            return;
        }
        let minutes = (self.store.work_minutes() as i64 + delta)
            .clamp(MIN_WORK_MINUTES as i64, MAX_WORK_MINUTES as i64) as u32;
        self.store.apply(|record| {
            record.work_minutes = minutes;
            record.timer = minutes as u64 * 60;
            record.is_work_session = true;
        });
    }

    /// One simulated second. Returns the session change when this tick
    /// exhausts the countdown; the next session starts paused and does not
    /// auto-start.
    pub fn handle_tick(&mut self) -> Option<SessionChange> {
        let remaining = self.store.timer();
        if remaining > 1 {
            self.store.set_timer(remaining - 1);
            return None;
        }

        self.ticking = false;
        let work_minutes = self.store.work_minutes();
        let entering_work = !self.store.is_work_session();
        let next_length = if entering_work {
            work_minutes as u64 * 60
        } else {
            BREAK_MINUTES as u64 * 60
        };
        info!(entering_work, "session boundary reached");
        self.store.apply(|record| {
            record.is_work_session = entering_work;
            record.timer = next_length;
            record.is_running = false;
        });
        Some(SessionChange {
            is_work_session: entering_work,
            work_minutes,
        })
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }
}

/// Drive the controller until the command channel closes.
pub async fn run(store: Store, config: AppConfig, mut commands: UnboundedReceiver<Command>) {
    info!("timer controller started");
    let mut controller = TimerController::new(store);
    let mut ticker: Option<Interval> = None;

    loop {
        // Keep the interval in step with the running flag. A fresh interval
        // fires its first tick one full second from now.
        if controller.is_ticking() && ticker.is_none() {
            ticker = Some(interval_at(Instant::now() + TICK, TICK));
        } else if !controller.is_ticking() {
            ticker = None;
        }

        let command = match ticker.as_mut() {
            Some(interval) => tokio::select! {
                _ = interval.tick() => {
                    if let Some(change) = controller.handle_tick() {
                        notify::session_change(&change, &config);
                    }
                    continue;
                }
                command = commands.recv() => command,
            },
            None => commands.recv().await,
        };

        match command {
            Some(command) => {
                debug!(?command, "command received");
                controller.handle_command(command);
            }
            None => break,
        }
    }
    info!("timer controller stopped");
}

//src/clock.rs
//! Second-granularity clocks driven by the caller's event loop.
//!
//! Nothing here spawns threads or sleeps: the owner passes `Instant`s in and
//! calls `poll` whenever it wakes up. Each clock owns a `Ticker` that is armed
//! or cancelled purely from the clock's own flags, so there is never more than
//! one pending schedule per clock.
use std::time::{Duration, Instant};
use strum_macros::Display;

pub const TICK: Duration = Duration::from_secs(1);
pub const DEFAULT_REST_SECONDS: u64 = 60;

/// A cancellable repeating one-second schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticker {
    next_due: Option<Instant>,
}

impl Ticker {
    /// Arms the ticker with its first tick one period after `now`.
    /// Arming an already armed ticker keeps the existing schedule.
    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + TICK);
        }
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub const fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns how many ticks fell due up to `now` and moves the schedule forward.
    pub fn poll(&mut self, now: Instant) -> u64 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let fired = now.duration_since(due).as_secs() + 1;
        self.next_due = Some(due + TICK * u32::try_from(fired).unwrap_or(u32::MAX));
        fired
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ClockStatus {
    #[strum(to_string = "Tap to Begin")]
    NotStarted,
    #[strum(to_string = "Session Active")]
    Running,
    #[strum(to_string = "Session Paused")]
    Paused,
}

/// Elapsed workout time. Only advances while started and running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutClock {
    started: bool,
    running: bool,
    elapsed_seconds: u64,
    ticker: Ticker,
}

impl WorkoutClock {
    /// Marks the workout started and running.
    pub fn start(&mut self, now: Instant) {
        self.started = true;
        self.running = true;
        self.sync_ticker(now);
    }

    /// Starts the workout if needed, otherwise flips between running and paused.
    pub fn toggle(&mut self, now: Instant) {
        if self.started {
            self.running = !self.running;
            self.sync_ticker(now);
        } else {
            self.start(now);
        }
    }

    fn sync_ticker(&mut self, now: Instant) {
        if self.started && self.running {
            self.ticker.arm(now);
        } else {
            self.ticker.cancel();
        }
    }

    /// One elapsed second. Ignored unless the clock is running.
    pub fn tick(&mut self) {
        if self.started && self.running {
            self.elapsed_seconds += 1;
        }
    }

    /// Applies every tick due by `now`.
    pub fn poll(&mut self, now: Instant) {
        for _ in 0..self.ticker.poll(now) {
            self.tick();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub const fn status(&self) -> ClockStatus {
        match (self.started, self.running) {
            (false, _) => ClockStatus::NotStarted,
            (true, true) => ClockStatus::Running,
            (true, false) => ClockStatus::Paused,
        }
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Whole minutes elapsed.
    pub const fn minutes(&self) -> u64 {
        self.elapsed_seconds / 60
    }

    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }
}

/// Countdown between sets. Starting a new rest replaces the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestClock {
    active: bool,
    remaining_seconds: u64,
    duration_seconds: u64,
    ticker: Ticker,
}

impl RestClock {
    /// Begins a fresh countdown of `duration_seconds`, abandoning any rest in progress.
    /// A zero duration leaves the clock inactive.
    pub fn start(&mut self, duration_seconds: u64, now: Instant) {
        self.ticker.cancel();
        self.duration_seconds = duration_seconds;
        self.remaining_seconds = duration_seconds;
        self.active = duration_seconds > 0;
        if self.active {
            self.ticker.arm(now);
        }
    }

    /// One elapsed second. Expires the rest when it reaches zero.
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.active = false;
            self.ticker.cancel();
        }
    }

    pub fn poll(&mut self, now: Instant) {
        for _ in 0..self.ticker.poll(now) {
            if !self.active {
                break;
            }
            self.tick();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Length of the rest most recently started.
    pub const fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }
}

/// Transient "workout complete" flag. Every trigger schedules its own hide;
/// later triggers never cancel an earlier one, so the first due hide wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Celebration {
    visible: bool,
    pending_hides: Vec<Instant>,
}

impl Celebration {
    /// Shows the celebration and schedules a hide at `now + window`.
    pub fn trigger(&mut self, now: Instant, window: Duration) {
        self.visible = true;
        self.pending_hides.push(now + window);
    }

    /// Fires every hide due by `now`.
    pub fn poll(&mut self, now: Instant) {
        let before = self.pending_hides.len();
        self.pending_hides.retain(|&hide_at| now < hide_at);
        if self.pending_hides.len() < before {
            self.visible = false;
        }
    }

    pub fn reset(&mut self) {
        self.visible = false;
        self.pending_hides.clear();
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Formats seconds as `MM:SS` (minutes keep growing past 99).
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

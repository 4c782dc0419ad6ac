//src/session.rs
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::catalog::{Catalog, Error as CatalogError, ExerciseKey};
use crate::clock::{Celebration, RestClock, WorkoutClock, DEFAULT_REST_SECONDS};
use crate::completion::{CompletionTracker, SetCursor};
use crate::gateway::Error as GatewayError;
use crate::tip::{TipRequest, TipSession, TipState};

/// Timing knobs for a session (see `Config::session_settings`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Rest started automatically when an exercise is marked complete
    pub completion_rest_seconds: u64,
    /// Rest used when none is specified
    pub default_rest_seconds: u64,
    /// How long the completion celebration stays up
    pub celebration: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            completion_rest_seconds: 90,
            default_rest_seconds: DEFAULT_REST_SECONDS,
            celebration: Duration::from_millis(4500),
        }
    }
}

/// All mutable state of one workout, owned by whoever drives the event loop.
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    catalog: Arc<Catalog>,
    settings: SessionSettings,
    tips_available: bool,
    completion: CompletionTracker,
    set_cursor: SetCursor,
    workout_clock: WorkoutClock,
    rest_clock: RestClock,
    celebration: Celebration,
    tip: TipSession,
}

impl WorkoutSession {
    pub fn new(catalog: Arc<Catalog>, settings: SessionSettings) -> Self {
        Self {
            catalog,
            settings,
            tips_available: false,
            completion: CompletionTracker::default(),
            set_cursor: SetCursor::default(),
            workout_clock: WorkoutClock::default(),
            rest_clock: RestClock::default(),
            celebration: Celebration::default(),
            tip: TipSession::default(),
        }
    }

    /// Records whether a text generation gateway was configured at start-up.
    #[must_use]
    pub fn with_tips_available(mut self, available: bool) -> Self {
        self.tips_available = available;
        self
    }

    // --- Completion ---

    /// Flips completion of the exercise at `key`. Returns `true` if it is now complete.
    ///
    /// Marking complete also starts the post-exercise rest, clears a tip shown
    /// for the same exercise, and raises the celebration once every exercise is done.
    /// # Errors
    /// Returns `CatalogError::UnknownExercise` if `key` is not in the catalog.
    pub fn toggle_complete(&mut self, key: &ExerciseKey, now: Instant) -> Result<bool, CatalogError> {
        let name = self.catalog.require(key)?.name.clone();

        if !self.completion.toggle(key) {
            debug!("Exercise {} ({}) marked incomplete", key, name);
            return Ok(false);
        }

        info!("Exercise {} ({}) marked complete", key, name);
        self.rest_clock
            .start(self.settings.completion_rest_seconds, now);
        self.tip.clear_for(&name);

        let total = self.catalog.total_exercises();
        if total > 0 && self.completion.len() == total {
            info!("All {} exercises complete", total);
            self.celebration.trigger(now, self.settings.celebration);
        }
        Ok(true)
    }

    pub fn is_complete(&self, key: &ExerciseKey) -> bool {
        self.completion.is_complete(key)
    }

    pub fn completed_count(&self) -> usize {
        self.completion.len()
    }

    pub fn completion_percentage(&self) -> u8 {
        self.completion.percentage(self.catalog.total_exercises())
    }

    // --- Set cursor ---

    pub fn current_set(&self, key: &ExerciseKey) -> u32 {
        self.set_cursor.current(key)
    }

    /// Stores `set_number` verbatim.
    pub fn set_current_set(&mut self, key: &ExerciseKey, set_number: u32) {
        self.set_cursor.set_current(key, set_number);
    }

    /// Steps back one set, never below 1.
    /// # Errors
    /// Returns `CatalogError::UnknownExercise` if `key` is not in the catalog.
    pub fn previous_set(&mut self, key: &ExerciseKey) -> Result<u32, CatalogError> {
        self.catalog.require(key)?;
        let set_number = self.current_set(key).saturating_sub(1).max(1);
        self.set_current_set(key, set_number);
        Ok(set_number)
    }

    /// Steps forward one set, never past the exercise's set count.
    /// # Errors
    /// Returns `CatalogError::UnknownExercise` if `key` is not in the catalog.
    pub fn next_set(&mut self, key: &ExerciseKey) -> Result<u32, CatalogError> {
        let sets = self.catalog.require(key)?.sets;
        let set_number = self.current_set(key).saturating_add(1).min(sets);
        self.set_current_set(key, set_number);
        Ok(set_number)
    }

    // --- Clocks ---

    pub fn start_workout(&mut self, now: Instant) {
        self.workout_clock.start(now);
    }

    pub fn toggle_workout(&mut self, now: Instant) {
        self.workout_clock.toggle(now);
        debug!("Workout clock is now {:?}", self.workout_clock.status());
    }

    pub fn start_rest(&mut self, duration_seconds: u64, now: Instant) {
        debug!("Rest started for {}s", duration_seconds);
        self.rest_clock.start(duration_seconds, now);
    }

    pub fn start_default_rest(&mut self, now: Instant) {
        self.start_rest(self.settings.default_rest_seconds, now);
    }

    /// Fires every clock tick due by `now` and expires the celebration.
    pub fn poll(&mut self, now: Instant) {
        self.workout_clock.poll(now);
        self.rest_clock.poll(now);
        self.celebration.poll(now);
    }

    // --- Tips ---

    pub const fn tips_available(&self) -> bool {
        self.tips_available
    }

    /// See `TipSession::request`. A returned request must be sent to the gateway
    /// and its outcome passed to `resolve_tip`.
    pub fn request_tip(&mut self, exercise: &str) -> Option<TipRequest> {
        self.tip.request(exercise, self.tips_available)
    }

    pub fn retry_tip(&mut self, exercise: &str) -> Option<TipRequest> {
        self.tip.retry(exercise, self.tips_available)
    }

    pub fn dismiss_tip(&mut self) {
        self.tip.dismiss();
    }

    /// Applies a gateway outcome; `false` if the request had been superseded.
    pub fn resolve_tip(&mut self, request: &TipRequest, result: Result<String, GatewayError>) -> bool {
        self.tip.resolve(request, result)
    }

    pub const fn tip(&self) -> &TipState {
        self.tip.state()
    }

    // --- Reset ---

    /// Restores every piece of session state to its initial value.
    pub fn reset_all(&mut self) {
        info!("Resetting workout session");
        self.completion.clear();
        self.set_cursor.clear();
        self.workout_clock.reset();
        self.rest_clock.reset();
        self.celebration.reset();
        self.tip.reset();
    }

    // --- Accessors ---

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub const fn workout_clock(&self) -> &WorkoutClock {
        &self.workout_clock
    }

    pub const fn rest_clock(&self) -> &RestClock {
        &self.rest_clock
    }

    pub const fn is_celebrating(&self) -> bool {
        self.celebration.is_visible()
    }

    pub const fn completion(&self) -> &CompletionTracker {
        &self.completion
    }

    pub const fn set_cursor(&self) -> &SetCursor {
        &self.set_cursor
    }
}

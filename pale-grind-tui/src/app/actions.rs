// src/app/actions.rs
use super::navigation_helpers::select_row;
use super::state::{App, Row, TipOutcome};
use anyhow::Result;
use pale_grind_lib::{ExerciseKey, TipRequest, TipState};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

const SHARE_MESSAGE: &str = "Share feature coming soon!";

impl App {
    /// Enter on a row: sections expand/collapse, exercises toggle completion.
    pub fn activate_selected(&mut self, now: Instant) -> Result<()> {
        match self.selected_row() {
            Some(Row::Section(index)) => self.toggle_section(index),
            Some(Row::Exercise(key)) => self.toggle_complete(&key, now)?,
            None => {}
        }
        Ok(())
    }

    /// Accordion: opening one section closes whichever was open.
    pub fn toggle_section(&mut self, index: usize) {
        let Some(section) = self.session.catalog().sections().get(index) else {
            return;
        };
        let id = section.id.clone();
        if self.expanded_section.as_deref() == Some(id.as_str()) {
            self.expanded_section = None;
        } else {
            self.expanded_section = Some(id);
        }
        select_row(self, &Row::Section(index));
    }

    pub fn toggle_complete_selected(&mut self, now: Instant) -> Result<()> {
        if let Some(key) = self.selected_exercise() {
            self.toggle_complete(&key, now)?;
        }
        Ok(())
    }

    fn toggle_complete(&mut self, key: &ExerciseKey, now: Instant) -> Result<()> {
        if self.session.toggle_complete(key, now)? {
            // The tip was cleared along with the completion
            self.tip_scroll = 0;
        }
        Ok(())
    }

    /// Moves the selected exercise's set cursor by one in either direction.
    pub fn step_set(&mut self, forward: bool) -> Result<()> {
        let Some(key) = self.selected_exercise() else {
            return Ok(());
        };
        if self.session.is_complete(&key) {
            return Ok(());
        }
        let set_number = if forward {
            self.session.next_set(&key)?
        } else {
            self.session.previous_set(&key)?
        };
        debug!("Set cursor for {} is now {}", key, set_number);
        Ok(())
    }

    pub fn toggle_workout(&mut self, now: Instant) {
        self.session.toggle_workout(now);
    }

    /// Starts the rest preset at `slot` (0-based) from the configuration.
    pub fn start_rest_preset(&mut self, slot: usize, now: Instant) {
        match self.service.config.rest_presets.get(slot).copied() {
            Some(seconds) => self.session.start_rest(seconds, now),
            None => self.set_error(format!("No rest preset #{}", slot + 1)),
        }
    }

    pub fn start_default_rest(&mut self, now: Instant) {
        self.session.start_default_rest(now);
    }

    /// `t`: retries a failed tip for the exercise it failed on, otherwise
    /// asks for (or collapses) the tip of the selected exercise.
    pub fn tip_key(&mut self) {
        let failed = match self.session.tip() {
            TipState::Failed { exercise, .. } => Some(exercise.clone()),
            _ => None,
        };
        match failed {
            Some(exercise) => self.retry_tip(&exercise),
            None => self.request_tip_selected(),
        }
    }

    fn retry_tip(&mut self, exercise: &str) {
        self.tip_scroll = 0;
        if let Some(request) = self.session.retry_tip(exercise) {
            self.spawn_tip_fetch(request);
        }
    }

    pub fn request_tip_selected(&mut self) {
        let Some(key) = self.selected_exercise() else {
            return;
        };
        if self.session.is_complete(&key) {
            self.set_info("Exercise already complete");
            return;
        }
        let Some(name) = self.session.catalog().exercise(&key).map(|e| e.name.clone()) else {
            return;
        };
        self.tip_scroll = 0;
        if let Some(request) = self.session.request_tip(&name) {
            self.spawn_tip_fetch(request);
        }
    }

    pub fn dismiss_tip(&mut self) {
        self.session.dismiss_tip();
        self.tip_scroll = 0;
    }

    pub fn scroll_tip(&mut self, down: bool) {
        self.tip_scroll = if down {
            self.tip_scroll.saturating_add(3)
        } else {
            self.tip_scroll.saturating_sub(3)
        };
    }

    // The gateway call blocks, so it runs off the event-loop thread
    fn spawn_tip_fetch(&self, request: TipRequest) {
        let Some(gateway) = self.service.gateway() else {
            warn!("Tip requested without a configured gateway");
            return;
        };
        let tx = self.tip_tx.clone();
        info!("Fetching tip for '{}' (generation {})", request.exercise, request.generation);
        thread::spawn(move || {
            let result = gateway.generate(&request.prompt);
            // Receiver only goes away when the app is shutting down
            let _ = tx.send(TipOutcome { request, result });
        });
    }

    pub fn reset_all(&mut self) {
        self.session.reset_all();
        self.expanded_section = None;
        self.tip_scroll = 0;
        self.row_state.select(Some(0));
        self.set_info("Workout reset");
    }

    pub fn share(&mut self) {
        self.set_info(SHARE_MESSAGE);
    }
}

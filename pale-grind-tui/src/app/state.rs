//src/app/state.rs
use anyhow::{Context, Result};
use ratatui::widgets::ListState;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use pale_grind_lib::{AppService, ExerciseKey, GatewayError, TipRequest, WorkoutSession};

const MESSAGE_LIFETIME: Duration = Duration::from_secs(5);

// Represents the state of active modals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
    ConfirmReset,
}

/// One line of the section accordion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Section(usize),
    Exercise(ExerciseKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: MessageLevel,
}

/// A finished gateway call, sent back from the worker thread.
pub struct TipOutcome {
    pub request: TipRequest,
    pub result: Result<String, GatewayError>,
}

// Holds the application state
pub struct App {
    pub service: AppService,
    pub session: WorkoutSession,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub status_message: Option<StatusMessage>, // For the status bar
    pub message_clear_time: Option<Instant>,

    // === Accordion ===
    pub expanded_section: Option<String>,
    pub row_state: ListState,

    // === Tip panel ===
    pub tip_scroll: u16,
    pub tip_tx: Sender<TipOutcome>,
    pub tip_rx: Receiver<TipOutcome>,
}

impl App {
    /// # Errors
    /// Fails if the configured session settings are unusable.
    pub fn new(service: AppService) -> Result<Self> {
        let session = service
            .new_session()
            .context("Invalid rest settings in configuration")?;
        let (tip_tx, tip_rx) = mpsc::channel();
        let mut app = Self {
            service,
            session,
            should_quit: false,
            active_modal: ActiveModal::None,
            status_message: None,
            message_clear_time: None,
            expanded_section: None,
            row_state: ListState::default(),
            tip_scroll: 0,
            tip_tx,
            tip_rx,
        };
        app.row_state.select(Some(0));
        Ok(app)
    }

    /// Rows currently shown: every section header, plus the exercises of the
    /// expanded section right below it.
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (i, section) in self.session.catalog().sections().iter().enumerate() {
            rows.push(Row::Section(i));
            if self.expanded_section.as_deref() == Some(section.id.as_str()) {
                rows.extend(
                    (0..section.exercises.len())
                        .map(|idx| Row::Exercise(ExerciseKey::new(section.id.as_str(), idx))),
                );
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<Row> {
        let rows = self.visible_rows();
        self.row_state.selected().and_then(|i| rows.get(i).cloned())
    }

    pub fn selected_exercise(&self) -> Option<ExerciseKey> {
        match self.selected_row()? {
            Row::Exercise(key) => Some(key),
            Row::Section(_) => None,
        }
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.set_message(msg.into(), MessageLevel::Error);
    }

    pub fn set_info(&mut self, msg: impl Into<String>) {
        self.set_message(msg.into(), MessageLevel::Info);
    }

    fn set_message(&mut self, text: String, level: MessageLevel) {
        self.status_message = Some(StatusMessage { text, level });
        self.message_clear_time = Some(Instant::now() + MESSAGE_LIFETIME);
    }

    // Called once per loop iteration
    pub(crate) fn clear_expired_message(&mut self, now: Instant) {
        if let Some(clear_time) = self.message_clear_time {
            if now >= clear_time {
                self.status_message = None;
                self.message_clear_time = None;
            }
        }
    }

    /// Advances every clock, applies finished tip fetches, and expires the status message.
    pub fn on_tick(&mut self, now: Instant) {
        self.session.poll(now);
        while let Ok(outcome) = self.tip_rx.try_recv() {
            if self.session.resolve_tip(&outcome.request, outcome.result) {
                self.tip_scroll = 0;
            }
        }
        self.clear_expired_message(now);
    }
}

//src/tip.rs
//! Lifecycle of the single exercise tip shown at a time.
//!
//! Every request is stamped with a generation number. Anything that changes
//! what the tip area should show (a newer request, dismissal, completion of the
//! target exercise, a reset) bumps the generation, so a response that arrives
//! late for an abandoned request is dropped instead of overwriting newer state.
use thiserror::Error;
use tracing::{debug, warn};

use crate::gateway::Error as GatewayError;

/// User-facing reasons a tip could not be shown.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipFailure {
    #[error("API key not configured. Cannot fetch tips.")]
    NotConfigured,
    #[error("API Key is not valid. Please check your configuration.")]
    InvalidApiKey,
    #[error("API quota exceeded. Please check your Gemini project quotas.")]
    QuotaExceeded,
    #[error("Sorry, couldn't fetch tips for this exercise. Please try again.")]
    Generic,
}

impl TipFailure {
    /// Classifies a gateway error message (case-insensitive substring match).
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("api key not valid") {
            Self::InvalidApiKey
        } else if message.contains("quota") {
            Self::QuotaExceeded
        } else {
            Self::Generic
        }
    }
}

impl From<&GatewayError> for TipFailure {
    fn from(error: &GatewayError) -> Self {
        Self::classify(&error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TipState {
    #[default]
    Idle,
    Loading {
        exercise: String,
    },
    Loaded {
        exercise: String,
        content: String,
    },
    Failed {
        exercise: String,
        failure: TipFailure,
    },
}

impl TipState {
    /// Exercise the tip area belongs to, `None` when nothing is shown.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { exercise }
            | Self::Loaded { exercise, .. }
            | Self::Failed { exercise, .. } => Some(exercise.as_str()),
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Loaded { content, .. } => Some(content.as_str()),
            _ => None,
        }
    }

    pub const fn failure(&self) -> Option<TipFailure> {
        match self {
            Self::Failed { failure, .. } => Some(*failure),
            _ => None,
        }
    }
}

/// A fetch the caller must perform against the gateway and hand back to
/// `TipSession::resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRequest {
    pub generation: u64,
    pub exercise: String,
    pub prompt: String,
}

/// Prompt asking for benefits, execution tips and common mistakes, in markdown.
pub fn tip_prompt(exercise_name: &str) -> String {
    format!(
        r####"Provide helpful information for the exercise: "{exercise_name}".
Please include:
1.  Key benefits.
2.  Step-by-step execution tips (if applicable).
3.  Common mistakes to avoid.

Use Markdown for formatting: use headings (e.g., "### Key Benefits"), bullet points (* or -), and bold text where appropriate. Keep the response concise and easy to read."####
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TipSession {
    state: TipState,
    generation: u64,
}

impl TipSession {
    pub const fn state(&self) -> &TipState {
        &self.state
    }

    fn transition(&mut self, state: TipState) {
        self.generation += 1;
        debug!(generation = self.generation, ?state, "tip state change");
        self.state = state;
    }

    /// Asks for a tip on `exercise`.
    ///
    /// - Gateway unavailable: fails immediately with `TipFailure::NotConfigured`.
    /// - The same exercise's tip is already loaded: collapses back to idle.
    /// - Otherwise: enters `Loading` and returns the request to perform.
    pub fn request(&mut self, exercise: &str, gateway_available: bool) -> Option<TipRequest> {
        if !gateway_available {
            self.transition(TipState::Failed {
                exercise: exercise.to_string(),
                failure: TipFailure::NotConfigured,
            });
            return None;
        }

        if matches!(&self.state, TipState::Loaded { exercise: shown, .. } if shown == exercise) {
            self.transition(TipState::Idle);
            return None;
        }

        self.transition(TipState::Loading {
            exercise: exercise.to_string(),
        });
        Some(TipRequest {
            generation: self.generation,
            exercise: exercise.to_string(),
            prompt: tip_prompt(exercise),
        })
    }

    /// Same as `request`; used from the failure view.
    pub fn retry(&mut self, exercise: &str, gateway_available: bool) -> Option<TipRequest> {
        self.request(exercise, gateway_available)
    }

    pub fn dismiss(&mut self) {
        self.transition(TipState::Idle);
    }

    /// Clears the tip if it belongs to `exercise`. Returns whether anything changed.
    pub fn clear_for(&mut self, exercise: &str) -> bool {
        if self.state.target() == Some(exercise) {
            self.transition(TipState::Idle);
            true
        } else {
            false
        }
    }

    /// Commits a gateway result if `request` is still the current one.
    /// Returns `false` when the result was stale and discarded.
    pub fn resolve(&mut self, request: &TipRequest, result: Result<String, GatewayError>) -> bool {
        let current = request.generation == self.generation
            && matches!(&self.state, TipState::Loading { exercise } if *exercise == request.exercise);
        if !current {
            debug!(
                generation = request.generation,
                current = self.generation,
                exercise = %request.exercise,
                "discarding stale tip response"
            );
            return false;
        }

        let next = match result {
            Ok(content) => TipState::Loaded {
                exercise: request.exercise.clone(),
                content,
            },
            Err(error) => {
                warn!("Error fetching exercise tip for '{}': {}", request.exercise, error);
                TipState::Failed {
                    exercise: request.exercise.clone(),
                    failure: TipFailure::from(&error),
                }
            }
        };
        self.transition(next);
        true
    }

    pub fn reset(&mut self) {
        self.transition(TipState::Idle);
    }
}

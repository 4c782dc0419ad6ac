//src/completion.rs
use std::collections::{BTreeSet, HashMap};

use crate::catalog::ExerciseKey;

/// Set of exercises marked complete in the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionTracker {
    completed: BTreeSet<ExerciseKey>,
}

impl CompletionTracker {
    /// Flips membership of `key`. Returns `true` if the exercise is now complete.
    pub fn toggle(&mut self, key: &ExerciseKey) -> bool {
        if self.completed.remove(key) {
            false
        } else {
            self.completed.insert(key.clone());
            true
        }
    }

    pub fn is_complete(&self, key: &ExerciseKey) -> bool {
        self.completed.contains(key)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }

    /// Rounded share of `total` that is complete, 0 when `total` is 0.
    pub fn percentage(&self, total: usize) -> u8 {
        completion_percentage(self.len(), total)
    }
}

/// `round(100 * completed / total)` in integer arithmetic (halves round up).
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    let pct = (200 * completed + total) / (2 * total);
    u8::try_from(pct).unwrap_or(100)
}

/// Current set number per exercise, 1-indexed. Values are stored as given;
/// clamping against the exercise's set count is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetCursor {
    current: HashMap<ExerciseKey, u32>,
}

impl SetCursor {
    pub fn set_current(&mut self, key: &ExerciseKey, set_number: u32) {
        self.current.insert(key.clone(), set_number);
    }

    /// Defaults to 1 for exercises never touched.
    pub fn current(&self, key: &ExerciseKey) -> u32 {
        self.current.get(key).copied().unwrap_or(1)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn clear(&mut self) {
        self.current.clear();
    }
}

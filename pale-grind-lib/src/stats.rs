//src/stats.rs
// Derived view state, recomputed from the session on every read.
use crate::catalog::ExerciseKey;
use crate::session::WorkoutSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
    pub minutes: u64,
    pub categories: usize,
    pub workout_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProgress {
    pub section_id: String,
    pub title: String,
    pub completed: usize,
    pub total: usize,
}

impl SectionProgress {
    pub const fn is_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl WorkoutSession {
    pub fn stats(&self) -> SessionStats {
        let completed = self.completed_count();
        let total = self.catalog().total_exercises();
        SessionStats {
            completed,
            total,
            percentage: self.completion_percentage(),
            minutes: self.workout_clock().minutes(),
            categories: self.catalog().sections().len(),
            workout_complete: total > 0 && completed == total,
        }
    }

    /// Completed/total counts for every section, in catalog order.
    pub fn section_progress(&self) -> Vec<SectionProgress> {
        self.catalog()
            .sections()
            .iter()
            .map(|section| SectionProgress {
                section_id: section.id.clone(),
                title: section.title.clone(),
                completed: (0..section.exercises.len())
                    .filter(|&i| self.is_complete(&ExerciseKey::new(section.id.as_str(), i)))
                    .count(),
                total: section.exercises.len(),
            })
            .collect()
    }
}

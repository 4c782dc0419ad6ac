//src/catalog.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error reading catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Duplicate section id in catalog: '{0}'")]
    DuplicateSectionId(String),
    #[error("Section id must not be empty (section titled '{0}')")]
    EmptySectionId(String),
    #[error("Exercise '{exercise}' in section '{section_id}' must have at least one set")]
    ZeroSets { section_id: String, exercise: String },
    #[error("No exercise at {0} in the catalog")]
    UnknownExercise(ExerciseKey),
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Rep prescription: a plain count or a free-form range such as "8-15".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Range(String),
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Range(range) => f.write_str(range),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: Reps,
    pub weight: String,
    pub difficulty: Difficulty,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub icon: String,
    /// Color name understood by `parse_color`
    #[serde(default = "default_section_color")]
    pub color: String,
    pub exercises: Vec<Exercise>,
}

fn default_section_color() -> String {
    "Cyan".to_string()
}

/// Identifies one exercise by section id and position within the section.
/// Only stable as long as the catalog ordering is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExerciseKey {
    pub section_id: String,
    pub index: usize,
}

impl ExerciseKey {
    pub fn new(section_id: impl Into<String>, index: usize) -> Self {
        Self {
            section_id: section_id.into(),
            index,
        }
    }
}

impl fmt::Display for ExerciseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section_id, self.index)
    }
}

// On-disk shape of a catalog file
#[derive(Deserialize)]
struct CatalogFile {
    sections: Vec<Section>,
}

/// Ordered, immutable list of sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    sections: Vec<Section>,
}

impl Catalog {
    /// Builds a catalog after validating section ids and set counts.
    /// # Errors
    /// - `Error::EmptySectionId` / `Error::DuplicateSectionId` for bad ids.
    /// - `Error::ZeroSets` if an exercise prescribes no sets.
    pub fn new(sections: Vec<Section>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for section in &sections {
            if section.id.trim().is_empty() {
                return Err(Error::EmptySectionId(section.title.clone()));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(Error::DuplicateSectionId(section.id.clone()));
            }
            if let Some(exercise) = section.exercises.iter().find(|e| e.sets == 0) {
                return Err(Error::ZeroSets {
                    section_id: section.id.clone(),
                    exercise: exercise.name.clone(),
                });
            }
        }
        Ok(Self { sections })
    }

    /// Reads a catalog from a TOML file with `[[sections]]` tables.
    /// # Errors
    /// Returns I/O, parse, or validation errors.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let file: CatalogFile = toml::from_str(&content)?;
        Self::new(file.sections)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn exercise(&self, key: &ExerciseKey) -> Option<&Exercise> {
        self.section(&key.section_id)?.exercises.get(key.index)
    }

    /// Like `exercise`, but an unknown key is an error.
    /// # Errors
    /// Returns `Error::UnknownExercise` if the key does not address an exercise.
    pub fn require(&self, key: &ExerciseKey) -> Result<&Exercise, Error> {
        self.exercise(key)
            .ok_or_else(|| Error::UnknownExercise(key.clone()))
    }

    pub fn total_exercises(&self) -> usize {
        self.sections.iter().map(|s| s.exercises.len()).sum()
    }

    /// All exercise keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = ExerciseKey> + '_ {
        self.sections.iter().flat_map(|section| {
            (0..section.exercises.len()).map(move |i| ExerciseKey::new(section.id.as_str(), i))
        })
    }

    /// Case-insensitive lookup by exercise name (first match in catalog order).
    pub fn find_exercise(&self, name: &str) -> Option<(ExerciseKey, &Exercise)> {
        let name = name.trim();
        self.sections.iter().find_map(|section| {
            section
                .exercises
                .iter()
                .position(|e| e.name.eq_ignore_ascii_case(name))
                .map(|i| {
                    (
                        ExerciseKey::new(section.id.as_str(), i),
                        &section.exercises[i],
                    )
                })
        })
    }

    /// The default six-section plan.
    pub fn builtin() -> Self {
        use Difficulty::{Easy, Hard, Medium};

        let section = |id: &str, title: &str, icon: &str, color: &str, exercises: Vec<Exercise>| {
            Section {
                id: id.to_string(),
                title: title.to_string(),
                icon: icon.to_string(),
                color: color.to_string(),
                exercises,
            }
        };

        Self {
            sections: vec![
                section(
                    "chest",
                    "Chest",
                    "🔥",
                    "Red",
                    vec![
                        exercise("Barbell Bench Press", 4, Reps::Count(10), "135lbs", Hard),
                        exercise("Incline Bench Press", 4, Reps::Count(10), "115lbs", Hard),
                        exercise("Dumbbell Bench Press", 4, Reps::Count(10), "80lbs", Medium),
                        exercise("Pec Deck Fly", 4, Reps::Count(10), "100lbs", Easy),
                        exercise("Dumbbell Incline Fly", 4, Reps::Count(10), "60lbs", Medium),
                    ],
                ),
                section(
                    "back",
                    "Back",
                    "💎",
                    "Cyan",
                    vec![
                        exercise("Extension Row", 3, range("12-15"), "120lbs", Medium),
                        exercise("Barbell Row", 3, Reps::Count(8), "155lbs", Hard),
                        exercise("Lat Pulldowns", 3, Reps::Count(10), "140lbs", Medium),
                        exercise("Dumbbell Rows", 3, Reps::Count(8), "85lbs", Medium),
                        exercise("Row V-Rod", 4, range("8-15"), "110lbs", Easy),
                    ],
                ),
                section(
                    "shoulders",
                    "Shoulders",
                    "⚡",
                    "Magenta",
                    vec![
                        exercise("Shoulder Press", 4, range("8-15"), "95lbs", Hard),
                        exercise("Shrugs", 4, range("8-15"), "135lbs", Medium),
                        exercise("Face Pulls", 4, range("8-15"), "70lbs", Easy),
                        exercise("Front Raises", 4, range("8-15"), "25lbs", Easy),
                        exercise("Lateral Raises", 4, range("8-15"), "20lbs", Medium),
                    ],
                ),
                section(
                    "biceps",
                    "Biceps",
                    "💪",
                    "Green",
                    vec![
                        exercise("Hammer Curls", 3, range("10-12"), "40lbs", Medium),
                        exercise("Barbell Curls", 3, range("8-10"), "65lbs", Hard),
                        exercise("Concentration Curls", 3, range("10-12"), "30lbs", Medium),
                        exercise("Preacher Curls", 3, range("8-10"), "55lbs", Hard),
                        exercise("Cable Curls", 3, range("12-15"), "50lbs", Easy),
                    ],
                ),
                section(
                    "triceps",
                    "Triceps",
                    "🚀",
                    "Yellow",
                    vec![
                        exercise("Close-Grip Bench Press", 4, range("8-15"), "115lbs", Hard),
                        exercise("Bench Dips", 4, range("8-15"), "Bodyweight", Medium),
                        exercise("DB Overhead Extension", 4, range("8-15"), "60lbs", Medium),
                        exercise("Bar Pushdown", 4, range("8-15"), "80lbs", Easy),
                        exercise("Skull Crushers", 4, range("8-15"), "70lbs", Hard),
                    ],
                ),
                section(
                    "legs",
                    "Legs",
                    "🦵",
                    "DarkMagenta",
                    vec![
                        exercise("Back Squat", 2, Reps::Count(8), "185lbs", Hard),
                        exercise("Leg Press", 2, Reps::Count(15), "270lbs", Medium),
                        exercise("Leg Extensions", 2, Reps::Count(15), "120lbs", Easy),
                        exercise("Leg Curls", 2, Reps::Count(12), "100lbs", Medium),
                        exercise("Dumbbell Hamstrings", 2, Reps::Count(10), "50lbs", Medium),
                    ],
                ),
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn exercise(name: &str, sets: u32, reps: Reps, weight: &str, difficulty: Difficulty) -> Exercise {
    Exercise {
        name: name.to_string(),
        sets,
        reps,
        weight: weight.to_string(),
        difficulty,
    }
}

fn range(reps: &str) -> Reps {
    Reps::Range(reps.to_string())
}

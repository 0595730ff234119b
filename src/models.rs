use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::{Rir, Split};

/// Weight and reps carried over from the last time an exercise was trained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviousSession {
    pub weight: f64,
    pub reps: u32,
}

/// One prescribed exercise in a workout day.
/// The id is unique within its plan only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub movement_pattern: String,
    pub muscle_group: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    pub reasoning: String,
    pub alternatives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_session: Option<PreviousSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub id: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    pub fn exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }
}

/// A full weekly plan. Regeneration replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub split: Split,
    pub days: Vec<WorkoutDay>,
    pub rationale: String,
}

impl GeneratedPlan {
    pub fn day(&self, day_id: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|d| d.id == day_id)
    }

    pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut Exercise> {
        self.days
            .iter_mut()
            .flat_map(|d| d.exercises.iter_mut())
            .find(|e| e.id == exercise_id)
    }
}

/// A single set as logged by the user. Never changed after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedSet {
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub rir: Rir,
    pub timestamp: DateTime<Local>,
}

/// A training session against one plan day.
/// `day_id` is a weak reference: the day may no longer exist in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub day_id: String,
    pub day_name: String,
    pub date: DateTime<Local>,
    pub sets: Vec<LoggedSet>,
    pub completed: bool,
    /// Minutes from start to finish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeChange {
    #[serde(rename = "+1 set")]
    AddSet,
    #[serde(rename = "-1 set")]
    RemoveSet,
}

impl Display for VolumeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddSet => write!(f, "+1 set"),
            Self::RemoveSet => write!(f, "-1 set"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SuggestionKind {
    Weight { current: f64, suggested: f64 },
    Volume { change: VolumeChange },
    Swap { from: String, to: String },
}

impl SuggestionKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Weight { .. } => "weight",
            Self::Volume { .. } => "volume",
            Self::Swap { .. } => "swap",
        }
    }
}

/// A coaching recommendation. `applied` is the only field that ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    #[serde(flatten)]
    pub kind: SuggestionKind,
    pub reason: String,
    pub timestamp: DateTime<Local>,
    pub applied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
    pub trend: Trend,
    pub avg_rir: f64,
    pub weight_change: f64,
}

impl Default for ExerciseProgress {
    fn default() -> Self {
        Self {
            trend: Trend::Stable,
            avg_rir: 2.0,
            weight_change: 0.0,
        }
    }
}

/// Adherence overview for one calendar week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub workouts_completed: usize,
    pub total_workouts: usize,
    pub suggestions: Vec<Suggestion>,
    pub progress_summary: String,
}

//! The storage collaborator and helpers over stored history.
//!
//! Everything here is synchronous: one user, serialized reads and writes.

use chrono::{Datelike, Local, NaiveDate};
use std::cell::RefCell;
use thiserror::Error;

use crate::{
    models::{
        GeneratedPlan, LoggedSet, PreviousSession, Suggestion, WeeklySummary, WorkoutDay,
        WorkoutSession,
    },
    types::UserProfile,
    utils,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to encode or decode stored value: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to start storage runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Load/save surface for plan, profile, history and suggestions.
/// Absence is `Ok(None)` or an empty vector, never an error.
pub trait Store {
    fn load_plan(&self) -> Result<Option<GeneratedPlan>, StoreError>;
    fn save_plan(&self, plan: &GeneratedPlan) -> Result<(), StoreError>;

    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError>;
    fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    /// Sessions in insertion order.
    fn load_workout_history(&self) -> Result<Vec<WorkoutSession>, StoreError>;
    fn append_workout(&self, session: &WorkoutSession) -> Result<(), StoreError>;

    fn load_suggestions(&self) -> Result<Vec<Suggestion>, StoreError>;
    fn append_suggestion(&self, suggestion: &Suggestion) -> Result<(), StoreError>;
    /// Returns true only when the suggestion went from unapplied to applied.
    fn mark_suggestion_applied(&self, id: &str) -> Result<bool, StoreError>;

    /// The session being logged, kept between invocations.
    fn load_active_session(&self) -> Result<Option<WorkoutSession>, StoreError>;
    fn save_active_session(&self, session: &WorkoutSession) -> Result<(), StoreError>;
    fn clear_active_session(&self) -> Result<(), StoreError>;
}

/// In-memory store, used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    plan: RefCell<Option<GeneratedPlan>>,
    profile: RefCell<Option<UserProfile>>,
    workouts: RefCell<Vec<WorkoutSession>>,
    suggestions: RefCell<Vec<Suggestion>>,
    active: RefCell<Option<WorkoutSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(workouts: Vec<WorkoutSession>) -> Self {
        Self {
            workouts: RefCell::new(workouts),
            ..Self::default()
        }
    }
}

impl Store for MemoryStore {
    fn load_plan(&self) -> Result<Option<GeneratedPlan>, StoreError> {
        Ok(self.plan.borrow().clone())
    }

    fn save_plan(&self, plan: &GeneratedPlan) -> Result<(), StoreError> {
        *self.plan.borrow_mut() = Some(plan.clone());
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profile.borrow().clone())
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        *self.profile.borrow_mut() = Some(profile.clone());
        Ok(())
    }

    fn load_workout_history(&self) -> Result<Vec<WorkoutSession>, StoreError> {
        Ok(self.workouts.borrow().clone())
    }

    fn append_workout(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        self.workouts.borrow_mut().push(session.clone());
        Ok(())
    }

    fn load_suggestions(&self) -> Result<Vec<Suggestion>, StoreError> {
        Ok(self.suggestions.borrow().clone())
    }

    fn append_suggestion(&self, suggestion: &Suggestion) -> Result<(), StoreError> {
        self.suggestions.borrow_mut().push(suggestion.clone());
        Ok(())
    }

    fn mark_suggestion_applied(&self, id: &str) -> Result<bool, StoreError> {
        let mut suggestions = self.suggestions.borrow_mut();
        match suggestions.iter_mut().find(|s| s.id == id) {
            Some(s) if !s.applied => {
                s.applied = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn load_active_session(&self) -> Result<Option<WorkoutSession>, StoreError> {
        Ok(self.active.borrow().clone())
    }

    fn save_active_session(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        *self.active.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn clear_active_session(&self) -> Result<(), StoreError> {
        self.active.borrow_mut().take();
        Ok(())
    }
}

/// Every set from completed sessions, oldest first.
pub fn completed_sets(history: &[WorkoutSession]) -> impl Iterator<Item = &LoggedSet> {
    history
        .iter()
        .filter(|w| w.completed)
        .flat_map(|w| w.sets.iter())
}

/// Completed-session history of one exercise, oldest first.
pub fn exercise_history<'h>(history: &'h [WorkoutSession], exercise_id: &str) -> Vec<&'h LoggedSet> {
    completed_sets(history)
        .filter(|s| s.exercise_id == exercise_id)
        .collect()
}

pub fn workouts_for_day<'h>(history: &'h [WorkoutSession], day_id: &str) -> Vec<&'h WorkoutSession> {
    history.iter().filter(|w| w.day_id == day_id).collect()
}

/// First set of `exercise_id` in the most recent session that trained it.
pub fn last_set_for_exercise<'h>(
    history: &'h [WorkoutSession],
    exercise_id: &str,
) -> Option<&'h LoggedSet> {
    history
        .iter()
        .rev()
        .find_map(|w| w.sets.iter().find(|s| s.exercise_id == exercise_id))
}

/// Replaces each exercise's previous session with what was last logged for it.
/// Exercises never logged keep their seed values.
pub fn refresh_previous_sessions(day: &mut WorkoutDay, history: &[WorkoutSession]) {
    for exercise in &mut day.exercises {
        if let Some(set) = last_set_for_exercise(history, &exercise.id) {
            exercise.previous_session = Some(PreviousSession {
                weight: set.weight,
                reps: set.reps,
            });
        }
    }
}

pub fn in_week(date: NaiveDate, week_start: NaiveDate) -> bool {
    date >= week_start && date <= utils::week_end(week_start)
}

/// Adherence for the week starting at `week_start`.
/// Store failures degrade to an empty week.
pub fn weekly_summary<S: Store + ?Sized>(store: &S, week_start: NaiveDate) -> WeeklySummary {
    let history = store.load_workout_history().unwrap_or_else(|e| {
        tracing::warn!("could not read workout history: {e}");
        Vec::new()
    });
    let plan = store.load_plan().unwrap_or_else(|e| {
        tracing::warn!("could not read plan: {e}");
        None
    });
    let suggestions = store.load_suggestions().unwrap_or_else(|e| {
        tracing::warn!("could not read suggestions: {e}");
        Vec::new()
    });

    let completed = history
        .iter()
        .filter(|w| w.completed && in_week(w.date.date_naive(), week_start))
        .count();
    let total = plan.map(|p| p.days.len()).unwrap_or(0);
    let open: Vec<Suggestion> = suggestions
        .into_iter()
        .filter(|s| !s.applied && in_week(s.timestamp.date_naive(), week_start))
        .collect();

    let progress_summary = if completed == 0 {
        "No workouts completed this week. Let's get started!".to_string()
    } else if (completed as f64) < total as f64 * 0.5 {
        format!("You completed {completed} of {total} workouts. Consider increasing consistency.")
    } else if completed < total {
        format!("Great progress! You completed {completed} of {total} workouts.")
    } else {
        format!("Excellent! You completed all {completed} workouts this week.")
    };

    WeeklySummary {
        week_start,
        week_end: utils::week_end(week_start),
        workouts_completed: completed,
        total_workouts: total,
        suggestions: open,
        progress_summary,
    }
}

/// Weekday slots (Monday = 0) that carry a workout, by number of plan days.
fn schedule(day_count: usize) -> &'static [u32] {
    match day_count {
        3 => &[0, 2, 4],
        4 => &[0, 2, 4, 6],
        5 => &[0, 1, 3, 4, 6],
        6 => &[0, 1, 2, 3, 4, 5],
        _ => &[0, 2, 4],
    }
}

/// The plan day scheduled on `date`, rotating through the plan's days.
pub fn scheduled_day(plan: &GeneratedPlan, date: NaiveDate) -> Option<&WorkoutDay> {
    if plan.days.is_empty() {
        return None;
    }

    let weekday = date.weekday().num_days_from_monday();
    let slot = schedule(plan.days.len()).iter().position(|d| *d == weekday)?;
    plan.days.get(slot % plan.days.len())
}

pub fn day_completed_on(history: &[WorkoutSession], day_id: &str, date: NaiveDate) -> bool {
    history
        .iter()
        .any(|w| w.completed && w.day_id == day_id && w.date.date_naive() == date)
}

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

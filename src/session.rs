use chrono::{DateTime, Local};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{Exercise, LoggedSet, WorkoutDay, WorkoutSession},
    types::Rir,
};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("exercise `{0}` is not part of this workout day")]
    UnknownExercise(String),
    #[error("all {0} prescribed sets of `{1}` are already logged")]
    AllSetsLogged(u32, String),
    #[error("weight must not be negative, got {0}")]
    NegativeWeight(f64),
    #[error("weight must be a finite number, got {0}")]
    NonFiniteWeight(f64),
    #[error("reps must be at least 1")]
    NoReps,
    #[error("workout is not finished: {0} still has sets left")]
    Incomplete(String),
    #[error("session is already completed")]
    AlreadyCompleted,
}

impl WorkoutSession {
    /// Opens an empty session for `day`.
    pub fn start(day: &WorkoutDay, now: DateTime<Local>) -> Self {
        Self {
            id: format!("workout-{}", Uuid::new_v4()),
            day_id: day.id.clone(),
            day_name: day.name.clone(),
            date: now,
            sets: Vec::new(),
            completed: false,
            duration: None,
        }
    }

    pub fn sets_logged(&self, exercise_id: &str) -> usize {
        self.sets.iter().filter(|s| s.exercise_id == exercise_id).count()
    }

    /// Records one set. The prescription caps how many sets an exercise takes.
    pub fn log_set(
        &mut self,
        day: &WorkoutDay,
        exercise_id: &str,
        weight: f64,
        reps: u32,
        rir: Rir,
        now: DateTime<Local>,
    ) -> Result<&LoggedSet, SessionError> {
        if self.completed {
            return Err(SessionError::AlreadyCompleted);
        }

        let exercise = day
            .exercise(exercise_id)
            .ok_or_else(|| SessionError::UnknownExercise(exercise_id.to_string()))?;

        if !weight.is_finite() {
            return Err(SessionError::NonFiniteWeight(weight));
        }
        if weight < 0.0 {
            return Err(SessionError::NegativeWeight(weight));
        }
        if reps == 0 {
            return Err(SessionError::NoReps);
        }
        if self.sets_logged(exercise_id) >= exercise.sets as usize {
            return Err(SessionError::AllSetsLogged(exercise.sets, exercise.name.clone()));
        }

        self.sets.push(LoggedSet {
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
            weight,
            reps,
            rir,
            timestamp: now,
        });

        Ok(&self.sets[self.sets.len() - 1])
    }

    /// First exercise of `day` still short of its prescribed sets.
    pub fn first_unfinished<'d>(&self, day: &'d WorkoutDay) -> Option<&'d Exercise> {
        day.exercises
            .iter()
            .find(|e| self.sets_logged(&e.id) < e.sets as usize)
    }

    pub fn is_complete_for(&self, day: &WorkoutDay) -> bool {
        self.first_unfinished(day).is_none()
    }

    /// Marks the session completed once every prescribed set is in.
    pub fn finish(&mut self, day: &WorkoutDay, now: DateTime<Local>) -> Result<(), SessionError> {
        if self.completed {
            return Err(SessionError::AlreadyCompleted);
        }
        if let Some(exercise) = self.first_unfinished(day) {
            return Err(SessionError::Incomplete(exercise.name.clone()));
        }

        self.completed = true;
        self.duration = Some((now - self.date).num_minutes().max(0) as u32);
        Ok(())
    }
}

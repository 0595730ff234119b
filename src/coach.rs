//! Rule-based coaching over logged history.
//!
//! Three entry points, all of them pure functions of their arguments and the
//! history held by the injected [`Store`]:
//!
//! * [`Coach::analyze_workout`] gives immediate feedback after a session.
//! * [`Coach::weekly_review`] looks at one calendar week plus all-time history.
//! * [`Coach::exercise_progress`] summarises the trend of a single exercise.
//!
//! Missing or unreadable history never surfaces as an error. It suppresses
//! suggestions instead.

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::{
    catalog,
    models::{
        ExerciseProgress, GeneratedPlan, LoggedSet, Suggestion, SuggestionKind, Trend,
        VolumeChange, WorkoutDay, WorkoutSession,
    },
    storage::{self, Store},
    utils,
};

/// Sets looked at when judging a single logged set.
const RECENT_WINDOW: usize = 3;
/// Minimum history before any per-set rule runs.
const MIN_HISTORY: usize = 2;
/// RIR at or below this counts as a hard set.
const HARD_RIR: u8 = 2;
/// RIR at or above this means the set was too easy.
const EASY_RIR: u8 = 4;
const WEIGHT_STEP: f64 = 1.05;
/// All-time sets needed before stagnation is judged (two blocks of four).
const STAGNATION_SETS: usize = 8;
const STAGNATION_BLOCK: usize = 4;
const STAGNATION_GROWTH: f64 = 1.02;
/// Weekly mean RIR above this, over at least `WEEKLY_MIN_SETS`, asks for volume.
const WEEKLY_EASY_RIR: f64 = 3.0;
const WEEKLY_MIN_SETS: usize = 3;
const PROGRESS_MIN_SETS: usize = 4;
const TREND_THRESHOLD: f64 = 2.0;

pub struct Coach<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> Coach<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn history(&self) -> Vec<WorkoutSession> {
        self.store.load_workout_history().unwrap_or_else(|e| {
            tracing::warn!("could not read workout history, coaching without it: {e}");
            Vec::new()
        })
    }

    /// Immediate feedback for a just-finished session.
    ///
    /// Every logged set whose exercise is still in `day` is judged against the
    /// last three completed-history sets of that exercise. The rules are
    /// independent, so one set can yield several suggestions.
    pub fn analyze_workout(&self, session: &WorkoutSession, day: &WorkoutDay) -> Vec<Suggestion> {
        let history = self.history();
        let mut suggestions = Vec::new();

        for set in &session.sets {
            if day.exercise(&set.exercise_id).is_none() {
                continue;
            }

            let all = storage::exercise_history(&history, &set.exercise_id);
            let recent = &all[all.len().saturating_sub(RECENT_WINDOW)..];
            if recent.len() < MIN_HISTORY {
                continue;
            }

            let rir = set.rir.value();
            let hard = recent.iter().filter(|s| s.rir.value() <= HARD_RIR).count();
            let failed = recent.iter().filter(|s| s.rir.value() == 0).count();

            if hard >= MIN_HISTORY && rir <= HARD_RIR {
                suggestions.push(weight_suggestion(set));
            }
            if rir >= EASY_RIR {
                suggestions.push(volume_suggestion(
                    set,
                    VolumeChange::AddSet,
                    format!(
                        "Your RIR of {} indicates {} is too easy. Add 1 set to increase volume and stimulus.",
                        rir, set.exercise_name
                    ),
                ));
            }
            if rir == 0 && failed >= MIN_HISTORY {
                suggestions.push(volume_suggestion(
                    set,
                    VolumeChange::RemoveSet,
                    format!(
                        "You're hitting failure consistently on {}. Reduce volume by 1 set to allow better recovery and form.",
                        set.exercise_name
                    ),
                ));
            }
        }

        tracing::info!(
            session = %session.id,
            count = suggestions.len(),
            "analyzed workout"
        );
        suggestions
    }

    /// Review of the seven days starting at `week_start`, in plan order.
    pub fn weekly_review(&self, week_start: NaiveDate, plan: &GeneratedPlan) -> Vec<Suggestion> {
        let history = self.history();
        let week: Vec<&LoggedSet> = history
            .iter()
            .filter(|w| w.completed && storage::in_week(w.date.date_naive(), week_start))
            .flat_map(|w| w.sets.iter())
            .collect();

        let mut suggestions = Vec::new();

        for exercise in plan.days.iter().flat_map(|d| d.exercises.iter()) {
            let this_week: Vec<&LoggedSet> = week
                .iter()
                .copied()
                .filter(|s| s.exercise_id == exercise.id)
                .collect();
            let Some(avg_rir) = utils::mean(this_week.iter().map(|s| s.rir.value() as f64)) else {
                continue;
            };

            let all = storage::exercise_history(&history, &exercise.id);
            if all.len() >= STAGNATION_SETS {
                let n = all.len();
                let recent = mean_weight(&all[n - STAGNATION_BLOCK..]);
                let older = mean_weight(&all[n - STAGNATION_SETS..n - STAGNATION_BLOCK]);

                if let Some(to) = exercise.alternatives.first() {
                    if recent <= older * STAGNATION_GROWTH {
                        suggestions.push(Suggestion {
                            id: suggestion_id("swap"),
                            exercise_id: exercise.id.clone(),
                            exercise_name: exercise.name.clone(),
                            kind: SuggestionKind::Swap {
                                from: exercise.name.clone(),
                                to: to.clone(),
                            },
                            reason: format!(
                                "{} shows no progress over the last 4 weeks. Consider swapping to {} for a new stimulus while maintaining the {} pattern.",
                                exercise.name, to, exercise.movement_pattern
                            ),
                            timestamp: Local::now(),
                            applied: false,
                        });
                    }
                }
            }

            if avg_rir > WEEKLY_EASY_RIR && this_week.len() >= WEEKLY_MIN_SETS {
                suggestions.push(Suggestion {
                    id: suggestion_id("volume"),
                    exercise_id: exercise.id.clone(),
                    exercise_name: exercise.name.clone(),
                    kind: SuggestionKind::Volume {
                        change: VolumeChange::AddSet,
                    },
                    reason: format!(
                        "Weekly average RIR of {:.1} indicates {} is too easy. Increase volume by adding 1 set per session.",
                        avg_rir, exercise.name
                    ),
                    timestamp: Local::now(),
                    applied: false,
                });
            }
        }

        tracing::info!(%week_start, count = suggestions.len(), "weekly review");
        suggestions
    }

    /// Weight trend over the last eight sets of one exercise.
    pub fn exercise_progress(&self, exercise_id: &str) -> ExerciseProgress {
        let history = self.history();
        let all = storage::exercise_history(&history, exercise_id);
        if all.len() < PROGRESS_MIN_SETS {
            return ExerciseProgress::default();
        }

        let n = all.len();
        let recent = &all[n - PROGRESS_MIN_SETS..];
        let older = &all[n.saturating_sub(2 * PROGRESS_MIN_SETS)..n - PROGRESS_MIN_SETS];

        let recent_weight = mean_weight(recent);
        let older_weight = if older.is_empty() {
            recent_weight
        } else {
            mean_weight(older)
        };
        let avg_rir = utils::mean(recent.iter().map(|s| s.rir.value() as f64)).unwrap_or(2.0);
        let weight_change = recent_weight - older_weight;

        let trend = if weight_change > TREND_THRESHOLD {
            Trend::Up
        } else if weight_change < -TREND_THRESHOLD {
            Trend::Down
        } else {
            Trend::Stable
        };

        ExerciseProgress {
            trend,
            avg_rir,
            weight_change,
        }
    }
}

fn mean_weight(sets: &[&LoggedSet]) -> f64 {
    utils::mean(sets.iter().map(|s| s.weight)).unwrap_or(0.0)
}

fn suggestion_id(kind: &str) -> String {
    format!("{}-{}", kind, Uuid::new_v4())
}

fn weight_suggestion(set: &LoggedSet) -> Suggestion {
    let suggested = utils::round_half_up(set.weight * WEIGHT_STEP);
    Suggestion {
        id: suggestion_id("weight"),
        exercise_id: set.exercise_id.clone(),
        exercise_name: set.exercise_name.clone(),
        kind: SuggestionKind::Weight {
            current: set.weight,
            suggested,
        },
        reason: format!(
            "You've consistently hit {} RIR on {}. Increase weight to {}lbs to maintain progressive overload.",
            set.rir, set.exercise_name, suggested
        ),
        timestamp: Local::now(),
        applied: false,
    }
}

fn volume_suggestion(set: &LoggedSet, change: VolumeChange, reason: String) -> Suggestion {
    Suggestion {
        id: suggestion_id("volume"),
        exercise_id: set.exercise_id.clone(),
        exercise_name: set.exercise_name.clone(),
        kind: SuggestionKind::Volume { change },
        reason,
        timestamp: Local::now(),
        applied: false,
    }
}

/// Applies a suggestion to the plan it was made for.
/// Returns false when the exercise is no longer part of the plan.
pub fn apply_to_plan(plan: &mut GeneratedPlan, suggestion: &Suggestion) -> bool {
    let Some(exercise) = plan.exercise_mut(&suggestion.exercise_id) else {
        tracing::warn!(
            exercise = %suggestion.exercise_id,
            "suggestion targets an exercise that is no longer in the plan"
        );
        return false;
    };

    match &suggestion.kind {
        SuggestionKind::Weight { suggested, .. } => {
            exercise.target_weight = Some(*suggested);
        }
        SuggestionKind::Volume { change } => {
            exercise.sets = match change {
                VolumeChange::AddSet => exercise.sets + 1,
                VolumeChange::RemoveSet => exercise.sets.saturating_sub(1).max(1),
            };
        }
        SuggestionKind::Swap { from, to } => {
            let table = catalog::swap_alternatives(to);
            exercise.alternatives = if table.is_empty() {
                exercise
                    .alternatives
                    .iter()
                    .map(|a| if a == to { from.clone() } else { a.clone() })
                    .collect()
            } else {
                table
            };
            exercise.name = to.clone();
            exercise.previous_session = None;
            exercise.target_weight = None;
            if let Some(meta) = catalog::lookup(to) {
                exercise.reasoning = meta.reasoning.to_string();
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Exercise,
        storage::{MemoryStore, fixtures::*},
    };
    use chrono::Duration;
    use std::collections::HashSet;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn exercise(id: &str, name: &str, alternatives: &[&str]) -> Exercise {
        Exercise {
            id: id.into(),
            name: name.into(),
            movement_pattern: "Horizontal Push".into(),
            muscle_group: "Chest".into(),
            sets: 4,
            reps: 8,
            target_weight: None,
            reasoning: String::new(),
            alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
            previous_session: None,
        }
    }

    fn bench_day() -> WorkoutDay {
        WorkoutDay {
            id: "push-1".into(),
            name: "Push Day 1".into(),
            exercises: vec![exercise("bench", "Bench", &["X"])],
        }
    }

    fn plan_of(day: WorkoutDay) -> GeneratedPlan {
        GeneratedPlan {
            split: crate::types::Split::PushPullLegs,
            days: vec![day],
            rationale: String::new(),
        }
    }

    fn current(weight: f64, rir: u8) -> WorkoutSession {
        let mut s = session("push-1", d(10), vec![set("bench", weight, rir, at(d(10), 18))]);
        s.completed = false;
        s
    }

    fn kinds(suggestions: &[Suggestion]) -> Vec<&SuggestionKind> {
        suggestions.iter().map(|s| &s.kind).collect()
    }

    #[test]
    fn weight_progression_after_hard_sets() {
        let store = MemoryStore::with_history(sessions_for("bench", &[(180.0, 2), (185.0, 1), (185.0, 2)], d(9)));
        let out = Coach::new(&store).analyze_workout(&current(185.0, 1), &bench_day());

        assert_eq!(
            kinds(&out),
            [&SuggestionKind::Weight {
                current: 185.0,
                suggested: 194.0
            }]
        );
        assert!(out[0].reason.contains("Exercise bench"));
        assert!(out[0].reason.contains("194lbs"));
        assert!(!out[0].applied);
    }

    #[test]
    fn only_last_three_history_sets_count() {
        // Two old hard sets are outside the window of three.
        let store = MemoryStore::with_history(sessions_for(
            "bench",
            &[(185.0, 1), (185.0, 1), (185.0, 3), (185.0, 3), (185.0, 2)],
            d(9),
        ));
        let out = Coach::new(&store).analyze_workout(&current(185.0, 1), &bench_day());
        assert!(out.is_empty());
    }

    #[test]
    fn easy_set_asks_for_more_volume() {
        let store = MemoryStore::with_history(sessions_for("bench", &[(100.0, 3), (100.0, 3)], d(9)));
        for weight in [20.0, 100.0, 300.0] {
            let out = Coach::new(&store).analyze_workout(&current(weight, 4), &bench_day());
            assert_eq!(
                kinds(&out),
                [&SuggestionKind::Volume {
                    change: VolumeChange::AddSet
                }]
            );
        }
    }

    #[test]
    fn repeated_failure_asks_for_less_volume() {
        let store = MemoryStore::with_history(sessions_for("bench", &[(185.0, 0), (185.0, 3), (185.0, 0)], d(9)));
        let out = Coach::new(&store).analyze_workout(&current(185.0, 0), &bench_day());
        assert!(kinds(&out).contains(&&SuggestionKind::Volume {
            change: VolumeChange::RemoveSet
        }));

        let store = MemoryStore::with_history(sessions_for("bench", &[(185.0, 0), (185.0, 3), (185.0, 3)], d(9)));
        let out = Coach::new(&store).analyze_workout(&current(185.0, 0), &bench_day());
        assert!(out.is_empty());
    }

    #[test]
    fn rules_can_fire_together() {
        let store = MemoryStore::with_history(sessions_for("bench", &[(185.0, 0), (185.0, 0)], d(9)));
        let out = Coach::new(&store).analyze_workout(&current(185.0, 0), &bench_day());

        assert_eq!(out.len(), 2);
        assert!(matches!(out[0].kind, SuggestionKind::Weight { .. }));
        assert_eq!(
            out[1].kind,
            SuggestionKind::Volume {
                change: VolumeChange::RemoveSet
            }
        );
        assert_ne!(out[0].id, out[1].id);
    }

    #[test]
    fn thin_history_suppresses_everything() {
        let day = bench_day();
        for rir in 0..=5 {
            let store = MemoryStore::with_history(sessions_for("bench", &[(185.0, rir)], d(9)));
            assert!(Coach::new(&store).analyze_workout(&current(185.0, rir), &day).is_empty());
        }

        let empty = MemoryStore::new();
        assert!(Coach::new(&empty).analyze_workout(&current(185.0, 5), &day).is_empty());
    }

    #[test]
    fn incomplete_sessions_are_not_history() {
        let mut history = sessions_for("bench", &[(185.0, 1), (185.0, 1)], d(9));
        history[1].completed = false;
        let store = MemoryStore::with_history(history);

        let out = Coach::new(&store).analyze_workout(&current(185.0, 1), &bench_day());
        assert!(out.is_empty());
    }

    #[test]
    fn sets_for_removed_exercises_are_skipped() {
        let store = MemoryStore::with_history(sessions_for("gone", &[(100.0, 5), (100.0, 5)], d(9)));
        let mut s = current(100.0, 5);
        s.sets[0].exercise_id = "gone".into();

        assert!(Coach::new(&store).analyze_workout(&s, &bench_day()).is_empty());
    }

    #[test]
    fn ids_are_unique_per_emission() {
        let store = MemoryStore::with_history(sessions_for("bench", &[(100.0, 5), (100.0, 5)], d(9)));
        let mut s = current(100.0, 5);
        let extra = s.sets[0].clone();
        s.sets.extend([extra.clone(), extra.clone(), extra]);

        let out = Coach::new(&store).analyze_workout(&s, &bench_day());
        assert_eq!(out.len(), 4);
        let ids: HashSet<_> = out.iter().map(|s| &s.id).collect();
        assert_eq!(ids.len(), 4);
        assert!(out.iter().all(|s| s.id.starts_with("volume-")));
    }

    fn stagnation_history(older: f64, recent: f64) -> Vec<WorkoutSession> {
        let mut points = vec![(older, 2); 4];
        points.extend(vec![(recent, 2); 4]);
        sessions_for("bench", &points, d(8))
    }

    #[test]
    fn stalled_exercise_is_swapped() {
        let plan = plan_of(bench_day());
        let store = MemoryStore::with_history(stagnation_history(204.0, 205.0));

        let out = Coach::new(&store).weekly_review(d(2), &plan);
        assert_eq!(
            kinds(&out),
            [&SuggestionKind::Swap {
                from: "Bench".into(),
                to: "X".into()
            }]
        );
        assert!(out[0].reason.contains("Horizontal Push pattern"));
    }

    #[test]
    fn progressing_exercise_is_kept() {
        let plan = plan_of(bench_day());
        let store = MemoryStore::with_history(stagnation_history(195.0, 205.0));
        assert!(Coach::new(&store).weekly_review(d(2), &plan).is_empty());
    }

    #[test]
    fn no_swap_without_alternatives() {
        let mut day = bench_day();
        day.exercises[0].alternatives.clear();
        let store = MemoryStore::with_history(stagnation_history(204.0, 205.0));
        assert!(Coach::new(&store).weekly_review(d(2), &plan_of(day)).is_empty());
    }

    #[test]
    fn stagnation_needs_this_week_sets() {
        let plan = plan_of(bench_day());
        let store = MemoryStore::with_history(stagnation_history(204.0, 205.0));
        // The history ends on the 8th, the week of the 9th has nothing.
        assert!(Coach::new(&store).weekly_review(d(9), &plan).is_empty());
    }

    #[test]
    fn easy_week_asks_for_volume() {
        let plan = plan_of(bench_day());
        let store = MemoryStore::with_history(sessions_for("bench", &[(100.0, 4), (100.0, 3), (100.0, 4)], d(4)));

        let out = Coach::new(&store).weekly_review(d(2), &plan);
        assert_eq!(
            kinds(&out),
            [&SuggestionKind::Volume {
                change: VolumeChange::AddSet
            }]
        );
        assert!(out[0].reason.starts_with("Weekly average RIR of 3.7 "));

        // Two sets are not enough.
        let store = MemoryStore::with_history(sessions_for("bench", &[(100.0, 5), (100.0, 5)], d(4)));
        assert!(Coach::new(&store).weekly_review(d(2), &plan).is_empty());
    }

    #[test]
    fn week_window_is_inclusive() {
        let plan = plan_of(bench_day());
        let mut history = sessions_for("bench", &[(100.0, 5), (100.0, 5)], d(8));
        history.extend(sessions_for("bench", &[(100.0, 5)], d(2)));
        // Outside: the Sunday before and the Monday after.
        history.extend(sessions_for("bench", &[(100.0, 5)], d(1)));
        history.extend(sessions_for("bench", &[(100.0, 5)], d(9)));
        let store = MemoryStore::with_history(history);

        let out = Coach::new(&store).weekly_review(d(2), &plan);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn review_follows_plan_order() {
        let mut day = bench_day();
        day.exercises.push(exercise("row", "Row", &[]));
        day.exercises.swap(0, 1);
        let plan = plan_of(day);

        let mut history = sessions_for("bench", &[(100.0, 5); 3], d(4));
        history.extend(sessions_for("row", &[(80.0, 5); 3], d(4)));
        let store = MemoryStore::with_history(history);

        let out = Coach::new(&store).weekly_review(d(2), &plan);
        let order: Vec<&str> = out.iter().map(|s| s.exercise_id.as_str()).collect();
        assert_eq!(order, ["row", "bench"]);
    }

    #[test]
    fn progress_defaults_on_thin_history() {
        let store = MemoryStore::with_history(sessions_for("bench", &[(100.0, 1); 3], d(9)));
        assert_eq!(Coach::new(&store).exercise_progress("bench"), ExerciseProgress::default());
        assert_eq!(Coach::new(&store).exercise_progress("nothing").trend, Trend::Stable);
    }

    #[test]
    fn progress_with_short_older_block() {
        let store = MemoryStore::with_history(sessions_for(
            "bench",
            &[(100.0, 1), (110.0, 2), (120.0, 3), (130.0, 2), (140.0, 2)],
            d(9),
        ));
        let p = Coach::new(&store).exercise_progress("bench");
        // One set in the older block: mean 100 against recent mean 125.
        assert_eq!(p.trend, Trend::Up);
        assert_eq!(p.weight_change, 25.0);
        assert_eq!(p.avg_rir, 2.25);

        let store = MemoryStore::with_history(sessions_for("bench", &[(100.0, 1), (90.0, 1), (80.0, 1), (70.0, 1)], d(9)));
        let p = Coach::new(&store).exercise_progress("bench");
        assert_eq!(p.weight_change, 0.0);
        assert_eq!(p.trend, Trend::Stable);
    }

    #[test]
    fn progress_trend_thresholds() {
        let run = |older: f64, recent: f64| {
            let store = MemoryStore::with_history(stagnation_history(older, recent));
            Coach::new(&store).exercise_progress("bench")
        };
        assert_eq!(run(100.0, 103.0).trend, Trend::Up);
        assert_eq!(run(100.0, 102.0).trend, Trend::Stable);
        assert_eq!(run(100.0, 98.0).trend, Trend::Stable);
        assert_eq!(run(100.0, 97.0).trend, Trend::Down);
    }

    fn suggestion(kind: SuggestionKind, exercise_id: &str) -> Suggestion {
        Suggestion {
            id: suggestion_id(kind.tag()),
            exercise_id: exercise_id.into(),
            exercise_name: "Bench".into(),
            kind,
            reason: String::new(),
            timestamp: at(d(2), 20) + Duration::minutes(1),
            applied: false,
        }
    }

    #[test]
    fn applying_changes_the_plan() {
        let mut plan = plan_of(bench_day());

        assert!(apply_to_plan(
            &mut plan,
            &suggestion(SuggestionKind::Weight { current: 185.0, suggested: 194.0 }, "bench")
        ));
        assert_eq!(plan.days[0].exercises[0].target_weight, Some(194.0));

        let add = suggestion(SuggestionKind::Volume { change: VolumeChange::AddSet }, "bench");
        assert!(apply_to_plan(&mut plan, &add));
        assert_eq!(plan.days[0].exercises[0].sets, 5);

        let remove = suggestion(SuggestionKind::Volume { change: VolumeChange::RemoveSet }, "bench");
        plan.days[0].exercises[0].sets = 1;
        assert!(apply_to_plan(&mut plan, &remove));
        assert_eq!(plan.days[0].exercises[0].sets, 1);
    }

    #[test]
    fn applying_a_swap_renames_the_slot() {
        let mut plan = plan_of(WorkoutDay {
            id: "pull-1".into(),
            name: "Pull Day 1".into(),
            exercises: vec![exercise("ex-6", "Deadlift", &["Romanian Deadlift", "Rack Pulls"])],
        });
        let swap = suggestion(
            SuggestionKind::Swap {
                from: "Deadlift".into(),
                to: "Rack Pulls".into(),
            },
            "ex-6",
        );

        assert!(apply_to_plan(&mut plan, &swap));
        let ex = &plan.days[0].exercises[0];
        assert_eq!(ex.id, "ex-6");
        assert_eq!(ex.name, "Rack Pulls");
        assert_eq!(ex.alternatives, ["Romanian Deadlift", "Deadlift"]);
        assert!(ex.previous_session.is_none());

        let dangling = suggestion(SuggestionKind::Volume { change: VolumeChange::AddSet }, "ex-404");
        assert!(!apply_to_plan(&mut plan, &dangling));
    }
}

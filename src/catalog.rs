//! Static exercise metadata and day descriptions.
//!
//! The table is read-only and shared by plan generation, the swap command and
//! the session view.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use strsim::jaro_winkler;

use crate::models::PreviousSession;

/// Reasoning, ordered swap alternatives and a seed previous session.
#[derive(Debug, Clone)]
pub struct ExerciseMeta {
    pub reasoning: &'static str,
    pub alternatives: &'static [&'static str],
    pub previous_session: Option<PreviousSession>,
}

pub static EXERCISE_TABLE: Lazy<HashMap<&'static str, ExerciseMeta>> = Lazy::new(|| {
    HashMap::from([
        (
            "Barbell Bench Press",
            ExerciseMeta {
                reasoning: "Optimal for chest hypertrophy with high stimulus-to-fatigue ratio. Targets the entire pectoral complex with minimal joint stress.",
                alternatives: &["Dumbbell Bench Press", "Incline Barbell Press", "Cable Flyes"],
                previous_session: Some(PreviousSession { weight: 185.0, reps: 8 }),
            },
        ),
        (
            "Incline Cable Fly",
            ExerciseMeta {
                reasoning: "Superior to standard pushups for hypertrophy. Cable resistance maintains constant tension through full ROM, targeting upper chest fibers.",
                alternatives: &["Incline Dumbbell Fly", "Pec Deck", "Cable Crossover"],
                previous_session: Some(PreviousSession { weight: 30.0, reps: 12 }),
            },
        ),
        (
            "Face Pulls",
            ExerciseMeta {
                reasoning: "Essential for shoulder health to counteract your heavy pressing volume. Targets rear delts and external rotators, preventing impingement.",
                alternatives: &["Rear Delt Flyes", "Band Pull-Aparts", "Reverse Pec Deck"],
                previous_session: Some(PreviousSession { weight: 25.0, reps: 15 }),
            },
        ),
        (
            "Back Squat",
            ExerciseMeta {
                reasoning: "Primary lower body compound movement. Highest loading potential for quad and glute development with core stability benefits.",
                alternatives: &["Hack Squat", "Bulgarian Split Squat", "Front Squat"],
                previous_session: Some(PreviousSession { weight: 225.0, reps: 8 }),
            },
        ),
        (
            "Deadlift",
            ExerciseMeta {
                reasoning: "Posterior chain developer. Targets hamstrings, glutes, and erectors with unmatched loading capacity for strength and size.",
                alternatives: &["Romanian Deadlift", "Trap Bar Deadlift", "Rack Pulls"],
                previous_session: Some(PreviousSession { weight: 315.0, reps: 5 }),
            },
        ),
        (
            "Lat Pulldown",
            ExerciseMeta {
                reasoning: "Vertical pull pattern for lat width. Allows progressive overload without bodyweight limitations, ideal for hypertrophy.",
                alternatives: &["Weighted Pull-Ups", "Meadows Row", "Cable Pulldown"],
                previous_session: Some(PreviousSession { weight: 120.0, reps: 10 }),
            },
        ),
        (
            "Zottman Curls",
            ExerciseMeta {
                reasoning: "Hits both bicep and brachialis, adding width to the arm. The eccentric pronation targets the brachialis, which most curl variations miss.",
                alternatives: &["Hammer Curls", "Cross-Body Curls", "Cable Curls"],
                previous_session: Some(PreviousSession { weight: 25.0, reps: 10 }),
            },
        ),
    ])
});

pub fn lookup(name: &str) -> Option<&'static ExerciseMeta> {
    EXERCISE_TABLE.get(name)
}

/// Swap alternatives for a table exercise; empty when the name is unknown.
pub fn swap_alternatives(name: &str) -> Vec<String> {
    lookup(name)
        .map(|m| m.alternatives.iter().map(|a| a.to_string()).collect())
        .unwrap_or_default()
}

static DAY_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Push", "Chest, shoulders and triceps. Heavy horizontal and vertical pressing first, shoulder-health work last."),
    ("Pull", "Back and biceps. A hip hinge for the posterior chain, then vertical pulling for lat width."),
    ("Leg", "Quads, hamstrings and glutes. Squat pattern first, hinge second."),
    ("Upper", "All upper-body pushing and pulling in one session."),
    ("Lower", "Squat, hinge and glute work for the whole lower body."),
    ("Full Body", "One compound movement per pattern, every major muscle group in a single session."),
    ("Chest & Back", "Antagonist pairing: horizontal pressing alongside vertical pulling."),
    ("Shoulders & Arms", "Overhead pressing, rear delts and direct arm work."),
];

const DEFAULT_DAY_DESCRIPTION: &str = "A balanced training session built from your plan.";

/// Description for a workout day name.
/// Exact match first, then the longest description key the name starts with.
pub fn workout_day_description(day_name: &str) -> &'static str {
    if let Some((_, desc)) = DAY_DESCRIPTIONS.iter().find(|(k, _)| *k == day_name) {
        return *desc;
    }

    DAY_DESCRIPTIONS
        .iter()
        .filter(|(k, _)| day_name.starts_with(k))
        .max_by_key(|(k, _)| k.len())
        .map(|(_, desc)| *desc)
        .unwrap_or(DEFAULT_DAY_DESCRIPTION)
}

/// Return the closest table exercise for `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
pub fn closest_exercise(input: &str) -> Option<&'static str> {
    let inp = input.trim().to_ascii_lowercase();
    if inp.is_empty() {
        return None;
    }

    let mut scores: Vec<(&'static str, f64)> = EXERCISE_TABLE
        .keys()
        .copied()
        .map(|name| (name, jaro_winkler(&inp, &name.to_ascii_lowercase())))
        .collect();

    // Highest score first, ties broken by name so the result is stable.
    scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let (best, best_score) = *scores.first()?;
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

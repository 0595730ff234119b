//! Rule-based plan generation.
//!
//! Every split is a fixed list of day templates and every day template a fixed
//! list of exercise slots. A slot is either unconditional or gated on one focus
//! area. Generation is a pure function of the profile and the static tables.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::{
    catalog::{self, ExerciseMeta},
    models::{Exercise, GeneratedPlan, PreviousSession, WorkoutDay},
    types::{ExperienceLevel, FocusArea, MetabolismType, Split, UserProfile},
};

struct Slot {
    gate: Option<FocusArea>,
    id: &'static str,
    name: &'static str,
    sets: u32,
    reps: u32,
}

const fn always(id: &'static str, name: &'static str, sets: u32, reps: u32) -> Slot {
    Slot { gate: None, id, name, sets, reps }
}

const fn when(area: FocusArea, id: &'static str, name: &'static str, sets: u32, reps: u32) -> Slot {
    Slot { gate: Some(area), id, name, sets, reps }
}

#[derive(Clone, Copy)]
enum Warmup {
    Shoulders,
    Back,
    LowerBody,
    UpperBody,
    FullBody,
}

impl Warmup {
    fn name(self) -> &'static str {
        match self {
            Self::Shoulders => "Dynamic Shoulder Warmup",
            Self::Back => "Dynamic Back Warmup",
            Self::LowerBody => "Dynamic Lower Body Warmup",
            Self::UpperBody => "Dynamic Upper Body Warmup",
            Self::FullBody => "Dynamic Full Body Warmup",
        }
    }

    fn muscle_group(self) -> &'static str {
        match self {
            Self::Shoulders => "Shoulders",
            Self::Back => "Back",
            Self::LowerBody => "Legs",
            Self::UpperBody => "Upper Body",
            Self::FullBody => "Full Body",
        }
    }

    fn reasoning(self) -> &'static str {
        match self {
            Self::Shoulders => "5-minute dynamic warmup targeting shoulder mobility and activation. Prepares rotator cuff and scapular stabilizers for heavy pressing.",
            Self::Back => "Activates lats and scapular retractors. Prepares posterior chain for heavy pulling.",
            Self::LowerBody => "Hip mobility and activation drills. Prepares hip flexors, glutes, and quads for heavy loading.",
            Self::UpperBody => "Arm circles, band pull-aparts and thoracic rotations. Prepares shoulders and upper back for pressing and pulling in the same session.",
            Self::FullBody => "Hip, thoracic and shoulder mobility flow. Raises tissue temperature and grooves every pattern trained today.",
        }
    }
}

struct DayTemplate {
    id: &'static str,
    name: &'static str,
    warmup_id: &'static str,
    warmup: Warmup,
    slots: &'static [Slot],
}

use FocusArea::{Arms, Chest, Glutes};

static PUSH_PULL_LEGS: &[DayTemplate] = &[
    DayTemplate {
        id: "push-1",
        name: "Push Day 1",
        warmup_id: "warmup-1",
        warmup: Warmup::Shoulders,
        slots: &[
            always("ex-1", "Barbell Bench Press", 4, 8),
            always("ex-2", "Overhead Press", 3, 8),
            when(Chest, "ex-3", "Incline Cable Fly", 3, 12),
            always("ex-4", "Face Pulls", 3, 15),
            always("ex-5", "Tricep Dips", 3, 10),
        ],
    },
    DayTemplate {
        id: "pull-1",
        name: "Pull Day 1",
        warmup_id: "warmup-2",
        warmup: Warmup::Back,
        slots: &[
            always("ex-6", "Deadlift", 4, 5),
            always("ex-7", "Lat Pulldown", 4, 10),
            when(Arms, "ex-8", "Zottman Curls", 3, 10),
        ],
    },
    DayTemplate {
        id: "legs-1",
        name: "Leg Day 1",
        warmup_id: "warmup-3",
        warmup: Warmup::LowerBody,
        slots: &[
            always("ex-10", "Back Squat", 4, 8),
            always("ex-11", "Romanian Deadlift", 3, 8),
            when(Glutes, "ex-12", "Hip Thrust", 3, 12),
        ],
    },
];

static UPPER_LOWER: &[DayTemplate] = &[
    DayTemplate {
        id: "upper-1",
        name: "Upper Day 1",
        warmup_id: "warmup-upper",
        warmup: Warmup::UpperBody,
        slots: &[
            always("ex-upper-1", "Barbell Bench Press", 4, 8),
            always("ex-upper-2", "Lat Pulldown", 4, 10),
            always("ex-upper-3", "Overhead Press", 3, 8),
            always("ex-upper-4", "Face Pulls", 3, 15),
            when(Arms, "ex-upper-5", "Zottman Curls", 3, 10),
        ],
    },
    DayTemplate {
        id: "lower-1",
        name: "Lower Day 1",
        warmup_id: "warmup-lower",
        warmup: Warmup::LowerBody,
        slots: &[
            always("ex-lower-1", "Back Squat", 4, 8),
            always("ex-lower-2", "Romanian Deadlift", 3, 8),
            always("ex-lower-3", "Deadlift", 3, 5),
            when(Glutes, "ex-lower-4", "Hip Thrust", 3, 12),
        ],
    },
];

static FULL_BODY: &[DayTemplate] = &[DayTemplate {
    id: "full-1",
    name: "Full Body Day 1",
    warmup_id: "warmup-full",
    warmup: Warmup::FullBody,
    slots: &[
        always("ex-full-1", "Back Squat", 3, 8),
        always("ex-full-2", "Barbell Bench Press", 3, 8),
        always("ex-full-3", "Lat Pulldown", 3, 10),
        always("ex-full-4", "Romanian Deadlift", 3, 8),
        always("ex-full-5", "Face Pulls", 3, 15),
        when(Arms, "ex-full-6", "Zottman Curls", 3, 10),
    ],
}];

static ARNOLD_SPLIT: &[DayTemplate] = &[
    DayTemplate {
        id: "chest-back-1",
        name: "Chest & Back Day 1",
        warmup_id: "warmup-chest-back",
        warmup: Warmup::UpperBody,
        slots: &[
            always("ex-arnold-1", "Barbell Bench Press", 4, 8),
            always("ex-arnold-2", "Lat Pulldown", 4, 10),
            when(Chest, "ex-arnold-3", "Incline Cable Fly", 3, 12),
            always("ex-arnold-4", "Deadlift", 3, 5),
        ],
    },
    DayTemplate {
        id: "shoulders-arms-1",
        name: "Shoulders & Arms Day 1",
        warmup_id: "warmup-shoulders-arms",
        warmup: Warmup::Shoulders,
        slots: &[
            always("ex-arnold-5", "Overhead Press", 4, 8),
            always("ex-arnold-6", "Face Pulls", 3, 15),
            when(Arms, "ex-arnold-7", "Zottman Curls", 3, 10),
            when(Arms, "ex-arnold-8", "Tricep Dips", 3, 10),
        ],
    },
    DayTemplate {
        id: "arnold-legs-1",
        name: "Leg Day 1",
        warmup_id: "warmup-arnold-legs",
        warmup: Warmup::LowerBody,
        slots: &[
            always("ex-arnold-9", "Back Squat", 4, 8),
            always("ex-arnold-10", "Romanian Deadlift", 3, 8),
            when(Glutes, "ex-arnold-11", "Hip Thrust", 3, 12),
        ],
    },
];

/// Movement pattern and muscle group per exercise name.
static MOVEMENTS: &[(&str, &str, &str)] = &[
    ("Barbell Bench Press", "Horizontal Push", "Chest"),
    ("Overhead Press", "Vertical Push", "Shoulders"),
    ("Incline Cable Fly", "Isolation", "Chest"),
    ("Face Pulls", "Horizontal Pull", "Rear Delts"),
    ("Tricep Dips", "Isolation", "Triceps"),
    ("Deadlift", "Hip Hinge", "Back"),
    ("Lat Pulldown", "Vertical Pull", "Back"),
    ("Zottman Curls", "Isolation", "Biceps"),
    ("Back Squat", "Squat", "Legs"),
    ("Romanian Deadlift", "Hip Hinge", "Legs"),
    ("Hip Thrust", "Hip Extension", "Glutes"),
];

/// Metadata for plan exercises that are not in the shared table.
static INLINE_META: Lazy<HashMap<&'static str, ExerciseMeta>> = Lazy::new(|| {
    HashMap::from([
        (
            "Overhead Press",
            ExerciseMeta {
                reasoning: "Vertical pressing pattern for anterior deltoids. Complements horizontal pressing for complete shoulder development.",
                alternatives: &["Dumbbell Shoulder Press", "Arnold Press", "Push Press"],
                previous_session: Some(PreviousSession { weight: 135.0, reps: 8 }),
            },
        ),
        (
            "Tricep Dips",
            ExerciseMeta {
                reasoning: "Tricep finisher with bodyweight progression. Targets all three tricep heads for complete arm development.",
                alternatives: &["Overhead Tricep Extension", "Close-Grip Bench", "Cable Pushdowns"],
                previous_session: Some(PreviousSession { weight: 0.0, reps: 10 }),
            },
        ),
        (
            "Romanian Deadlift",
            ExerciseMeta {
                reasoning: "Hamstring and glute developer with emphasis on eccentric loading. Complements squat pattern.",
                alternatives: &["Leg Curls", "Good Mornings", "Single-Leg RDL"],
                previous_session: Some(PreviousSession { weight: 225.0, reps: 8 }),
            },
        ),
        (
            "Hip Thrust",
            ExerciseMeta {
                reasoning: "Direct glute activation with high loading potential. Targets glute max for size and strength.",
                alternatives: &["Bulgarian Split Squat", "Lunges", "Step-Ups"],
                previous_session: Some(PreviousSession { weight: 185.0, reps: 12 }),
            },
        ),
    ])
});

/// Resolves the split: an explicit preference wins, otherwise days per week decide.
/// Arnold is only reachable by asking for it.
pub fn resolve_split(profile: &UserProfile) -> Split {
    match profile.split_preference.fixed() {
        Some(split) => split,
        None if profile.days_per_week >= 6 => Split::PushPullLegs,
        None if profile.days_per_week >= 4 => Split::UpperLower,
        None => Split::FullBody,
    }
}

fn templates(split: Split) -> &'static [DayTemplate] {
    match split {
        Split::PushPullLegs => PUSH_PULL_LEGS,
        Split::UpperLower => UPPER_LOWER,
        Split::FullBody => FULL_BODY,
        Split::ArnoldSplit => ARNOLD_SPLIT,
    }
}

fn warmup_exercise(template: &DayTemplate) -> Exercise {
    let warmup = template.warmup;
    Exercise {
        id: template.warmup_id.to_string(),
        name: warmup.name().to_string(),
        movement_pattern: "Warmup".to_string(),
        muscle_group: warmup.muscle_group().to_string(),
        sets: 1,
        reps: 10,
        target_weight: None,
        reasoning: warmup.reasoning().to_string(),
        alternatives: Vec::new(),
        previous_session: None,
    }
}

fn slot_exercise(slot: &Slot) -> Exercise {
    let (pattern, muscle) = MOVEMENTS
        .iter()
        .find(|(name, _, _)| *name == slot.name)
        .map(|(_, p, m)| (*p, *m))
        .unwrap_or(("General", "Full Body"));

    let meta = catalog::lookup(slot.name).or_else(|| INLINE_META.get(slot.name));

    Exercise {
        id: slot.id.to_string(),
        name: slot.name.to_string(),
        movement_pattern: pattern.to_string(),
        muscle_group: muscle.to_string(),
        sets: slot.sets,
        reps: slot.reps,
        target_weight: None,
        reasoning: meta.map(|m| m.reasoning.to_string()).unwrap_or_default(),
        alternatives: meta
            .map(|m| m.alternatives.iter().map(|a| a.to_string()).collect())
            .unwrap_or_default(),
        previous_session: meta.and_then(|m| m.previous_session),
    }
}

fn build_day(template: &DayTemplate, profile: &UserProfile) -> WorkoutDay {
    let mut exercises = Vec::with_capacity(template.slots.len() + 1);

    if profile.has_focus(FocusArea::Mobility) {
        exercises.push(warmup_exercise(template));
    }

    exercises.extend(
        template
            .slots
            .iter()
            .filter(|s| s.gate.is_none_or(|area| profile.has_focus(area)))
            .map(slot_exercise),
    );

    WorkoutDay {
        id: template.id.to_string(),
        name: template.name.to_string(),
        exercises,
    }
}

fn rationale(split: Split, profile: &UserProfile) -> String {
    let mut text = format!(
        "Generated a {} split optimized for {}. ",
        split,
        profile.goal.to_string().to_lowercase()
    );

    if profile.metabolism_type == MetabolismType::Fast {
        text.push_str("Higher volume programming to match your fast metabolism. ");
    }
    if profile.has_focus(FocusArea::Mobility) {
        text.push_str("Dynamic warmups included for mobility and injury prevention. ");
    }
    if profile.experience_level == ExperienceLevel::Beginner {
        text.push_str("Progressive overload structure suitable for beginners.");
    } else {
        text.push_str("Advanced periodization with varied rep ranges and optimal exercise selection.");
    }

    text
}

/// Builds the weekly plan for `profile`. Same profile, same plan.
pub fn generate_plan(profile: &UserProfile) -> GeneratedPlan {
    let split = resolve_split(profile);
    let days: Vec<WorkoutDay> = templates(split)
        .iter()
        .map(|t| build_day(t, profile))
        .collect();

    tracing::debug!(%split, days = days.len(), "generated plan");

    GeneratedPlan {
        split,
        rationale: rationale(split, profile),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Goal, SplitPreference};
    use std::collections::{BTreeSet, HashSet};

    fn profile(split: SplitPreference, days: u8, focus: &[FocusArea]) -> UserProfile {
        UserProfile {
            goal: Goal::GainMuscle,
            experience_level: ExperienceLevel::Intermediate,
            metabolism_type: MetabolismType::Normal,
            days_per_week: days,
            split_preference: split,
            focus_areas: focus.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    fn names(day: &WorkoutDay) -> Vec<&str> {
        day.exercises.iter().map(|e| e.name.as_str()).collect()
    }

    const ALL_SPLITS: [SplitPreference; 4] = [
        SplitPreference::PushPullLegs,
        SplitPreference::UpperLower,
        SplitPreference::ArnoldSplit,
        SplitPreference::FullBody,
    ];

    #[test]
    fn same_profile_same_plan() {
        let p = profile(SplitPreference::AiDecide, 6, &[Chest, FocusArea::Mobility]);
        assert_eq!(generate_plan(&p), generate_plan(&p));
    }

    #[test]
    fn explicit_split_is_kept() {
        for pref in ALL_SPLITS {
            for days in [1, 4, 7] {
                let plan = generate_plan(&profile(pref, days, &[]));
                assert_eq!(Some(plan.split), pref.fixed());
            }
        }
    }

    #[test]
    fn ai_decide_thresholds_on_days() {
        let split = |days| resolve_split(&profile(SplitPreference::AiDecide, days, &[]));
        assert_eq!(split(7), Split::PushPullLegs);
        assert_eq!(split(6), Split::PushPullLegs);
        assert_eq!(split(5), Split::UpperLower);
        assert_eq!(split(4), Split::UpperLower);
        assert_eq!(split(3), Split::FullBody);
        assert_eq!(split(2), Split::FullBody);
    }

    #[test]
    fn ppl_matches_fixed_layout() {
        let plan = generate_plan(&profile(SplitPreference::PushPullLegs, 6, &[]));
        let days: Vec<&str> = plan.days.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(days, ["Push Day 1", "Pull Day 1", "Leg Day 1"]);
        assert_eq!(
            names(&plan.days[0]),
            ["Barbell Bench Press", "Overhead Press", "Face Pulls", "Tricep Dips"]
        );

        let bench = &plan.days[0].exercises[0];
        assert_eq!(bench.id, "ex-1");
        assert_eq!((bench.sets, bench.reps), (4, 8));
        assert_eq!(bench.movement_pattern, "Horizontal Push");
        assert_eq!(bench.previous_session, Some(PreviousSession { weight: 185.0, reps: 8 }));
    }

    #[test]
    fn inline_metadata_for_untabled_exercises() {
        let plan = generate_plan(&profile(SplitPreference::PushPullLegs, 6, &[]));
        let ohp = &plan.days[0].exercises[1];
        assert_eq!(ohp.name, "Overhead Press");
        assert_eq!(ohp.alternatives[0], "Dumbbell Shoulder Press");
        assert!(ohp.reasoning.starts_with("Vertical pressing pattern"));
    }

    #[test]
    fn chest_focus_gates_incline_fly() {
        let with = generate_plan(&profile(SplitPreference::PushPullLegs, 6, &[Chest]));
        let without = generate_plan(&profile(SplitPreference::PushPullLegs, 6, &[]));
        assert!(names(&with.days[0]).contains(&"Incline Cable Fly"));
        assert!(!names(&without.days[0]).contains(&"Incline Cable Fly"));

        let arnold = generate_plan(&profile(SplitPreference::ArnoldSplit, 3, &[Chest]));
        assert!(names(&arnold.days[0]).contains(&"Incline Cable Fly"));
    }

    #[test]
    fn arms_focus_gates_zottman_curls() {
        let cases = [
            (SplitPreference::PushPullLegs, 1),
            (SplitPreference::UpperLower, 0),
            (SplitPreference::FullBody, 0),
            (SplitPreference::ArnoldSplit, 1),
        ];
        for (pref, day) in cases {
            let with = generate_plan(&profile(pref, 4, &[Arms]));
            let without = generate_plan(&profile(pref, 4, &[]));
            assert!(names(&with.days[day]).contains(&"Zottman Curls"), "{pref}");
            assert!(!names(&without.days[day]).contains(&"Zottman Curls"), "{pref}");
        }

        let arnold = generate_plan(&profile(SplitPreference::ArnoldSplit, 4, &[Arms]));
        assert!(names(&arnold.days[1]).contains(&"Tricep Dips"));
        let arnold = generate_plan(&profile(SplitPreference::ArnoldSplit, 4, &[]));
        assert!(!names(&arnold.days[1]).contains(&"Tricep Dips"));
    }

    #[test]
    fn glutes_focus_gates_hip_thrust() {
        let cases = [
            (SplitPreference::PushPullLegs, 2),
            (SplitPreference::UpperLower, 1),
            (SplitPreference::ArnoldSplit, 2),
        ];
        for (pref, day) in cases {
            let with = generate_plan(&profile(pref, 4, &[Glutes]));
            let without = generate_plan(&profile(pref, 4, &[]));
            assert!(names(&with.days[day]).contains(&"Hip Thrust"), "{pref}");
            assert!(!names(&without.days[day]).contains(&"Hip Thrust"), "{pref}");
        }
    }

    #[test]
    fn mobility_prepends_one_warmup_per_day() {
        for pref in ALL_SPLITS {
            let plan = generate_plan(&profile(pref, 4, &[FocusArea::Mobility]));
            for day in &plan.days {
                let first = &day.exercises[0];
                assert_eq!(first.movement_pattern, "Warmup");
                assert_eq!((first.sets, first.reps), (1, 10));
                assert!(first.alternatives.is_empty());
                let warmups = day
                    .exercises
                    .iter()
                    .filter(|e| e.movement_pattern == "Warmup")
                    .count();
                assert_eq!(warmups, 1);
            }

            let plain = generate_plan(&profile(pref, 4, &[]));
            assert!(
                plain
                    .days
                    .iter()
                    .flat_map(|d| &d.exercises)
                    .all(|e| e.movement_pattern != "Warmup")
            );
        }
    }

    #[test]
    fn ids_are_unique_within_a_plan() {
        let all = [Chest, Arms, Glutes, FocusArea::Mobility];
        for pref in ALL_SPLITS {
            let plan = generate_plan(&profile(pref, 4, &all));
            let mut seen = HashSet::new();
            for e in plan.days.iter().flat_map(|d| &d.exercises) {
                assert!(seen.insert(e.id.clone()), "duplicate id {}", e.id);
            }
            let day_ids: HashSet<_> = plan.days.iter().map(|d| &d.id).collect();
            assert_eq!(day_ids.len(), plan.days.len());
        }
    }

    #[test]
    fn every_template_exercise_has_a_movement_and_metadata() {
        for split in [Split::PushPullLegs, Split::UpperLower, Split::FullBody, Split::ArnoldSplit] {
            for slot in templates(split).iter().flat_map(|t| t.slots) {
                assert!(MOVEMENTS.iter().any(|(n, _, _)| *n == slot.name), "{}", slot.name);
                assert!(
                    catalog::lookup(slot.name).is_some() || INLINE_META.contains_key(slot.name),
                    "{}",
                    slot.name
                );
            }
        }
    }

    #[test]
    fn rationale_is_assembled_in_order() {
        let mut p = profile(SplitPreference::PushPullLegs, 6, &[FocusArea::Mobility]);
        p.metabolism_type = MetabolismType::Fast;
        p.experience_level = ExperienceLevel::Beginner;

        assert_eq!(
            generate_plan(&p).rationale,
            "Generated a Push/Pull/Legs split optimized for gain muscle. \
             Higher volume programming to match your fast metabolism. \
             Dynamic warmups included for mobility and injury prevention. \
             Progressive overload structure suitable for beginners."
        );

        let p = profile(SplitPreference::AiDecide, 2, &[]);
        assert_eq!(
            generate_plan(&p).rationale,
            "Generated a Full Body split optimized for gain muscle. \
             Advanced periodization with varied rep ranges and optimal exercise selection."
        );
    }
}

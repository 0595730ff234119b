use anyhow::{Context, Result};
use apex::{
    coach::Coach,
    models::{GeneratedPlan, Suggestion, WorkoutDay, WorkoutSession},
    storage::{self, Store},
    types::{OutputFmt, Rir, emit},
    utils,
};
use chrono::Local;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;

use super::{paint_zone, plan::print_day, print_suggestions, require_plan};
use crate::cli::SessionCmd;

#[derive(Serialize)]
struct FinishedJson<'a> {
    session: &'a WorkoutSession,
    suggestions: &'a [Suggestion],
}

pub fn handle(cmd: SessionCmd, store: &dyn Store, fmt: OutputFmt) -> Result<()> {
    match cmd {
        SessionCmd::Start { day } => {
            if let Some(active) = load_active(store)? {
                eprintln!(
                    "{} there is already an active session (id: {})",
                    "error:".red().bold(),
                    active.id
                );
                return Ok(());
            }

            let Some(plan) = require_plan(store)? else {
                return Ok(());
            };

            let picked = match &day {
                Some(id) => plan.day(id),
                None => storage::scheduled_day(&plan, storage::today()),
            };
            let Some(picked) = picked else {
                match day {
                    Some(id) => eprintln!("{} no day `{}` in the plan", "error:".red().bold(), id),
                    None => eprintln!("{} nothing is scheduled today", "error:".red().bold()),
                }
                eprintln!(
                    "{} pass one of: {}",
                    "note:".yellow().bold(),
                    plan.days.iter().map(|d| d.id.as_str()).join(", ")
                );
                return Ok(());
            };

            let history = store
                .load_workout_history()
                .context("Failed to load workout history")?;
            let mut day = picked.clone();
            storage::refresh_previous_sessions(&mut day, &history);

            let session = WorkoutSession::start(&day, Local::now());
            store
                .save_active_session(&session)
                .context("Failed to save session")?;

            emit(fmt, &session, || {
                print_day(&day);
                println!(
                    "\n{} session started (id: {})",
                    "ok:".green().bold(),
                    session.id
                );
            });
        }

        SessionCmd::Log {
            weight,
            reps,
            rir,
            exercise,
        } => {
            let Some((mut session, plan)) = active_with_plan(store)? else {
                return Ok(());
            };
            let Some(day) = plan_day(&plan, &session) else {
                return Ok(());
            };

            let weight = if weight.eq_ignore_ascii_case("bw") {
                0.0
            } else {
                match weight.parse::<f64>() {
                    Ok(w) => w,
                    Err(_) => {
                        eprintln!("{} invalid weight: {}", "error:".red().bold(), weight);
                        return Ok(());
                    }
                }
            };

            if rir > Rir::MAX {
                eprintln!(
                    "{} RIR {} is out of range, logging it as {}",
                    "warning:".yellow().bold(),
                    rir,
                    Rir::MAX
                );
            }

            let exercise_id = match exercise {
                Some(id) => id,
                None => match session.first_unfinished(day) {
                    Some(ex) => ex.id.clone(),
                    None => {
                        eprintln!(
                            "{} every set is logged, run `apex session finish`",
                            "note:".yellow().bold()
                        );
                        return Ok(());
                    }
                },
            };

            let set = match session.log_set(day, &exercise_id, weight, reps, Rir::new(rir), Local::now()) {
                Ok(set) => set.clone(),
                Err(e) => {
                    eprintln!("{} {}", "error:".red().bold(), e);
                    return Ok(());
                }
            };
            store
                .save_active_session(&session)
                .context("Failed to save session")?;

            emit(fmt, &set, || {
                let logged = session.sets_logged(&set.exercise_id);
                let prescribed = day.exercise(&set.exercise_id).map(|e| e.sets).unwrap_or(0);
                let zone = set.rir.zone();
                println!(
                    "{} {} {} × {} @ RIR {} {}",
                    "ok:".green().bold(),
                    set.exercise_name.bold(),
                    format_weight(set.weight),
                    set.reps,
                    paint_zone(set.rir.to_string(), zone),
                    format!("({})", zone.label()).dimmed()
                );
                println!("   set {}/{}", logged, prescribed);
                if let Some(next) = session.first_unfinished(day) {
                    println!("   {} {}", "next:".cyan(), next.name);
                } else {
                    println!(
                        "   {} all sets logged, run `apex session finish`",
                        "done:".green()
                    );
                }
            });
        }

        SessionCmd::Show => {
            let Some((session, plan)) = active_with_plan(store)? else {
                return Ok(());
            };

            emit(fmt, &session, || {
                let elapsed = Local::now() - session.date;
                println!(
                    "{} {} (started {}, {} elapsed)",
                    "Session:".cyan().bold(),
                    session.day_name.bold(),
                    session.date.format("%H:%M"),
                    utils::format_duration(elapsed)
                );

                match plan.day(&session.day_id) {
                    Some(day) => print_progress(&session, day),
                    None => eprintln!(
                        "{} plan day `{}` no longer exists",
                        "warning:".yellow().bold(),
                        session.day_id
                    ),
                }
            });
        }

        SessionCmd::Finish => {
            let Some((mut session, plan)) = active_with_plan(store)? else {
                return Ok(());
            };
            let Some(day) = plan_day(&plan, &session) else {
                return Ok(());
            };

            if let Err(e) = session.finish(day, Local::now()) {
                eprintln!("{} {}", "error:".red().bold(), e);
                return Ok(());
            }

            // The finished session is part of the history the coach reads.
            store
                .append_workout(&session)
                .context("Failed to save workout")?;
            store
                .clear_active_session()
                .context("Failed to clear session")?;

            let suggestions = Coach::new(store).analyze_workout(&session, day);
            for s in &suggestions {
                store
                    .append_suggestion(s)
                    .context("Failed to save suggestion")?;
            }

            let out = FinishedJson {
                session: &session,
                suggestions: &suggestions,
            };
            emit(fmt, &out, || {
                println!(
                    "{} session finished (id: {})",
                    "ok:".green().bold(),
                    session.id
                );
                println!(
                    "{} {} in {} min, {} sets",
                    "Session:".cyan().bold(),
                    session.day_name.bold(),
                    session.duration.unwrap_or(0),
                    session.sets.len()
                );
                print_progress(&session, day);

                if suggestions.is_empty() {
                    println!("\n{}", "No changes suggested, keep it up.".dimmed());
                } else {
                    println!("\n{}", "Coach:".cyan().bold());
                    print_suggestions(&suggestions);
                }
            });
        }

        SessionCmd::Cancel => {
            if let Some(active) = load_active(store)? {
                store
                    .clear_active_session()
                    .context("Failed to clear session")?;
                println!("{} session cancelled (id: {})", "ok:".green().bold(), active.id);
            } else {
                eprintln!("{} no active session to cancel", "error:".red().bold());
            }
        }
    }

    Ok(())
}

fn load_active(store: &dyn Store) -> Result<Option<WorkoutSession>> {
    store
        .load_active_session()
        .context("Failed to load active session")
}

fn active_with_plan(store: &dyn Store) -> Result<Option<(WorkoutSession, GeneratedPlan)>> {
    let Some(session) = load_active(store)? else {
        eprintln!("{} no active session", "error:".red().bold());
        return Ok(None);
    };
    Ok(require_plan(store)?.map(|plan| (session, plan)))
}

fn plan_day<'p>(plan: &'p GeneratedPlan, session: &WorkoutSession) -> Option<&'p WorkoutDay> {
    let day = plan.day(&session.day_id);
    if day.is_none() {
        eprintln!(
            "{} plan day `{}` no longer exists, run `apex session cancel`",
            "error:".red().bold(),
            session.day_id
        );
    }
    day
}

fn format_weight(weight: f64) -> String {
    if weight == 0.0 {
        "bw".to_string()
    } else {
        format!("{} lbs", weight)
    }
}

fn print_progress(session: &WorkoutSession, day: &WorkoutDay) {
    println!("\n{}", "Exercises:".cyan().bold());
    for ex in &day.exercises {
        let sets = session
            .sets
            .iter()
            .filter(|s| s.exercise_id == ex.id)
            .collect::<Vec<_>>();
        let count = format!("{}/{}", sets.len(), ex.sets);
        let count = if sets.len() >= ex.sets as usize {
            count.green()
        } else {
            count.yellow()
        };

        println!("• {} {}", ex.name.bold(), count);
        for s in sets {
            println!(
                "  - {} × {} @ RIR {}",
                format_weight(s.weight),
                s.reps,
                paint_zone(s.rir.to_string(), s.rir.zone())
            );
        }
    }
}

use anyhow::{Context, Result};
use apex::{
    catalog,
    models::{Exercise, WorkoutDay, WorkoutSession},
    plan::generate_plan,
    storage::{self, Store},
    types::{OutputFmt, Split, emit},
    utils,
};
use chrono::{Duration, NaiveDate};
use colored::Colorize;
use serde::Serialize;

use super::{parse_date, plain_len, require_plan};
use crate::cli::PlanCmd;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekRow {
    date: NaiveDate,
    day_id: Option<String>,
    day_name: Option<String>,
    completed: bool,
}

pub fn handle(cmd: PlanCmd, store: &dyn Store, fmt: OutputFmt) -> Result<()> {
    match cmd {
        PlanCmd::Show { day } => {
            let Some(mut plan) = require_plan(store)? else {
                return Ok(());
            };
            let history = store
                .load_workout_history()
                .context("Failed to load workout history")?;
            for d in &mut plan.days {
                storage::refresh_previous_sessions(d, &history);
            }

            if let Some(id) = day {
                let Some(d) = plan.day(&id) else {
                    eprintln!("{} no day `{}` in the plan", "error:".red().bold(), id);
                    return Ok(());
                };
                emit(fmt, d, || {
                    print_day(d);
                    println!("{}", times_trained(&history, &d.id).dimmed());
                });
                return Ok(());
            }

            emit(fmt, &plan, || {
                println!(
                    "{} {}",
                    "Plan:".cyan().bold(),
                    plan.split.to_string().bold()
                );
                println!("{}\n", plan.rationale.dimmed());
                for d in &plan.days {
                    print_day(d);
                    println!("{}\n", times_trained(&history, &d.id).dimmed());
                }
            });
        }

        PlanCmd::Week { date } => {
            let Some(plan) = require_plan(store)? else {
                return Ok(());
            };
            let history = store
                .load_workout_history()
                .context("Failed to load workout history")?;

            let start = utils::week_start(parse_date(date.as_deref())?);
            let today = storage::today();

            let rows: Vec<WeekRow> = (0..7)
                .map(|i| {
                    let date = start + Duration::days(i);
                    let day = storage::scheduled_day(&plan, date);
                    WeekRow {
                        date,
                        day_id: day.map(|d| d.id.clone()),
                        day_name: day.map(|d| d.name.clone()),
                        completed: day
                            .is_some_and(|d| storage::day_completed_on(&history, &d.id, date)),
                    }
                })
                .collect();

            emit(fmt, &rows, || {
                println!(
                    "\n{} {}",
                    "Week of".cyan().bold(),
                    start.format("%b %d %Y").to_string().bold()
                );
                for row in &rows {
                    let label = format!("{}", row.date.format("%a %d"));
                    let label = if row.date == today {
                        label.bold().underline()
                    } else {
                        label.normal()
                    };
                    match &row.day_name {
                        Some(name) if row.completed => {
                            println!("  {}  {} {}", label, name.green(), "✓".green().bold())
                        }
                        Some(name) => println!("  {}  {}", label, name.bold()),
                        None => println!("  {}  {}", label, "rest".dimmed()),
                    }
                }
                println!();
            });
        }

        PlanCmd::Regenerate => {
            let Some(profile) = store.load_profile().context("Failed to load profile")? else {
                eprintln!(
                    "{} no profile yet, run `apex profile set`",
                    "error:".red().bold()
                );
                return Ok(());
            };

            let plan = generate_plan(&profile);
            store.save_plan(&plan).context("Failed to save plan")?;
            emit(fmt, &plan, || {
                println!("{} {}", "ok:".green().bold(), regenerated_notice(plan.split));
            });
        }
    }

    Ok(())
}

fn regenerated_notice(split: Split) -> String {
    format!(
        "regenerated the {split} plan. Edits from applied suggestions were dropped, \
         those suggestions stay marked applied and may refer to different exercises now"
    )
}

fn times_trained(history: &[WorkoutSession], day_id: &str) -> String {
    let sessions = storage::workouts_for_day(history, day_id);
    match sessions.last() {
        None => "not trained yet".to_string(),
        Some(last) => format!(
            "trained {}×, last on {}",
            sessions.len(),
            last.date.format("%a %d %b")
        ),
    }
}

pub fn print_day(day: &WorkoutDay) {
    println!("{} {}", day.name.bold().cyan(), format!("({})", day.id).dimmed());
    println!("{}", catalog::workout_day_description(&day.name).dimmed());

    let left: Vec<String> = day
        .exercises
        .iter()
        .enumerate()
        .map(|(i, ex)| {
            format!(
                " {} • {} {}×{}",
                format!("{}", i + 1).yellow(),
                ex.name.bold(),
                ex.sets,
                ex.reps
            )
        })
        .collect();
    let pad = left.iter().map(|s| plain_len(s)).max().unwrap_or(0);

    for (l, ex) in left.into_iter().zip(&day.exercises) {
        let extra_hidden = l.chars().count() - plain_len(&l);
        println!(
            "{:<total_pad$} {} {}",
            l,
            "|".blue(),
            details(ex),
            total_pad = pad + extra_hidden
        );
    }
}

fn details(ex: &Exercise) -> String {
    let mut parts = vec![ex.id.dimmed().to_string()];
    if let Some(w) = ex.target_weight {
        parts.push(format!("target {} lbs", w).green().to_string());
    }
    if let Some(prev) = ex.previous_session {
        parts.push(format!("last {} × {}", prev.weight, prev.reps).dimmed().to_string());
    }
    parts.join("  ")
}

use anyhow::Result;
use apex::{
    coach::Coach,
    models::Trend,
    storage::Store,
    types::{OutputFmt, emit},
};
use colored::Colorize;

use super::require_plan;

pub fn handle(exercise_id: String, store: &dyn Store, fmt: OutputFmt) -> Result<()> {
    let Some(plan) = require_plan(store)? else {
        return Ok(());
    };
    let Some(exercise) = plan
        .days
        .iter()
        .flat_map(|d| d.exercises.iter())
        .find(|e| e.id == exercise_id)
    else {
        eprintln!("{} no exercise `{}` in the plan", "error:".red().bold(), exercise_id);
        return Ok(());
    };

    let progress = Coach::new(store).exercise_progress(&exercise.id);

    emit(fmt, &progress, || {
        let trend = match progress.trend {
            Trend::Up => "↑ up".green().bold(),
            Trend::Down => "↓ down".red().bold(),
            Trend::Stable => "→ stable".yellow().bold(),
        };
        println!("{} {}", exercise.name.bold(), format!("({})", exercise.id).dimmed());
        println!("  {:<14} {}", "trend", trend);
        println!("  {:<14} {:+.1} lbs", "weight change", progress.weight_change);
        println!("  {:<14} {:.1}", "avg RIR", progress.avg_rir);
    });

    Ok(())
}

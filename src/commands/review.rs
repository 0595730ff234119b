use anyhow::{Context, Result};
use apex::{
    coach::Coach,
    models::{Suggestion, WeeklySummary},
    storage::{self, Store},
    types::{OutputFmt, emit},
    utils,
};
use colored::Colorize;
use serde::Serialize;

use super::{parse_date, print_suggestions, require_plan};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewJson<'a> {
    summary: &'a WeeklySummary,
    new_suggestions: &'a [Suggestion],
}

pub fn handle(week: Option<String>, store: &dyn Store, fmt: OutputFmt) -> Result<()> {
    let Some(plan) = require_plan(store)? else {
        return Ok(());
    };
    let start = utils::week_start(parse_date(week.as_deref())?);

    let summary = storage::weekly_summary(store, start);

    // An open suggestion with the same exercise and payload is not repeated.
    let fresh: Vec<Suggestion> = Coach::new(store)
        .weekly_review(start, &plan)
        .into_iter()
        .filter(|s| {
            !summary
                .suggestions
                .iter()
                .any(|o| o.exercise_id == s.exercise_id && o.kind == s.kind)
        })
        .collect();
    for s in &fresh {
        store
            .append_suggestion(s)
            .context("Failed to save suggestion")?;
    }

    let out = ReviewJson {
        summary: &summary,
        new_suggestions: &fresh,
    };
    emit(fmt, &out, || {
        println!(
            "\n{} {} – {}",
            "Week".cyan().bold(),
            summary.week_start.format("%b %d"),
            summary.week_end.format("%b %d %Y")
        );
        let count = format!("{}/{}", summary.workouts_completed, summary.total_workouts);
        println!(
            "  {} workouts completed",
            if summary.workouts_completed >= summary.total_workouts && summary.total_workouts > 0 {
                count.green().bold()
            } else {
                count.yellow().bold()
            }
        );
        println!("  {}", summary.progress_summary);

        if !fresh.is_empty() {
            println!("\n{}", "New this review:".cyan().bold());
            print_suggestions(&fresh);
        }
        if !summary.suggestions.is_empty() {
            println!("\n{}", "Still open:".cyan().bold());
            print_suggestions(&summary.suggestions);
        }
        if fresh.is_empty() && summary.suggestions.is_empty() {
            println!("\n{}", "Nothing to change this week.".dimmed());
        }
    });

    Ok(())
}

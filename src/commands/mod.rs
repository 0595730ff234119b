use anyhow::{Context, Result};
use apex::{
    models::{GeneratedPlan, Suggestion, SuggestionKind},
    storage::{self, Store},
    types::RirZone,
};
use chrono::NaiveDate;
use colored::{ColoredString, Colorize};

pub mod config;
pub mod plan;
pub mod profile;
pub mod progress;
pub mod review;
pub mod session;
pub mod suggest;
pub mod swap;

/// Parses the DD-MM-YYYY dates the CLI accepts, defaulting to today.
pub fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s, "%d-%m-%Y")
            .with_context(|| format!("invalid date `{}`, expected DD-MM-YYYY", s)),
        None => Ok(storage::today()),
    }
}

/// The stored plan. Prints a hint and returns `None` when there is none yet.
pub fn require_plan(store: &dyn Store) -> Result<Option<GeneratedPlan>> {
    let plan = store.load_plan().context("Failed to load plan")?;
    if plan.is_none() {
        eprintln!(
            "{} no plan yet, run `apex profile set` first",
            "error:".red().bold()
        );
    }
    Ok(plan)
}

/// Printable width of a string that may contain ANSI colour codes.
pub fn plain_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut count = 0;
    while i < bytes.len() {
        if bytes[i] == 0x1B {
            while i < bytes.len() && bytes[i] != b'm' {
                i += 1;
            }
            i += 1;
        } else if bytes[i] & 0xC0 != 0x80 {
            count += 1;
            i += 1;
        } else {
            i += 1;
        }
    }

    count
}

pub fn paint_zone(text: String, zone: RirZone) -> ColoredString {
    match zone {
        RirZone::Failure => text.red(),
        RirZone::Optimal => text.yellow(),
        RirZone::Easy => text.green(),
    }
}

/// One-line headline for a suggestion, e.g. `185 → 194 lbs`.
pub fn headline(s: &Suggestion) -> String {
    match &s.kind {
        SuggestionKind::Weight { current, suggested } => {
            format!("{} → {} lbs", current, suggested)
        }
        SuggestionKind::Volume { change } => change.to_string(),
        SuggestionKind::Swap { from, to } => format!("{} → {}", from, to),
    }
}

pub fn print_suggestions(suggestions: &[Suggestion]) {
    for s in suggestions {
        let tag = format!("[{}]", s.kind.tag());
        let status = if s.applied {
            "applied".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "{} {} {} {} {}",
            "•".cyan(),
            tag.magenta(),
            s.exercise_name.bold(),
            headline(s).yellow(),
            status
        );
        println!("    {}", s.reason.dimmed());
        println!("    {} {}", "id:".dimmed(), s.id.dimmed());
    }
}

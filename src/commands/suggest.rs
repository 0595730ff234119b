use anyhow::{Context, Result};
use apex::{
    coach::apply_to_plan,
    models::Suggestion,
    storage::Store,
    types::{OutputFmt, emit},
};
use colored::Colorize;

use super::{headline, print_suggestions, require_plan};
use crate::cli::SuggestCmd;

pub fn handle(cmd: SuggestCmd, store: &dyn Store, fmt: OutputFmt) -> Result<()> {
    match cmd {
        SuggestCmd::List { all } => {
            let suggestions: Vec<Suggestion> = store
                .load_suggestions()
                .context("Failed to load suggestions")?
                .into_iter()
                .filter(|s| all || !s.applied)
                .collect();

            emit(fmt, &suggestions, || {
                println!("{}", "Suggestions:".cyan().bold());
                if suggestions.is_empty() {
                    println!("{}", "  (no open suggestions)".dimmed());
                } else {
                    print_suggestions(&suggestions);
                }
            });
        }

        SuggestCmd::Apply { id } => {
            let Some(suggestion) = store
                .load_suggestions()
                .context("Failed to load suggestions")?
                .into_iter()
                .find(|s| s.id == id)
            else {
                eprintln!("{} no suggestion with id `{}`", "error:".red().bold(), id);
                return Ok(());
            };
            let Some(mut plan) = require_plan(store)? else {
                return Ok(());
            };

            let changed = apply_to_plan(&mut plan, &suggestion);
            if !store
                .mark_suggestion_applied(&id)
                .context("Failed to update suggestion")?
            {
                eprintln!(
                    "{} suggestion `{}` was already applied",
                    "warning:".yellow().bold(),
                    id
                );
                return Ok(());
            }

            if changed {
                store.save_plan(&plan).context("Failed to save plan")?;
                emit(fmt, &plan, || {
                    println!(
                        "{} {} {}",
                        "ok:".green().bold(),
                        suggestion.exercise_name.bold(),
                        headline(&suggestion).yellow()
                    );
                });
            } else {
                eprintln!(
                    "{} `{}` is no longer in the plan, marked the suggestion applied",
                    "warning:".yellow().bold(),
                    suggestion.exercise_id
                );
            }
        }
    }

    Ok(())
}

use anyhow::Result;
use apex::{
    catalog,
    types::{OutputFmt, emit},
};
use colored::Colorize;

/// Catalog name the alternatives belong to, and whether it came from a fuzzy match.
#[derive(Debug, PartialEq)]
struct Resolved {
    name: String,
    fuzzy: bool,
    alternatives: Vec<String>,
}

fn resolve(name: &str) -> Option<Resolved> {
    let alternatives = catalog::swap_alternatives(name);
    if !alternatives.is_empty() {
        return Some(Resolved {
            name: name.to_string(),
            fuzzy: false,
            alternatives,
        });
    }

    let guess = catalog::closest_exercise(name)?;
    let alternatives = catalog::swap_alternatives(guess);
    if alternatives.is_empty() {
        return None;
    }
    Some(Resolved {
        name: guess.to_string(),
        fuzzy: true,
        alternatives,
    })
}

pub fn handle(exercise: Vec<String>, fmt: OutputFmt) -> Result<()> {
    let name = exercise.join(" ");

    let Some(resolved) = resolve(&name) else {
        eprintln!("{} no swap alternatives for `{}`", "error:".red().bold(), name);
        return Ok(());
    };
    if resolved.fuzzy {
        eprintln!(
            "{} no exercise named `{}`, showing `{}`",
            "warning:".yellow().bold(),
            name,
            resolved.name
        );
    }

    emit(fmt, &resolved.alternatives, || {
        println!("{} {}", "Alternatives for".cyan().bold(), resolved.name.bold());
        for (i, alt) in resolved.alternatives.iter().enumerate() {
            println!(" {} • {}", format!("{}", i + 1).yellow(), alt);
        }
    });

    Ok(())
}

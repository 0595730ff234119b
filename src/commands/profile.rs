use anyhow::{Context, Result};
use apex::{
    plan::generate_plan,
    storage::Store,
    types::{OutputFmt, UserProfile, emit},
};
use colored::Colorize;
use itertools::Itertools;

use crate::cli::{ProfileArgs, ProfileCmd};

pub fn handle(cmd: ProfileCmd, store: &dyn Store, fmt: OutputFmt) -> Result<()> {
    match cmd {
        ProfileCmd::Set(args) => {
            let profile = profile_from(args);
            if let Err(e) = profile.validate() {
                eprintln!("{} {}", "error:".red().bold(), e);
                return Ok(());
            }

            let plan = generate_plan(&profile);
            store.save_profile(&profile).context("Failed to save profile")?;
            store.save_plan(&plan).context("Failed to save plan")?;

            emit(fmt, &plan, || {
                println!(
                    "{} generated a {} plan with {} days",
                    "ok:".green().bold(),
                    plan.split.to_string().bold(),
                    plan.days.len()
                );
                println!("{}", plan.rationale.dimmed());
                eprintln!(
                    "\n{} run `apex plan show` to see your exercises",
                    "note:".yellow().bold()
                );
            });
        }

        ProfileCmd::Show => {
            let Some(profile) = store.load_profile().context("Failed to load profile")? else {
                eprintln!(
                    "{} no profile yet, run `apex profile set`",
                    "error:".red().bold()
                );
                return Ok(());
            };

            emit(fmt, &profile, || print_profile(&profile));
        }
    }

    Ok(())
}

fn profile_from(args: ProfileArgs) -> UserProfile {
    UserProfile {
        goal: args.goal,
        experience_level: args.experience,
        metabolism_type: args.metabolism,
        days_per_week: args.days,
        split_preference: args.split,
        focus_areas: args.focus.into_iter().collect(),
    }
}

fn print_profile(p: &UserProfile) {
    let focus = if p.focus_areas.is_empty() {
        "none".dimmed().to_string()
    } else {
        p.focus_areas.iter().join(", ")
    };

    println!("{}", "Profile:".cyan().bold());
    println!("  {:<12} {}", "goal", p.goal);
    println!("  {:<12} {}", "experience", p.experience_level);
    println!("  {:<12} {}", "metabolism", p.metabolism_type);
    println!("  {:<12} {}", "days/week", p.days_per_week);
    println!("  {:<12} {}", "split", p.split_preference);
    println!("  {:<12} {}", "focus", focus);
}

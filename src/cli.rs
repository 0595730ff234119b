use apex::types::{ExperienceLevel, FocusArea, Goal, MetabolismType, SplitPreference};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apex", version, about = "Training plans and RIR-based coaching")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Training profile (onboarding)
    #[command(subcommand, visible_alias = "pr")]
    Profile(ProfileCmd),

    /// The generated training plan
    #[command(subcommand, visible_alias = "p")]
    Plan(PlanCmd),

    /// Log a workout
    #[command(subcommand, visible_alias = "s")]
    Session(SessionCmd),

    /// Weekly review: adherence plus stagnation and volume checks
    #[command(visible_alias = "r")]
    Review {
        /// Any date inside the week to review, DD-MM-YYYY (defaults to this week)
        #[arg(short, long)]
        week: Option<String>,
    },

    /// Coaching suggestions
    #[command(subcommand, visible_alias = "sg")]
    Suggest(SuggestCmd),

    /// Weight trend for one exercise of the plan
    Progress {
        /// Exercise id as shown by `plan show`
        exercise: String,
    },

    /// Show swap alternatives for an exercise - Usage: swap EXERCISE NAME
    #[command(trailing_var_arg = true)]
    Swap {
        /// Exercise name, e.g. "Back Squat"
        exercise: Vec<String>,
    },

    /// View or edit apex config
    #[command(subcommand)]
    Config(ConfigCmd),
}

//
// Commands
//

#[derive(Subcommand)]
pub enum ProfileCmd {
    /// Save a profile and generate a fresh plan from it
    #[command(visible_alias = "s")]
    Set(ProfileArgs),

    /// Show the saved profile
    #[command(visible_alias = "i")]
    Show,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(short, long, value_enum)]
    pub goal: Goal,

    #[arg(short, long, value_enum)]
    pub experience: ExperienceLevel,

    #[arg(short, long, value_enum, default_value_t = MetabolismType::Normal)]
    pub metabolism: MetabolismType,

    /// Training days per week (1-7)
    #[arg(short, long)]
    pub days: u8,

    #[arg(short, long, value_enum, default_value_t = SplitPreference::AiDecide)]
    pub split: SplitPreference,

    /// Comma separated focus areas
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub focus: Vec<FocusArea>,
}

#[derive(Subcommand)]
pub enum PlanCmd {
    /// Show the plan, or a single day of it
    #[command(visible_alias = "s")]
    Show {
        /// Day id, e.g. push-1
        #[arg(short, long)]
        day: Option<String>,
    },

    /// Show the weekly schedule and what was completed
    #[command(visible_alias = "w")]
    Week {
        /// Any date inside the week, DD-MM-YYYY (defaults to this week)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Generate the plan again from the saved profile
    Regenerate,
}

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Start a session for a plan day (defaults to today's scheduled day)
    #[command(visible_alias = "s")]
    Start { day: Option<String> },

    /// Log a set - Usage: session log WEIGHT REPS RIR
    #[command(visible_alias = "l")]
    #[command(override_usage = "session log <WEIGHT> <REPS> <RIR> [--exercise <ID>]")]
    Log {
        /// Weight in lbs (use "bw" for bodyweight exercises)
        #[arg(value_name = "WEIGHT")]
        weight: String,

        /// Number of reps
        #[arg(value_name = "REPS")]
        reps: u32,

        /// Reps in reserve, 0-5
        #[arg(value_name = "RIR")]
        rir: u8,

        /// Exercise id (defaults to the first exercise with sets left)
        #[arg(long, short = 'e')]
        exercise: Option<String>,
    },

    /// Show current session details
    #[command(visible_alias = "i")]
    Show,

    /// Finish the current session and get feedback
    #[command(visible_alias = "f")]
    Finish,

    /// Cancel the current session
    #[command(visible_alias = "c")]
    Cancel,
}

#[derive(Subcommand)]
pub enum SuggestCmd {
    /// List suggestions
    #[command(visible_alias = "l")]
    List {
        /// Include applied suggestions
        #[arg(short, long)]
        all: bool,
    },

    /// Apply a suggestion to the plan
    #[command(visible_alias = "a")]
    Apply { id: String },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

use once_cell::sync::Lazy;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Gain Muscle")]
    GainMuscle,
    #[serde(rename = "Lose Weight")]
    LoseWeight,
    Strength,
    Endurance,
}

impl Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::GainMuscle => "Gain Muscle",
            Self::LoseWeight => "Lose Weight",
            Self::Strength => "Strength",
            Self::Endurance => "Endurance",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum MetabolismType {
    Fast,
    Normal,
    Slow,
}

impl Display for MetabolismType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fast => "Fast",
            Self::Normal => "Normal",
            Self::Slow => "Slow",
        };

        write!(f, "{}", s)
    }
}

/// A concrete weekly split. Serialized as its display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Split {
    #[serde(rename = "Push/Pull/Legs")]
    PushPullLegs,
    #[serde(rename = "Upper/Lower")]
    UpperLower,
    #[serde(rename = "Arnold Split")]
    ArnoldSplit,
    #[serde(rename = "Full Body")]
    FullBody,
}

impl Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PushPullLegs => "Push/Pull/Legs",
            Self::UpperLower => "Upper/Lower",
            Self::ArnoldSplit => "Arnold Split",
            Self::FullBody => "Full Body",
        };

        write!(f, "{}", s)
    }
}

/// What the user asked for at onboarding; `AiDecide` defers to days per week.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum SplitPreference {
    #[serde(rename = "AI Decide")]
    #[value(name = "ai-decide")]
    AiDecide,
    #[serde(rename = "Push/Pull/Legs")]
    #[value(name = "ppl")]
    PushPullLegs,
    #[serde(rename = "Upper/Lower")]
    #[value(name = "upper-lower")]
    UpperLower,
    #[serde(rename = "Arnold Split")]
    #[value(name = "arnold")]
    ArnoldSplit,
    #[serde(rename = "Full Body")]
    #[value(name = "full-body")]
    FullBody,
}

impl SplitPreference {
    /// The fixed split, or `None` when the choice is deferred.
    pub fn fixed(self) -> Option<Split> {
        match self {
            Self::AiDecide => None,
            Self::PushPullLegs => Some(Split::PushPullLegs),
            Self::UpperLower => Some(Split::UpperLower),
            Self::ArnoldSplit => Some(Split::ArnoldSplit),
            Self::FullBody => Some(Split::FullBody),
        }
    }
}

impl Display for SplitPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fixed() {
            Some(split) => write!(f, "{}", split),
            None => write!(f, "AI Decide"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize)]
pub enum FocusArea {
    Chest,
    Arms,
    Glutes,
    #[serde(rename = "Mobility/Health")]
    Mobility,
}

impl Display for FocusArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Chest => "Chest",
            Self::Arms => "Arms",
            Self::Glutes => "Glutes",
            Self::Mobility => "Mobility/Health",
        };

        write!(f, "{}", s)
    }
}

/// Training profile captured at onboarding. Read-only once saved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub goal: Goal,
    pub experience_level: ExperienceLevel,
    pub metabolism_type: MetabolismType,
    pub days_per_week: u8,
    pub split_preference: SplitPreference,
    pub focus_areas: BTreeSet<FocusArea>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("days per week must be between 1 and 7, got {0}")]
    DaysPerWeek(u8),
}

impl UserProfile {
    pub fn has_focus(&self, area: FocusArea) -> bool {
        self.focus_areas.contains(&area)
    }

    /// Checks the ranges plan generation assumes but does not enforce.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(1..=7).contains(&self.days_per_week) {
            return Err(ProfileError::DaysPerWeek(self.days_per_week));
        }
        Ok(())
    }
}

/// Reps in reserve, always within 0..=5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Rir(u8);

impl Rir {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn zone(self) -> RirZone {
        match self.0 {
            0 => RirZone::Failure,
            1..=2 => RirZone::Optimal,
            _ => RirZone::Easy,
        }
    }
}

impl From<u8> for Rir {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Rir> for u8 {
    fn from(rir: Rir) -> Self {
        rir.0
    }
}

impl Display for Rir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RirZone {
    Failure,
    Optimal,
    Easy,
}

impl RirZone {
    pub fn label(self) -> &'static str {
        match self {
            Self::Failure => "Failure / Empty Tank",
            Self::Optimal => "Optimal Stimulus",
            Self::Easy => "Warmup / Too Easy",
        }
    }
}

pub static CONFIG_KEYS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| BTreeSet::from(["db", "log"]));

/// Flat `key = "value"` settings stored as TOML.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub map: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to save config to {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFmt {
    Text,
    Json,
}

/// Prints `value` as JSON, or runs the pretty printer for text output.
pub fn emit<T: Serialize>(fmt: OutputFmt, value: &T, pretty: impl FnOnce()) {
    match fmt {
        OutputFmt::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => tracing::error!("failed to encode output: {e}"),
        },
        OutputFmt::Text => pretty(),
    }
}

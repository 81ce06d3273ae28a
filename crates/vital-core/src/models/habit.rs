//! Habit model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Minimum habit title length, in characters, after trimming
pub const MIN_TITLE_CHARS: usize = 2;

/// Valid weekly frequency range ("times per week")
pub const FREQUENCY_RANGE: std::ops::RangeInclusive<u8> = 1..=7;

/// A unique identifier for a habit, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(Uuid);

impl HabitId {
    /// Create a new unique habit ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HabitId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Preferred time of day for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HabitTime {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Anytime,
}

impl HabitTime {
    /// Stable identifier used in stored documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Anytime => "anytime",
        }
    }
}

impl fmt::Display for HabitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitTime {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "anytime" => Ok(Self::Anytime),
            other => Err(Error::InvalidInput(format!("Unknown habit time: {other}"))),
        }
    }
}

/// A recurring user-defined task with a weekly frequency target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: HabitId,
    /// Habit title (non-empty after trim)
    pub title: String,
    /// Target times per week (1..=7)
    pub frequency: u8,
    /// Preferred time of day
    pub time: HabitTime,
    /// Whether the habit is currently active
    pub enabled: bool,
    /// Consecutive completion streak
    #[serde(default)]
    pub streak: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new enabled habit with a zero streak
    pub fn new(title: impl Into<String>, frequency: u8, time: HabitTime) -> Result<Self> {
        let title = normalize_title(&title.into())?;
        let frequency = validate_frequency(frequency)?;

        Ok(Self {
            id: HabitId::new(),
            title,
            frequency,
            time,
            enabled: true,
            streak: 0,
            created_at: Utc::now(),
        })
    }

    /// Apply an edit, validating every changed field before mutating
    ///
    /// On error nothing is modified.
    pub fn apply(&mut self, patch: &HabitPatch) -> Result<()> {
        let title = patch
            .title
            .as_deref()
            .map(normalize_title)
            .transpose()?;
        let frequency = patch.frequency.map(validate_frequency).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(frequency) = frequency {
            self.frequency = frequency;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        Ok(())
    }
}

/// A partial edit for an existing habit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    /// New title, if changing
    pub title: Option<String>,
    /// New weekly frequency, if changing
    pub frequency: Option<u8>,
    /// New time of day, if changing
    pub time: Option<HabitTime>,
}

fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.chars().count() < MIN_TITLE_CHARS {
        return Err(Error::InvalidInput(format!(
            "Habit title must be at least {MIN_TITLE_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_frequency(frequency: u8) -> Result<u8> {
    if FREQUENCY_RANGE.contains(&frequency) {
        Ok(frequency)
    } else {
        Err(Error::InvalidInput(format!(
            "Habit frequency must be between 1 and 7, got {frequency}"
        )))
    }
}

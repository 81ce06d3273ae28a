use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use vital_core::models::{Habit, WidgetKind};
use vital_core::services::TrackerStore;
use vital_core::{HabitId, TrackerState, UserId};

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct WidgetListItem {
    pub id: String,
    pub enabled: bool,
    pub goal: Option<f64>,
    pub in_daily_plan: bool,
}

#[derive(Debug, Serialize)]
pub struct HabitListItem {
    pub id: String,
    pub title: String,
    pub frequency: u8,
    pub time: String,
    pub enabled: bool,
    pub streak: u32,
    pub created_at: DateTime<Utc>,
    pub age: String,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("VITAL_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI data directory"))
        .join("vital")
        .join("vital.db")
}

pub fn resolve_user(cli_user: Option<String>) -> Result<UserId, CliError> {
    let raw = cli_user
        .or_else(|| env::var("VITAL_USER").ok())
        .unwrap_or_else(|| "local".to_string());
    Ok(UserId::new(raw)?)
}

/// Open the store and seed a loaded working copy for the user.
pub async fn open_tracker(db_path: &Path, user: &UserId) -> Result<TrackerState, CliError> {
    tracing::debug!("Opening store at {} for user {user}", db_path.display());
    let store = TrackerStore::open_path(db_path)?;
    let mut state = TrackerState::new(store, Some(user.clone()));
    state.load().await;
    Ok(state)
}

pub fn parse_widget(raw: &str) -> Result<WidgetKind, CliError> {
    Ok(raw.parse()?)
}

/// Resolve a habit by full id or unique id prefix.
pub fn resolve_habit_id(state: &TrackerState, query: &str) -> Result<HabitId, CliError> {
    let query = query.trim();
    if let Ok(id) = query.parse::<HabitId>() {
        if state.habit(id).is_some() {
            return Ok(id);
        }
        return Err(CliError::HabitNotFound(query.to_string()));
    }

    let matches: Vec<&Habit> = state
        .habits()
        .iter()
        .filter(|habit| habit.id.as_str().starts_with(query))
        .collect();

    match matches.len() {
        0 => Err(CliError::HabitNotFound(query.to_string())),
        1 => Ok(matches[0].id),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|habit| habit.id.as_str().chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousHabitId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn widget_list_items(state: &TrackerState) -> Vec<WidgetListItem> {
    WidgetKind::ALL
        .into_iter()
        .map(|kind| {
            let config = state.settings().widget(kind);
            WidgetListItem {
                id: kind.as_str().to_string(),
                enabled: config.enabled,
                goal: config.goal,
                in_daily_plan: config.in_daily_plan,
            }
        })
        .collect()
}

pub fn format_widget_lines(state: &TrackerState) -> Vec<String> {
    widget_list_items(state)
        .iter()
        .map(|item| {
            let enabled = if item.enabled { "on" } else { "off" };
            let goal = item
                .goal
                .map_or_else(|| "-".to_string(), |goal| format_goal(goal));
            let plan = if item.in_daily_plan { "daily plan" } else { "" };
            format!("{:<10}  {:<3}  {:<10}  {}", item.id, enabled, goal, plan)
                .trim_end()
                .to_string()
        })
        .collect()
}

pub fn habit_to_list_item(habit: &Habit, now: DateTime<Utc>) -> HabitListItem {
    HabitListItem {
        id: habit.id.to_string(),
        title: habit.title.clone(),
        frequency: habit.frequency,
        time: habit.time.to_string(),
        enabled: habit.enabled,
        streak: habit.streak,
        created_at: habit.created_at,
        age: format_relative_time(habit.created_at, now),
    }
}

pub fn format_habit_lines(habits: &[Habit]) -> Vec<String> {
    let now = Utc::now();
    habits
        .iter()
        .map(|habit| {
            let short_id = habit.id.as_str().chars().take(13).collect::<String>();
            let enabled = if habit.enabled { "on" } else { "off" };
            format!(
                "{short_id:<13}  {:<24}  {}x/week  {:<9}  {enabled:<3}  streak {}  {}",
                habit.title,
                habit.frequency,
                habit.time,
                habit.streak,
                format_relative_time(habit.created_at, now),
            )
        })
        .collect()
}

pub fn format_goal(goal: f64) -> String {
    if (goal.fract()).abs() < f64::EPSILON {
        format!("{goal:.0}")
    } else {
        format!("{goal}")
    }
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now
        .signed_duration_since(timestamp)
        .num_milliseconds()
        .max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Ask the user to confirm a destructive action.
///
/// A non-interactive stdin declines, so scripted deletes must pass `--yes`.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(false);
    }

    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    stdin.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

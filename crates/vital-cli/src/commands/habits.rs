use std::path::Path;

use chrono::Utc;
use vital_core::models::{HabitPatch, HabitTime};
use vital_core::UserId;

use crate::cli::HabitCommands;
use crate::commands::common::{
    confirm, format_habit_lines, habit_to_list_item, open_tracker, resolve_habit_id,
};
use crate::error::CliError;

pub async fn run(db_path: &Path, user: &UserId, command: HabitCommands) -> Result<(), CliError> {
    match command {
        HabitCommands::List { json } => run_list(db_path, user, json).await,
        HabitCommands::Add {
            title,
            frequency,
            time,
        } => run_add(db_path, user, &title, frequency, &time).await,
        HabitCommands::Edit {
            id,
            title,
            frequency,
            time,
        } => run_edit(db_path, user, &id, title, frequency, time.as_deref()).await,
        HabitCommands::Toggle { id } => run_toggle(db_path, user, &id).await,
        HabitCommands::Done { id } => run_done(db_path, user, &id).await,
        HabitCommands::Reset { id } => run_reset(db_path, user, &id).await,
        HabitCommands::Delete { id, yes } => run_delete(db_path, user, &id, yes).await,
    }
}

async fn run_list(db_path: &Path, user: &UserId, as_json: bool) -> Result<(), CliError> {
    let state = open_tracker(db_path, user).await?;

    if as_json {
        let now = Utc::now();
        let items = state
            .habits()
            .iter()
            .map(|habit| habit_to_list_item(habit, now))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if state.habits().is_empty() {
        println!("No habits yet. Add one with `vital habit add`.");
    } else {
        for line in format_habit_lines(state.habits()) {
            println!("{line}");
        }
    }

    Ok(())
}

async fn run_add(
    db_path: &Path,
    user: &UserId,
    title_parts: &[String],
    frequency: u8,
    time: &str,
) -> Result<(), CliError> {
    let title = title_parts.join(" ");
    if title.trim().is_empty() {
        return Err(CliError::EmptyTitle);
    }
    let time: HabitTime = time.parse()?;

    let mut state = open_tracker(db_path, user).await?;
    let id = state.add_habit(title, frequency, time)?;
    state.flush().await;
    tracing::info!("Added habit {id}");

    println!("{id}");
    Ok(())
}

async fn run_edit(
    db_path: &Path,
    user: &UserId,
    id: &str,
    title: Option<String>,
    frequency: Option<u8>,
    time: Option<&str>,
) -> Result<(), CliError> {
    let time = time.map(str::parse::<HabitTime>).transpose()?;
    let patch = HabitPatch {
        title,
        frequency,
        time,
    };

    let mut state = open_tracker(db_path, user).await?;
    let habit_id = resolve_habit_id(&state, id)?;
    state.update_habit(habit_id, &patch)?;
    state.flush().await;

    let title = state
        .habit(habit_id)
        .map_or_else(String::new, |habit| habit.title.clone());
    println!("Updated {title}");
    Ok(())
}

async fn run_toggle(db_path: &Path, user: &UserId, id: &str) -> Result<(), CliError> {
    let mut state = open_tracker(db_path, user).await?;
    let habit_id = resolve_habit_id(&state, id)?;
    state.toggle_habit(habit_id)?;
    state.flush().await;

    let habit = state
        .habit(habit_id)
        .ok_or_else(|| CliError::HabitNotFound(id.to_string()))?;
    let status = if habit.enabled { "enabled" } else { "paused" };
    println!("{} is now {status}", habit.title);
    Ok(())
}

async fn run_done(db_path: &Path, user: &UserId, id: &str) -> Result<(), CliError> {
    let mut state = open_tracker(db_path, user).await?;
    let habit_id = resolve_habit_id(&state, id)?;
    let streak = state.complete_habit(habit_id)?;
    state.flush().await;

    println!("Streak: {streak}");
    Ok(())
}

async fn run_reset(db_path: &Path, user: &UserId, id: &str) -> Result<(), CliError> {
    let mut state = open_tracker(db_path, user).await?;
    let habit_id = resolve_habit_id(&state, id)?;
    state.reset_streak(habit_id)?;
    state.flush().await;

    println!("Streak reset");
    Ok(())
}

async fn run_delete(db_path: &Path, user: &UserId, id: &str, yes: bool) -> Result<(), CliError> {
    let mut state = open_tracker(db_path, user).await?;
    let habit_id = resolve_habit_id(&state, id)?;
    let title = state
        .habit(habit_id)
        .map(|habit| habit.title.clone())
        .unwrap_or_default();

    if !yes && !confirm(&format!("Delete habit '{title}'?"))? {
        println!("Aborted.");
        return Ok(());
    }

    state.delete_habit(habit_id)?;
    state.flush().await;
    tracing::info!("Deleted habit {habit_id}");

    println!("Deleted '{title}'");
    Ok(())
}

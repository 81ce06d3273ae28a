use std::path::Path;

use vital_core::UserId;

use crate::cli::WidgetCommands;
use crate::commands::common::{
    format_goal, format_widget_lines, open_tracker, parse_widget, widget_list_items,
};
use crate::error::CliError;

pub async fn run(db_path: &Path, user: &UserId, command: WidgetCommands) -> Result<(), CliError> {
    match command {
        WidgetCommands::List { json } => run_list(db_path, user, json).await,
        WidgetCommands::Enable { widget } => run_set_enabled(db_path, user, &widget, true).await,
        WidgetCommands::Disable { widget } => run_set_enabled(db_path, user, &widget, false).await,
        WidgetCommands::Goal {
            widget,
            value,
            clear,
        } => run_goal(db_path, user, &widget, value, clear).await,
        WidgetCommands::Plan { widget } => run_plan(db_path, user, &widget).await,
    }
}

async fn run_list(db_path: &Path, user: &UserId, as_json: bool) -> Result<(), CliError> {
    let state = open_tracker(db_path, user).await?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&widget_list_items(&state))?
        );
    } else {
        for line in format_widget_lines(&state) {
            println!("{line}");
        }
    }

    Ok(())
}

async fn run_set_enabled(
    db_path: &Path,
    user: &UserId,
    widget: &str,
    enabled: bool,
) -> Result<(), CliError> {
    let kind = parse_widget(widget)?;
    let mut state = open_tracker(db_path, user).await?;

    if state.settings().widget(kind).enabled != enabled {
        state.toggle_widget(kind);
        state.flush().await;
    }

    let verb = if enabled { "Enabled" } else { "Disabled" };
    println!("{verb} {kind}");
    Ok(())
}

async fn run_goal(
    db_path: &Path,
    user: &UserId,
    widget: &str,
    value: Option<f64>,
    clear: bool,
) -> Result<(), CliError> {
    let kind = parse_widget(widget)?;
    if value.is_none() && !clear {
        return Err(CliError::MissingGoalValue);
    }

    let mut state = open_tracker(db_path, user).await?;
    state.set_widget_goal(kind, value)?;
    state.flush().await;

    match value {
        Some(goal) => println!("Set {kind} goal to {}", format_goal(goal)),
        None => println!("Cleared {kind} goal"),
    }
    Ok(())
}

async fn run_plan(db_path: &Path, user: &UserId, widget: &str) -> Result<(), CliError> {
    let kind = parse_widget(widget)?;
    let mut state = open_tracker(db_path, user).await?;

    state.toggle_daily_plan(kind);
    state.flush().await;

    if state.settings().widget(kind).in_daily_plan {
        println!("Added {kind} to the daily plan");
    } else {
        println!("Removed {kind} from the daily plan");
    }
    Ok(())
}

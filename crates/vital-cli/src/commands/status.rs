use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use vital_core::models::UserParams;
use vital_core::UserId;

use crate::commands::common::{
    format_habit_lines, format_widget_lines, habit_to_list_item, open_tracker, widget_list_items,
    HabitListItem, WidgetListItem,
};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct StatusReport {
    user: String,
    widgets: Vec<WidgetListItem>,
    daily_plan: Vec<String>,
    user_params: UserParams,
    bmi: Option<f64>,
    habits: Vec<HabitListItem>,
}

pub async fn run(db_path: &Path, user: &UserId, as_json: bool) -> Result<(), CliError> {
    let state = open_tracker(db_path, user).await?;

    if as_json {
        let now = Utc::now();
        let report = StatusReport {
            user: user.to_string(),
            widgets: widget_list_items(&state),
            daily_plan: state
                .daily_plan()
                .into_iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            user_params: state.settings().user_params,
            bmi: state.settings().user_params.bmi(),
            habits: state
                .habits()
                .iter()
                .map(|habit| habit_to_list_item(habit, now))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Tracker for {user}");
    println!();
    println!("Widgets:");
    for line in format_widget_lines(&state) {
        println!("  {line}");
    }

    let plan = state.daily_plan();
    if !plan.is_empty() {
        let names = plan
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!();
        println!("Daily plan: {names}");
    }

    if let Some(bmi) = state.settings().user_params.bmi() {
        println!();
        println!("BMI: {bmi:.1}");
    }

    if !state.habits().is_empty() {
        println!();
        println!("Habits:");
        for line in format_habit_lines(state.habits()) {
            println!("  {line}");
        }
    }

    Ok(())
}

use std::path::Path;

use serde::Serialize;
use vital_core::models::UserParams;
use vital_core::UserId;

use crate::cli::{GenderArg, ParamsCommands};
use crate::commands::common::open_tracker;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ParamsReport {
    #[serde(flatten)]
    params: UserParams,
    bmi: Option<f64>,
}

pub async fn run(db_path: &Path, user: &UserId, command: ParamsCommands) -> Result<(), CliError> {
    match command {
        ParamsCommands::Show { json } => run_show(db_path, user, json).await,
        ParamsCommands::Set {
            height,
            weight,
            age,
            gender,
        } => run_set(db_path, user, height, weight, age, gender).await,
    }
}

async fn run_show(db_path: &Path, user: &UserId, as_json: bool) -> Result<(), CliError> {
    let state = open_tracker(db_path, user).await?;
    let params = state.settings().user_params;

    if as_json {
        let report = ParamsReport {
            params,
            bmi: params.bmi(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("height: {}", format_optional(params.height, "cm"));
    println!("weight: {}", format_optional(params.weight, "kg"));
    println!(
        "age:    {}",
        params
            .age
            .map_or_else(|| "-".to_string(), |age| age.to_string())
    );
    println!(
        "gender: {}",
        params
            .gender
            .map_or("-", |gender| match gender {
                vital_core::models::Gender::Male => "male",
                vital_core::models::Gender::Female => "female",
            })
    );
    if let Some(bmi) = params.bmi() {
        println!("bmi:    {bmi:.1}");
    }
    Ok(())
}

async fn run_set(
    db_path: &Path,
    user: &UserId,
    height: Option<f64>,
    weight: Option<f64>,
    age: Option<u8>,
    gender: Option<GenderArg>,
) -> Result<(), CliError> {
    let mut state = open_tracker(db_path, user).await?;

    // Shallow merge: only the flags given on the command line change.
    let mut params = state.settings().user_params;
    if height.is_some() {
        params.height = height;
    }
    if weight.is_some() {
        params.weight = weight;
    }
    if age.is_some() {
        params.age = age;
    }
    if let Some(gender) = gender {
        params.gender = Some(gender.into());
    }

    state.set_user_params(params);
    state.flush().await;

    println!("Updated body parameters");
    if let Some(bmi) = params.bmi() {
        println!("BMI: {bmi:.1}");
    }
    Ok(())
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value} {unit}"))
}

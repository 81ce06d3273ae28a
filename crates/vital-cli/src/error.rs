use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vital_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No habit title provided")]
    EmptyTitle,
    #[error("Habit not found for id/prefix: {0}")]
    HabitNotFound(String),
    #[error("{0}")]
    AmbiguousHabitId(String),
    #[error("Goal requires a value or --clear")]
    MissingGoalValue,
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "vital")]
#[command(about = "Track water, steps, sleep and habits from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// User id owning the tracker document
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the dashboard summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage tracker widgets
    Widget {
        #[command(subcommand)]
        command: WidgetCommands,
    },
    /// Manage body parameters
    Params {
        #[command(subcommand)]
        command: ParamsCommands,
    },
    /// Manage habits
    Habit {
        #[command(subcommand)]
        command: HabitCommands,
    },
}

#[derive(Subcommand)]
pub enum WidgetCommands {
    /// List widgets and their configuration
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enable a widget on the dashboard
    Enable {
        /// Widget name (water, steps, weight, ...)
        widget: String,
    },
    /// Disable a widget
    Disable {
        /// Widget name (water, steps, weight, ...)
        widget: String,
    },
    /// Set or clear a widget's numeric goal
    Goal {
        /// Widget name (water, steps, weight, ...)
        widget: String,
        /// New goal value
        value: Option<f64>,
        /// Remove the goal instead
        #[arg(long, conflicts_with = "value")]
        clear: bool,
    },
    /// Toggle a widget in the daily plan
    Plan {
        /// Widget name (water, steps, weight, ...)
        widget: String,
    },
}

#[derive(Subcommand)]
pub enum ParamsCommands {
    /// Show body parameters (and BMI when derivable)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update body parameters
    Set {
        /// Height in centimeters
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Age in years
        #[arg(long)]
        age: Option<u8>,
        /// Biological sex
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
    },
}

#[derive(Subcommand)]
pub enum HabitCommands {
    /// List habits
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new habit
    #[command(alias = "new")]
    Add {
        /// Habit title
        title: Vec<String>,
        /// Target times per week (1-7)
        #[arg(short, long, default_value = "7")]
        frequency: u8,
        /// Time of day (morning, afternoon, evening, anytime)
        #[arg(short, long, default_value = "anytime")]
        time: String,
    },
    /// Edit an existing habit
    Edit {
        /// Habit ID or unique ID prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New weekly frequency (1-7)
        #[arg(long)]
        frequency: Option<u8>,
        /// New time of day
        #[arg(long)]
        time: Option<String>,
    },
    /// Enable or disable a habit
    Toggle {
        /// Habit ID or unique ID prefix
        id: String,
    },
    /// Record a completion and bump the streak
    Done {
        /// Habit ID or unique ID prefix
        id: String,
    },
    /// Reset a habit's streak
    Reset {
        /// Habit ID or unique ID prefix
        id: String,
    },
    /// Delete a habit
    Delete {
        /// Habit ID or unique ID prefix
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for vital_core::models::Gender {
    fn from(value: GenderArg) -> Self {
        match value {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
        }
    }
}

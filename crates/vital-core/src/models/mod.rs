//! Data models for Vital

mod habit;
mod settings;
mod user;
mod widget;

pub use habit::{Habit, HabitId, HabitPatch, HabitTime, FREQUENCY_RANGE, MIN_TITLE_CHARS};
pub use settings::{Gender, TrackerSettings, UserParams};
pub use user::UserId;
pub use widget::{WidgetConfig, WidgetKind};

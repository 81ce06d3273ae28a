//! vital-core - Core library for Vital
//!
//! This crate contains the shared models, document store, and the
//! optimistic debounced sync layer used by all Vital interfaces.

pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod sync;
pub mod tracker;

pub use error::{Error, Result};
pub use models::{Habit, HabitId, HabitTime, TrackerSettings, UserId, UserParams, WidgetKind};
pub use tracker::TrackerState;

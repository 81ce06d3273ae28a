pub mod common;
pub mod habits;
pub mod params;
pub mod status;
pub mod widgets;

//! Trackable widget kinds and per-widget configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One trackable health metric on the dashboard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Water,
    Steps,
    Weight,
    Caffeine,
    Sleep,
    Mood,
    Nutrition,
    Photos,
    Notes,
    Habits,
}

impl WidgetKind {
    /// The fixed set of widgets, in dashboard order
    pub const ALL: [Self; 10] = [
        Self::Water,
        Self::Steps,
        Self::Weight,
        Self::Caffeine,
        Self::Sleep,
        Self::Mood,
        Self::Nutrition,
        Self::Photos,
        Self::Notes,
        Self::Habits,
    ];

    /// Stable identifier used in stored documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Steps => "steps",
            Self::Weight => "weight",
            Self::Caffeine => "caffeine",
            Self::Sleep => "sleep",
            Self::Mood => "mood",
            Self::Nutrition => "nutrition",
            Self::Photos => "photos",
            Self::Notes => "notes",
            Self::Habits => "habits",
        }
    }

    /// Out-of-the-box configuration for this widget
    ///
    /// The core metrics start enabled with stock goals; everything else
    /// starts disabled with no goal.
    #[must_use]
    pub const fn default_config(self) -> WidgetConfig {
        match self {
            Self::Water => WidgetConfig {
                enabled: true,
                goal: Some(2000.0),
                in_daily_plan: false,
            },
            Self::Steps => WidgetConfig {
                enabled: true,
                goal: Some(10_000.0),
                in_daily_plan: false,
            },
            Self::Sleep => WidgetConfig {
                enabled: true,
                goal: Some(8.0),
                in_daily_plan: false,
            },
            Self::Weight => WidgetConfig {
                enabled: true,
                goal: None,
                in_daily_plan: false,
            },
            _ => WidgetConfig {
                enabled: false,
                goal: None,
                in_daily_plan: false,
            },
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown widget: {s}")))
    }
}

/// Per-widget tracker configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Whether the widget is shown on the dashboard
    pub enabled: bool,
    /// Optional numeric goal (ml of water, step count, hours of sleep, ...)
    pub goal: Option<f64>,
    /// Whether the widget is pinned to the daily plan
    pub in_daily_plan: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            goal: None,
            in_daily_plan: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_kind_roundtrip() {
        for kind in WidgetKind::ALL {
            let parsed: WidgetKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_widget_kind_parse_is_lenient() {
        let parsed: WidgetKind = " Water ".parse().unwrap();
        assert_eq!(parsed, WidgetKind::Water);
        assert!("hydration".parse::<WidgetKind>().is_err());
    }

    #[test]
    fn test_nutrition_default_config() {
        let config = WidgetKind::Nutrition.default_config();
        assert!(!config.enabled);
        assert_eq!(config.goal, None);
        assert!(!config.in_daily_plan);
    }

    #[test]
    fn test_water_default_config() {
        let config = WidgetKind::Water.default_config();
        assert!(config.enabled);
        assert_eq!(config.goal, Some(2000.0));
    }
}

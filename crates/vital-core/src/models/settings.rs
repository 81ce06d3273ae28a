//! Tracker settings model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::widget::{WidgetConfig, WidgetKind};

/// Biological sex used for goal suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Optional body parameters for the user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UserParams {
    /// Height in centimeters
    #[serde(default)]
    pub height: Option<f64>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    /// Age in years
    #[serde(default)]
    pub age: Option<u8>,
    /// Biological sex
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl UserParams {
    /// Body-mass index, when both height and weight are known
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.height.filter(|height| *height > 0.0)? / 100.0;
        let weight = self.weight.filter(|weight| *weight > 0.0)?;
        Some(weight / (height_m * height_m))
    }
}

/// A user's full tracker configuration
///
/// Every [`WidgetKind`] always has an entry; missing entries are filled
/// from the per-widget defaults whenever a stored document is merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Per-widget configuration, keyed by widget kind
    pub widgets: BTreeMap<WidgetKind, WidgetConfig>,
    /// The user's body parameters
    pub user_params: UserParams,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            widgets: WidgetKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_config()))
                .collect(),
            user_params: UserParams::default(),
        }
    }
}

impl TrackerSettings {
    /// Configuration for one widget
    ///
    /// Falls back to the widget's default when the entry is somehow
    /// missing, preserving the every-widget-has-an-entry invariant.
    #[must_use]
    pub fn widget(&self, kind: WidgetKind) -> WidgetConfig {
        self.widgets
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_config())
    }

    /// Widgets that are enabled and pinned to the daily plan
    #[must_use]
    pub fn daily_plan(&self) -> Vec<WidgetKind> {
        WidgetKind::ALL
            .into_iter()
            .filter(|kind| {
                let config = self.widget(*kind);
                config.enabled && config.in_daily_plan
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_cover_every_widget() {
        let settings = TrackerSettings::default();
        for kind in WidgetKind::ALL {
            assert!(settings.widgets.contains_key(&kind), "missing {kind}");
        }
    }

    #[test]
    fn test_bmi() {
        let params = UserParams {
            height: Some(180.0),
            weight: Some(81.0),
            ..UserParams::default()
        };
        let bmi = params.bmi().unwrap();
        assert!((bmi - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_bmi_requires_both_parameters() {
        let params = UserParams {
            height: Some(180.0),
            ..UserParams::default()
        };
        assert_eq!(params.bmi(), None);
        assert_eq!(UserParams::default().bmi(), None);
    }

    #[test]
    fn test_daily_plan_requires_enabled() {
        let mut settings = TrackerSettings::default();
        settings.widgets.insert(
            WidgetKind::Water,
            WidgetConfig {
                enabled: true,
                goal: Some(2000.0),
                in_daily_plan: true,
            },
        );
        settings.widgets.insert(
            WidgetKind::Mood,
            WidgetConfig {
                enabled: false,
                goal: None,
                in_daily_plan: true,
            },
        );

        assert_eq!(settings.daily_plan(), vec![WidgetKind::Water]);
    }
}

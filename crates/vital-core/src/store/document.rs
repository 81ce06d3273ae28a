//! Stored tracker document wire shape

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{
    Habit, HabitId, TrackerSettings, UserParams, WidgetKind, FREQUENCY_RANGE,
};

/// The per-user document held by the durable store
///
/// Every section is optional: a patch carries only the sections it wants to
/// overwrite, and a stored document from an older client may be missing
/// sections entirely. Readers merge over hard-coded defaults rather than
/// trusting the stored shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerDocument {
    /// Ids of enabled widgets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_widgets: Option<Vec<String>>,
    /// Numeric goals keyed by widget id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_goals: Option<HashMap<String, f64>>,
    /// Ids of widgets pinned to the daily plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets_in_daily_plan: Option<Vec<String>>,
    /// The user's body parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_params: Option<UserParams>,
    /// The user's habit list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits: Option<Vec<Habit>>,
}

impl TrackerDocument {
    /// Build the patch a settings write sends: the full widget section and
    /// user params, leaving the habit list untouched
    #[must_use]
    pub fn settings_patch(settings: &TrackerSettings) -> Self {
        let mut enabled_widgets = Vec::new();
        let mut widget_goals = HashMap::new();
        let mut widgets_in_daily_plan = Vec::new();

        for kind in WidgetKind::ALL {
            let config = settings.widget(kind);
            if config.enabled {
                enabled_widgets.push(kind.as_str().to_string());
            }
            if let Some(goal) = config.goal {
                widget_goals.insert(kind.as_str().to_string(), goal);
            }
            if config.in_daily_plan {
                widgets_in_daily_plan.push(kind.as_str().to_string());
            }
        }

        Self {
            enabled_widgets: Some(enabled_widgets),
            widget_goals: Some(widget_goals),
            widgets_in_daily_plan: Some(widgets_in_daily_plan),
            user_params: Some(settings.user_params),
            habits: None,
        }
    }

    /// Build the patch a habit write sends: the full habit list only
    #[must_use]
    pub fn habits_patch(habits: &[Habit]) -> Self {
        Self {
            habits: Some(habits.to_vec()),
            ..Self::default()
        }
    }

    /// Overwrite the sections present in `patch`, leaving the rest untouched
    pub fn apply_patch(&mut self, patch: &Self) {
        if let Some(enabled) = &patch.enabled_widgets {
            self.enabled_widgets = Some(enabled.clone());
        }
        if let Some(goals) = &patch.widget_goals {
            self.widget_goals = Some(goals.clone());
        }
        if let Some(plan) = &patch.widgets_in_daily_plan {
            self.widgets_in_daily_plan = Some(plan.clone());
        }
        if let Some(params) = &patch.user_params {
            self.user_params = Some(*params);
        }
        if let Some(habits) = &patch.habits {
            self.habits = Some(habits.clone());
        }
    }

    /// Merge this document over the hard-coded defaults, field by field
    ///
    /// Sections absent from the document fall back to defaults; widgets the
    /// document never mentions keep their default entry. A present section is
    /// authoritative for every widget, so an id missing from `widget_goals`
    /// means the goal is cleared, not defaulted. Unknown widget ids are
    /// ignored.
    #[must_use]
    pub fn merged_settings(&self) -> TrackerSettings {
        let mut settings = TrackerSettings::default();

        if let Some(params) = self.user_params {
            settings.user_params = params;
        }

        for (kind, config) in &mut settings.widgets {
            let id = kind.as_str();
            if let Some(enabled) = &self.enabled_widgets {
                config.enabled = enabled.iter().any(|widget| widget == id);
            }
            if let Some(goals) = &self.widget_goals {
                config.goal = goals.get(id).copied();
            }
            if let Some(plan) = &self.widgets_in_daily_plan {
                config.in_daily_plan = plan.iter().any(|widget| widget == id);
            }
        }

        settings
    }

    /// The habit list with malformed stored entries repaired
    ///
    /// Habits with blank titles are dropped, duplicate ids keep the first
    /// occurrence, and out-of-range frequencies are clamped into 1..=7.
    #[must_use]
    pub fn merged_habits(&self) -> Vec<Habit> {
        let Some(habits) = &self.habits else {
            return Vec::new();
        };

        let mut seen: HashSet<HabitId> = HashSet::new();
        habits
            .iter()
            .filter(|habit| !habit.title.trim().is_empty())
            .filter(|habit| seen.insert(habit.id))
            .map(|habit| {
                let mut habit = habit.clone();
                habit.frequency = habit
                    .frequency
                    .clamp(*FREQUENCY_RANGE.start(), *FREQUENCY_RANGE.end());
                habit
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{HabitTime, WidgetConfig};

    #[test]
    fn test_merged_settings_fills_missing_widgets_with_defaults() {
        let document = TrackerDocument {
            enabled_widgets: Some(vec!["water".to_string()]),
            widget_goals: Some(HashMap::from([("water".to_string(), 1500.0)])),
            widgets_in_daily_plan: Some(vec![]),
            ..TrackerDocument::default()
        };

        let settings = document.merged_settings();
        assert_eq!(
            settings.widget(WidgetKind::Nutrition),
            WidgetConfig {
                enabled: false,
                goal: None,
                in_daily_plan: false,
            }
        );
        assert_eq!(
            settings.widget(WidgetKind::Water),
            WidgetConfig {
                enabled: true,
                goal: Some(1500.0),
                in_daily_plan: false,
            }
        );
        // Present section is authoritative: steps is not listed, so it is off.
        assert!(!settings.widget(WidgetKind::Steps).enabled);
    }

    #[test]
    fn test_merged_settings_empty_document_is_all_defaults() {
        let settings = TrackerDocument::default().merged_settings();
        assert_eq!(settings, TrackerSettings::default());
    }

    #[test]
    fn test_merged_settings_ignores_unknown_widget_ids() {
        let document = TrackerDocument {
            enabled_widgets: Some(vec!["water".to_string(), "hydration2".to_string()]),
            ..TrackerDocument::default()
        };
        let settings = document.merged_settings();
        assert!(settings.widget(WidgetKind::Water).enabled);
        assert_eq!(settings.widgets.len(), WidgetKind::ALL.len());
    }

    #[test]
    fn test_cleared_goal_survives_patch_roundtrip() {
        let mut settings = TrackerSettings::default();
        settings.widgets.insert(
            WidgetKind::Water,
            WidgetConfig {
                enabled: true,
                goal: None,
                in_daily_plan: false,
            },
        );

        let merged = TrackerDocument::settings_patch(&settings).merged_settings();
        assert_eq!(merged.widget(WidgetKind::Water).goal, None);
    }

    #[test]
    fn test_settings_patch_roundtrip() {
        let mut settings = TrackerSettings::default();
        settings.widgets.insert(
            WidgetKind::Mood,
            WidgetConfig {
                enabled: true,
                goal: None,
                in_daily_plan: true,
            },
        );

        let patch = TrackerDocument::settings_patch(&settings);
        assert_eq!(patch.habits, None);
        assert_eq!(patch.merged_settings(), settings);
    }

    #[test]
    fn test_apply_patch_leaves_absent_sections() {
        let habit = Habit::new("Read", 2, HabitTime::Evening).unwrap();
        let mut stored = TrackerDocument {
            habits: Some(vec![habit.clone()]),
            ..TrackerDocument::default()
        };

        stored.apply_patch(&TrackerDocument::settings_patch(
            &TrackerSettings::default(),
        ));
        assert_eq!(stored.habits, Some(vec![habit]));
        assert!(stored.enabled_widgets.is_some());
    }

    #[test]
    fn test_merged_habits_repairs_malformed_entries() {
        let good = Habit::new("Read", 2, HabitTime::Evening).unwrap();
        let mut blank = Habit::new("Run", 3, HabitTime::Morning).unwrap();
        blank.title = "   ".to_string();
        let mut out_of_range = Habit::new("Swim", 3, HabitTime::Morning).unwrap();
        out_of_range.frequency = 12;
        let duplicate = good.clone();

        let document = TrackerDocument {
            habits: Some(vec![good.clone(), blank, out_of_range.clone(), duplicate]),
            ..TrackerDocument::default()
        };

        let habits = document.merged_habits();
        assert_eq!(habits.len(), 2);
        assert_eq!(habits[0], good);
        assert_eq!(habits[1].id, out_of_range.id);
        assert_eq!(habits[1].frequency, 7);
    }
}

//! In-memory working copy of a user's tracker document
//!
//! [`TrackerState`] is the single in-process owner of the settings and habit
//! working copies. Every mutation applies to the working copy synchronously
//! (the caller sees the change immediately) and hands the new full state to
//! a [`DebouncedWriter`], which persists it after a quiet period. Settings
//! and habits flow through two independent writers, mirroring the two
//! sections of the stored document they overwrite.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::{
    Habit, HabitId, HabitPatch, HabitTime, TrackerSettings, UserId, UserParams, WidgetConfig,
    WidgetKind,
};
use crate::services::TrackerStore;
use crate::store::TrackerDocument;
use crate::sync::{DebouncedWriter, DEFAULT_DEBOUNCE};

/// Working copy of one user's tracker configuration and habit list
pub struct TrackerState {
    store: TrackerStore,
    user: Option<UserId>,
    settings: TrackerSettings,
    habits: Vec<Habit>,
    loaded: bool,
    settings_writer: DebouncedWriter<TrackerSettings>,
    habits_writer: DebouncedWriter<Vec<Habit>>,
}

impl TrackerState {
    /// Create a working copy with the default debounce window
    ///
    /// `user` is the resolved identity, if any; with no user the state
    /// stays at defaults and writes are skipped.
    #[must_use]
    pub fn new(store: TrackerStore, user: Option<UserId>) -> Self {
        Self::with_debounce(store, user, DEFAULT_DEBOUNCE)
    }

    /// Create a working copy with an explicit debounce window
    #[must_use]
    pub fn with_debounce(store: TrackerStore, user: Option<UserId>, delay: Duration) -> Self {
        let settings_writer = make_settings_writer(&store, user.as_ref(), delay);
        let habits_writer = make_habits_writer(&store, user.as_ref(), delay);

        Self {
            store,
            user,
            settings: TrackerSettings::default(),
            habits: Vec::new(),
            loaded: false,
            settings_writer,
            habits_writer,
        }
    }

    /// Seed the working copy from the store, once
    ///
    /// A missing document or a fetch failure leaves the defaults in place;
    /// either way the state counts as loaded afterwards. Subsequent calls
    /// are no-ops, so unsaved local changes are never clobbered.
    pub async fn load(&mut self) {
        if self.loaded {
            return;
        }

        if let Some(user) = &self.user {
            match self.store.load_document(user).await {
                Ok(Some(document)) => {
                    self.settings = document.merged_settings();
                    self.habits = document.merged_habits();
                }
                Ok(None) => {
                    tracing::debug!("No stored document for {user}; starting from defaults");
                }
                Err(error) => {
                    tracing::warn!("Failed to load tracker document, keeping defaults: {error}");
                }
            }
        }

        self.loaded = true;
    }

    /// Whether the one-time load has completed
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The resolved user identity, if any
    #[must_use]
    pub const fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// The current settings working copy
    #[must_use]
    pub const fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// The current habit list working copy
    #[must_use]
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up a habit by id
    #[must_use]
    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    /// Widgets that are enabled and pinned to the daily plan
    #[must_use]
    pub fn daily_plan(&self) -> Vec<WidgetKind> {
        self.settings.daily_plan()
    }

    /// Whether either writer holds a payload not yet persisted
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.settings_writer.has_pending() || self.habits_writer.has_pending()
    }

    // --- settings mutations ---

    /// Flip a widget's enabled flag
    pub fn toggle_widget(&mut self, kind: WidgetKind) {
        let config = self.widget_config_mut(kind);
        config.enabled = !config.enabled;
        self.schedule_settings();
    }

    /// Set or clear a widget's numeric goal
    pub fn set_widget_goal(&mut self, kind: WidgetKind, goal: Option<f64>) -> Result<()> {
        if let Some(goal) = goal {
            if !goal.is_finite() || goal <= 0.0 {
                return Err(Error::InvalidInput(format!(
                    "Widget goal must be a positive number, got {goal}"
                )));
            }
        }
        self.widget_config_mut(kind).goal = goal;
        self.schedule_settings();
        Ok(())
    }

    /// Flip a widget's daily-plan membership
    pub fn toggle_daily_plan(&mut self, kind: WidgetKind) {
        let config = self.widget_config_mut(kind);
        config.in_daily_plan = !config.in_daily_plan;
        self.schedule_settings();
    }

    /// Replace the user's body parameters
    pub fn set_user_params(&mut self, params: UserParams) {
        self.settings.user_params = params;
        self.schedule_settings();
    }

    // --- habit mutations ---

    /// Add a new habit; the id is generated here, before persistence
    pub fn add_habit(
        &mut self,
        title: impl Into<String>,
        frequency: u8,
        time: HabitTime,
    ) -> Result<HabitId> {
        let habit = Habit::new(title, frequency, time)?;
        let id = habit.id;
        self.habits.push(habit);
        self.schedule_habits();
        Ok(id)
    }

    /// Edit a habit's title, frequency, or time of day
    ///
    /// Invalid input rejects the edit: nothing is mutated and no write is
    /// scheduled.
    pub fn update_habit(&mut self, id: HabitId, patch: &HabitPatch) -> Result<()> {
        self.habit_mut(id)?.apply(patch)?;
        self.schedule_habits();
        Ok(())
    }

    /// Flip a habit's enabled flag
    pub fn toggle_habit(&mut self, id: HabitId) -> Result<()> {
        let habit = self.habit_mut(id)?;
        habit.enabled = !habit.enabled;
        self.schedule_habits();
        Ok(())
    }

    /// Record a completion, returning the new streak
    pub fn complete_habit(&mut self, id: HabitId) -> Result<u32> {
        let habit = self.habit_mut(id)?;
        habit.streak = habit.streak.saturating_add(1);
        let streak = habit.streak;
        self.schedule_habits();
        Ok(streak)
    }

    /// Reset a habit's streak to zero
    pub fn reset_streak(&mut self, id: HabitId) -> Result<()> {
        self.habit_mut(id)?.streak = 0;
        self.schedule_habits();
        Ok(())
    }

    /// Remove exactly the habit with this id
    pub fn delete_habit(&mut self, id: HabitId) -> Result<()> {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != id);
        if self.habits.len() == before {
            return Err(Error::NotFound(id.to_string()));
        }
        self.schedule_habits();
        Ok(())
    }

    // --- persistence ---

    /// Write any pending state immediately and wait for it
    pub async fn flush(&self) {
        self.settings_writer.flush().await;
        self.habits_writer.flush().await;
    }

    /// Detach best-effort final writes of any pending state (unload path)
    pub fn dispose(&self) {
        self.settings_writer.dispose();
        self.habits_writer.dispose();
    }

    fn widget_config_mut(&mut self, kind: WidgetKind) -> &mut WidgetConfig {
        self.settings
            .widgets
            .entry(kind)
            .or_insert_with(|| kind.default_config())
    }

    fn habit_mut(&mut self, id: HabitId) -> Result<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn schedule_settings(&self) {
        self.settings_writer.schedule(self.settings.clone());
    }

    fn schedule_habits(&self) {
        self.habits_writer.schedule(self.habits.clone());
    }
}

fn make_settings_writer(
    store: &TrackerStore,
    user: Option<&UserId>,
    delay: Duration,
) -> DebouncedWriter<TrackerSettings> {
    let store = store.clone();
    let user = user.cloned();
    DebouncedWriter::new(delay, move |settings: TrackerSettings| {
        let store = store.clone();
        let user = user.clone();
        async move {
            let Some(user) = user else {
                tracing::debug!("No signed-in user; skipping settings write");
                return Ok(());
            };
            store
                .apply_patch(&user, &TrackerDocument::settings_patch(&settings))
                .await
        }
    })
}

fn make_habits_writer(
    store: &TrackerStore,
    user: Option<&UserId>,
    delay: Duration,
) -> DebouncedWriter<Vec<Habit>> {
    let store = store.clone();
    let user = user.cloned();
    DebouncedWriter::new(delay, move |habits: Vec<Habit>| {
        let store = store.clone();
        let user = user.clone();
        async move {
            let Some(user) = user else {
                tracing::debug!("No signed-in user; skipping habit write");
                return Ok(());
            };
            store
                .apply_patch(&user, &TrackerDocument::habits_patch(&habits))
                .await
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    use super::*;

    const SHORT_DELAY: Duration = Duration::from_millis(20);
    // Long enough that a test never races the timer.
    const HELD_DELAY: Duration = Duration::from_secs(60);

    fn user() -> UserId {
        UserId::new("test-user").unwrap()
    }

    fn state(store: &TrackerStore, delay: Duration) -> TrackerState {
        TrackerState::with_debounce(store.clone(), Some(user()), delay)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_without_user_stays_at_defaults() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = TrackerState::with_debounce(store, None, SHORT_DELAY);

        state.load().await;
        assert!(state.is_loaded());
        assert_eq!(*state.settings(), TrackerSettings::default());
        assert!(state.habits().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_with_no_stored_document_uses_defaults() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, SHORT_DELAY);

        state.load().await;
        assert!(state.is_loaded());
        assert_eq!(*state.settings(), TrackerSettings::default());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn added_habit_is_visible_before_persistence() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        let id = state.add_habit("Йога", 3, HabitTime::Morning).unwrap();

        // Visible in the working copy immediately...
        let habit = state.habit(id).unwrap();
        assert_eq!(habit.title, "Йога");
        assert!(habit.enabled);

        // ...and a repeated load never clobbers it.
        state.load().await;
        assert!(state.habit(id).is_some());

        // The store has not seen the habit yet.
        assert_eq!(store.load_document(&user()).await.unwrap(), None);
        assert!(state.has_unsaved_changes());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invalid_edit_mutates_nothing_and_schedules_nothing() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        let id = state.add_habit("Read", 2, HabitTime::Evening).unwrap();
        state.flush().await;
        assert!(!state.has_unsaved_changes());

        let patch = HabitPatch {
            title: Some(String::new()),
            ..HabitPatch::default()
        };
        assert!(state.update_habit(id, &patch).is_err());

        assert_eq!(state.habit(id).unwrap().title, "Read");
        assert!(!state.has_unsaved_changes());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn double_toggle_persists_the_final_value() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, SHORT_DELAY);
        state.load().await;

        // Mood starts disabled: on, then off again within one window.
        state.toggle_widget(WidgetKind::Mood);
        state.toggle_widget(WidgetKind::Mood);

        sleep(SHORT_DELAY * 6).await;

        let document = store.load_document(&user()).await.unwrap().unwrap();
        let enabled = document.enabled_widgets.unwrap();
        assert!(!enabled.contains(&"mood".to_string()));
        assert!(enabled.contains(&"water".to_string()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_removes_exactly_one_habit() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        let keep = state.add_habit("Read", 2, HabitTime::Evening).unwrap();
        let remove = state.add_habit("Run", 3, HabitTime::Morning).unwrap();
        state.complete_habit(keep).unwrap();
        let kept_before = state.habit(keep).unwrap().clone();

        state.delete_habit(remove).unwrap();

        assert_eq!(state.habits().len(), 1);
        assert_eq!(*state.habit(keep).unwrap(), kept_before);
        assert_eq!(kept_before.streak, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_unknown_habit_is_not_found() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        let err = state.delete_habit(HabitId::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(!state.has_unsaved_changes());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn flush_then_reload_roundtrips_both_sections() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        state.toggle_widget(WidgetKind::Nutrition);
        state
            .set_widget_goal(WidgetKind::Water, Some(1800.0))
            .unwrap();
        state.toggle_daily_plan(WidgetKind::Water);
        state.set_user_params(UserParams {
            height: Some(175.0),
            weight: Some(70.0),
            ..UserParams::default()
        });
        let id = state.add_habit("Read", 2, HabitTime::Evening).unwrap();
        state.flush().await;

        let mut reloaded = TrackerState::with_debounce(store, Some(user()), HELD_DELAY);
        reloaded.load().await;

        assert_eq!(reloaded.settings(), state.settings());
        assert_eq!(reloaded.habits(), state.habits());
        assert!(reloaded.habit(id).is_some());
        assert_eq!(reloaded.daily_plan(), vec![WidgetKind::Water]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cleared_goal_stays_cleared_after_reload() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        // Water ships with a stock goal; clearing it must not resurrect it.
        state.set_widget_goal(WidgetKind::Water, None).unwrap();
        state.flush().await;

        let mut reloaded = TrackerState::with_debounce(store, Some(user()), HELD_DELAY);
        reloaded.load().await;

        assert_eq!(reloaded.settings().widget(WidgetKind::Water).goal, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dispose_persists_pending_state_best_effort() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        state.add_habit("Read", 2, HabitTime::Evening).unwrap();
        state.dispose();
        drop(state);

        sleep(Duration::from_millis(200)).await;
        let document = store.load_document(&user()).await.unwrap().unwrap();
        assert_eq!(document.habits.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mutations_without_user_never_reach_the_store() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = TrackerState::with_debounce(store.clone(), None, SHORT_DELAY);
        state.load().await;

        state.toggle_widget(WidgetKind::Mood);
        state.add_habit("Read", 2, HabitTime::Evening).unwrap();
        state.flush().await;

        // Nothing was written for any user id.
        assert_eq!(
            store.load_document(&user()).await.unwrap(),
            None
        );
        // The optimistic copy still reflects the edits.
        assert!(state.settings().widget(WidgetKind::Mood).enabled);
        assert_eq!(state.habits().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn streak_bookkeeping() {
        let store = TrackerStore::open_in_memory().unwrap();
        let mut state = state(&store, HELD_DELAY);
        state.load().await;

        let id = state.add_habit("Run", 3, HabitTime::Morning).unwrap();
        assert_eq!(state.complete_habit(id).unwrap(), 1);
        assert_eq!(state.complete_habit(id).unwrap(), 2);
        state.reset_streak(id).unwrap();
        assert_eq!(state.habit(id).unwrap().streak, 0);
    }
}

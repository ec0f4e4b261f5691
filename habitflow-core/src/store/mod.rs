//! Habit store
//!
//! Owns a [`HabitRepository`] and a [`Clock`] and implements the mutation
//! flows of the app. Each flow loads the habit list, changes one habit,
//! recomputes its streaks and saves the list back. Callers are expected to
//! run one mutation at a time.
//!
//! This is also the validation boundary: names, goal counts, completion
//! levels and dates are checked here so the analytics functions can assume
//! well-formed input.

pub mod repo;

pub use repo::{HabitRepository, JsonFileRepository, MemoryRepository};

use crate::analytics::{calculate_streaks_with, AnalyticsPolicy};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::types::{CompletionLevel, CompletionRecord, Habit, NewHabit};
use chrono::NaiveDate;

/// Mutation and lookup operations over a habit repository.
pub struct HabitStore<R, C> {
    repo: R,
    clock: C,
    policy: AnalyticsPolicy,
}

impl<R: HabitRepository, C: Clock> HabitStore<R, C> {
    /// Create a store with the default analytics policy.
    pub fn new(repo: R, clock: C) -> Self {
        Self::with_policy(repo, clock, AnalyticsPolicy::default())
    }

    /// Create a store that recomputes streaks under `policy`.
    pub fn with_policy(repo: R, clock: C, policy: AnalyticsPolicy) -> Self {
        Self {
            repo,
            clock,
            policy,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn policy(&self) -> &AnalyticsPolicy {
        &self.policy
    }

    /// All habits in stored order.
    pub fn habits(&self) -> Result<Vec<Habit>> {
        self.repo.load()
    }

    /// Look up a habit by exact id.
    pub fn habit(&self, id: &str) -> Result<Habit> {
        self.repo
            .load()?
            .into_iter()
            .find(|h| h.id == id)
            .ok_or_else(|| Error::HabitNotFound(id.to_string()))
    }

    /// Resolve an exact id or a unique id prefix to a full id.
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<String> {
        let habits = self.repo.load()?;
        if habits.iter().any(|h| h.id == id_or_prefix) {
            return Ok(id_or_prefix.to_string());
        }

        let mut matches = habits.iter().filter(|h| h.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(habit), None) if !id_or_prefix.is_empty() => Ok(habit.id.clone()),
            (Some(_), Some(_)) => Err(Error::Validation(format!(
                "habit id prefix '{id_or_prefix}' is ambiguous"
            ))),
            _ => Err(Error::HabitNotFound(id_or_prefix.to_string())),
        }
    }

    /// Create a habit from `new` with a fresh id and empty history.
    pub fn add_habit(&self, new: NewHabit) -> Result<Habit> {
        new.validate()?;

        let mut habits = self.repo.load()?;
        let habit = new.into_habit(uuid::Uuid::new_v4().to_string(), self.clock.now());
        habits.push(habit.clone());
        self.repo.save(&habits)?;

        tracing::info!(habit_id = %habit.id, name = %habit.name, "habit added");
        Ok(habit)
    }

    /// Replace a habit's stored fields, keeping its streaks consistent.
    ///
    /// The incoming habit goes through the same checks as new habits and
    /// logged completions, so its history may not reach past today.
    pub fn update_habit(&self, updated: Habit) -> Result<Habit> {
        updated.validate()?;
        if let Some(&last) = updated.completion_map.keys().next_back() {
            self.check_date(last)?;
        }

        let id = updated.id.clone();
        self.modify(&id, move |habit| {
            let previous_longest = habit.longest_streak.max(updated.longest_streak);
            *habit = updated;
            habit.longest_streak = previous_longest;
            Ok(())
        })
    }

    /// Delete a habit and its whole history.
    pub fn delete_habit(&self, id: &str) -> Result<()> {
        let mut habits = self.repo.load()?;
        let before = habits.len();
        habits.retain(|h| h.id != id);
        if habits.len() == before {
            return Err(Error::HabitNotFound(id.to_string()));
        }
        self.repo.save(&habits)?;

        tracing::info!(habit_id = %id, "habit deleted");
        Ok(())
    }

    /// Record `level` for `date`.
    ///
    /// A non-zero level clears any previously logged miss reason; logging 0
    /// keeps it.
    pub fn set_completion(
        &self,
        id: &str,
        date: NaiveDate,
        level: CompletionLevel,
    ) -> Result<Habit> {
        self.check_date(date)?;

        self.modify(id, |habit| {
            if !habit.allow_partial && !level.is_whole() {
                return Err(Error::Validation(format!(
                    "habit '{}' does not allow partial completion",
                    habit.name
                )));
            }

            let record = habit.completion_map.entry(date).or_default();
            record.completion_level = level;
            if level.is_started() {
                record.reason = None;
            }

            tracing::debug!(
                habit_id = %habit.id,
                %date,
                level = level.value(),
                "completion recorded"
            );
            Ok(())
        })
    }

    /// Record a miss (level 0) with a reason for `date`.
    pub fn log_missed_reason(&self, id: &str, date: NaiveDate, reason: &str) -> Result<Habit> {
        self.check_date(date)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::Validation("reason must not be empty".to_string()));
        }

        self.modify(id, |habit| {
            habit
                .completion_map
                .insert(date, CompletionRecord::missed(reason));

            tracing::debug!(habit_id = %habit.id, %date, reason, "miss recorded");
            Ok(())
        })
    }

    fn check_date(&self, date: NaiveDate) -> Result<()> {
        let today = self.clock.today();
        if date > today {
            return Err(Error::Validation(format!(
                "cannot log {date}: it is after today ({today})"
            )));
        }
        Ok(())
    }

    /// Load, apply `change` to habit `id`, refresh its streaks, save.
    fn modify<F>(&self, id: &str, change: F) -> Result<Habit>
    where
        F: FnOnce(&mut Habit) -> Result<()>,
    {
        let mut habits = self.repo.load()?;
        let habit = habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| Error::HabitNotFound(id.to_string()))?;

        change(habit)?;
        self.refresh_streaks(habit);
        let updated = habit.clone();

        self.repo.save(&habits)?;
        Ok(updated)
    }

    fn refresh_streaks(&self, habit: &mut Habit) {
        let summary = calculate_streaks_with(
            &habit.completion_map,
            self.clock.today(),
            self.policy.recovery_days_allowed,
        )
        .merge_longest(habit.longest_streak);

        habit.current_streak = summary.current_streak;
        habit.longest_streak = summary.longest_streak;

        tracing::debug!(
            habit_id = %habit.id,
            current_streak = summary.current_streak,
            longest_streak = summary.longest_streak,
            "streaks refreshed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 20).unwrap()
    }

    fn store() -> HabitStore<MemoryRepository, FixedClock> {
        HabitStore::new(MemoryRepository::new(), FixedClock::new(today()))
    }

    fn partial_habit(store: &HabitStore<MemoryRepository, FixedClock>) -> Habit {
        let mut new = NewHabit::named("Read");
        new.allow_partial = true;
        store.add_habit(new).unwrap()
    }

    #[test]
    fn test_add_habit_assigns_identity() {
        let store = store();
        let habit = store.add_habit(NewHabit::named("  Read  ")).unwrap();

        assert_eq!(habit.name, "Read");
        assert_eq!(habit.created_on(), today());
        assert!(habit.completion_map.is_empty());
        assert_eq!(store.habits().unwrap().len(), 1);
        assert_eq!(store.habit(&habit.id).unwrap(), habit);
    }

    #[test]
    fn test_add_habit_validates() {
        let store = store();
        assert!(matches!(
            store.add_habit(NewHabit::named("")),
            Err(Error::Validation(_))
        ));
        assert!(store.habits().unwrap().is_empty());
    }

    #[test]
    fn test_set_completion_updates_streaks() {
        let store = store();
        let habit = partial_habit(&store);

        for offset in [3, 2, 0] {
            let day = today() - Duration::days(offset);
            store
                .set_completion(&habit.id, day, CompletionLevel::Full)
                .unwrap();
        }

        let stored = store.habit(&habit.id).unwrap();
        assert_eq!(stored.current_streak, 3);
        assert_eq!(stored.longest_streak, 3);
    }

    #[test]
    fn test_completion_clears_reason() {
        let store = store();
        let habit = partial_habit(&store);
        let day = today() - Duration::days(1);

        let logged = store.log_missed_reason(&habit.id, day, "Busy").unwrap();
        assert_eq!(logged.completion_map[&day].reason.as_deref(), Some("Busy"));

        // Level 0 keeps the reason
        let zero = store
            .set_completion(&habit.id, day, CompletionLevel::None)
            .unwrap();
        assert_eq!(zero.completion_map[&day].reason.as_deref(), Some("Busy"));

        let done = store
            .set_completion(&habit.id, day, CompletionLevel::Half)
            .unwrap();
        assert_eq!(done.completion_map[&day].completion_level, CompletionLevel::Half);
        assert!(done.completion_map[&day].reason.is_none());
    }

    #[test]
    fn test_longest_streak_never_regresses() {
        let store = store();
        let habit = partial_habit(&store);
        for offset in 0..5 {
            let day = today() - Duration::days(offset);
            store
                .set_completion(&habit.id, day, CompletionLevel::Full)
                .unwrap();
        }
        assert_eq!(store.habit(&habit.id).unwrap().longest_streak, 5);

        // Break the run in the middle
        store
            .log_missed_reason(&habit.id, today() - Duration::days(2), "Sick")
            .unwrap();
        let after_one_miss = store.habit(&habit.id).unwrap();
        assert_eq!(after_one_miss.current_streak, 4);

        store
            .set_completion(&habit.id, today() - Duration::days(1), CompletionLevel::Quarter)
            .unwrap();
        let after = store.habit(&habit.id).unwrap();
        assert_eq!(after.current_streak, 1);
        assert_eq!(after.longest_streak, 5);
    }

    #[test]
    fn test_rejects_partial_when_not_allowed() {
        let store = store();
        let habit = store.add_habit(NewHabit::named("Walk")).unwrap();
        let err = store
            .set_completion(&habit.id, today(), CompletionLevel::Half)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.habit(&habit.id).unwrap().completion_map.is_empty());
    }

    #[test]
    fn test_rejects_future_dates_and_unknown_ids() {
        let store = store();
        let habit = partial_habit(&store);
        assert!(matches!(
            store.set_completion(&habit.id, today() + Duration::days(1), CompletionLevel::Full),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            store.set_completion("missing", today(), CompletionLevel::Full),
            Err(Error::HabitNotFound(_))
        ));
        assert!(matches!(
            store.log_missed_reason(&habit.id, today(), "  "),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_update_and_delete() {
        let store = store();
        let habit = partial_habit(&store);
        store
            .set_completion(&habit.id, today(), CompletionLevel::Full)
            .unwrap();

        let mut edited = store.habit(&habit.id).unwrap();
        edited.name = "Read more".to_string();
        edited.longest_streak = 0;
        let saved = store.update_habit(edited).unwrap();
        assert_eq!(saved.name, "Read more");
        assert_eq!(saved.longest_streak, 1);

        store.delete_habit(&habit.id).unwrap();
        assert!(store.habits().unwrap().is_empty());
        assert!(matches!(
            store.delete_habit(&habit.id),
            Err(Error::HabitNotFound(_))
        ));
    }

    #[test]
    fn test_update_habit_enforces_store_rules() {
        let store = store();
        let habit = store.add_habit(NewHabit::named("Walk")).unwrap();
        store
            .set_completion(&habit.id, today(), CompletionLevel::Full)
            .unwrap();
        let stored = store.habit(&habit.id).unwrap();

        let mut future = stored.clone();
        for offset in 1..=3 {
            future.completion_map.insert(
                today() + Duration::days(offset),
                CompletionRecord::completed(CompletionLevel::Full),
            );
        }
        assert!(matches!(
            store.update_habit(future),
            Err(Error::Validation(_))
        ));

        let mut partial = stored.clone();
        partial
            .completion_map
            .insert(today(), CompletionRecord::completed(CompletionLevel::Half));
        assert!(matches!(
            store.update_habit(partial),
            Err(Error::Validation(_))
        ));

        let mut timer = stored.clone();
        timer.habit_type = crate::types::HabitType::Timer;
        timer.duration_minutes = None;
        assert!(matches!(
            store.update_habit(timer),
            Err(Error::Validation(_))
        ));

        let mut blank = stored.clone();
        blank.name = "  ".to_string();
        assert!(store.update_habit(blank).is_err());

        // Nothing rejected reached the repository
        assert_eq!(store.habit(&habit.id).unwrap(), stored);

        // Allowing partial completion makes the same edit valid
        let mut partial = stored.clone();
        partial.allow_partial = true;
        partial.completion_map.insert(
            today() - Duration::days(1),
            CompletionRecord::completed(CompletionLevel::Half),
        );
        let saved = store.update_habit(partial).unwrap();
        assert!(saved.allow_partial);
        assert_eq!(saved.completion_map.len(), 2);
        assert_eq!(saved.current_streak, 1);
    }

    #[test]
    fn test_resolve_id_prefix() {
        let repo = MemoryRepository::with_habits(vec![
            NewHabit::named("A").into_habit("abc123".into(), chrono::Utc::now()),
            NewHabit::named("B").into_habit("abd456".into(), chrono::Utc::now()),
        ]);
        let store = HabitStore::new(repo, FixedClock::new(today()));

        assert_eq!(store.resolve_id("abc").unwrap(), "abc123");
        assert_eq!(store.resolve_id("abd456").unwrap(), "abd456");
        assert!(matches!(store.resolve_id("ab"), Err(Error::Validation(_))));
        assert!(matches!(store.resolve_id("zz"), Err(Error::HabitNotFound(_))));
        assert!(store.resolve_id("").is_err());
    }
}

//! Integration tests for habitflow store and analytics
//!
//! These tests drive the store against an on-disk JSON repository and check
//! that the analytics engine sees what was recorded.

use chrono::{Duration, NaiveDate};
use habitflow_core::analytics::{
    calculate_consistency_score, calculate_streaks, daily_stats, generate_weekly_analytics,
    heatmap_data, monthly_stats, weekly_stats, Month,
};
use habitflow_core::{
    CompletionLevel, Difficulty, FixedClock, HabitStore, JsonFileRepository, NewHabit,
};
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 20).unwrap()
}

fn days_ago(n: i64) -> NaiveDate {
    today() - Duration::days(n)
}

/// Store whose clock reads `day`, sharing one file across instances
fn store_at(dir: &TempDir, day: NaiveDate) -> HabitStore<JsonFileRepository, FixedClock> {
    let repo = JsonFileRepository::new(dir.path().join("habits.json"));
    HabitStore::new(repo, FixedClock::new(day))
}

// ============================================
// End-to-end scenario
// ============================================

#[test]
fn test_ten_day_history_with_two_missed_days() {
    habitflow_core::logging::init_test();
    let dir = TempDir::new().unwrap();

    // Created 10 days ago
    let habit = store_at(&dir, days_ago(10))
        .add_habit(NewHabit::named("Read"))
        .unwrap();

    let store = store_at(&dir, today());
    for offset in (5..=9).chain(0..=2) {
        store
            .set_completion(&habit.id, days_ago(offset), CompletionLevel::Full)
            .unwrap();
    }

    // Days -4 and -3 are both missed: a gap of 2 exceeds the allowance, so
    // the run -9..-5 and the run -2..0 stay separate.
    let stored = store.habit(&habit.id).unwrap();
    assert_eq!(stored.current_streak, 3);
    assert_eq!(stored.longest_streak, 5);

    let recomputed = calculate_streaks(&stored.completion_map, today());
    assert_eq!(recomputed.current_streak, 3);
    assert_eq!(recomputed.longest_streak, 5);

    // One tolerated miss (-3 completed) joins everything into a single run
    store
        .set_completion(&habit.id, days_ago(3), CompletionLevel::Full)
        .unwrap();
    let joined = store.habit(&habit.id).unwrap();
    assert_eq!(joined.current_streak, 9);
    assert_eq!(joined.longest_streak, 9);
}

#[test]
fn test_stale_history_keeps_longest() {
    let dir = TempDir::new().unwrap();
    let habit = store_at(&dir, days_ago(20))
        .add_habit(NewHabit::named("Run"))
        .unwrap();

    let past = store_at(&dir, days_ago(10));
    for offset in 10..=14 {
        past.set_completion(&habit.id, days_ago(offset), CompletionLevel::Full)
            .unwrap();
    }
    assert_eq!(past.habit(&habit.id).unwrap().current_streak, 5);

    // Three days later nothing new was logged; the next mutation sees a stale streak
    let later = store_at(&dir, today());
    let after = later
        .log_missed_reason(&habit.id, days_ago(1), "Travel")
        .unwrap();
    assert_eq!(after.current_streak, 0);
    assert_eq!(after.longest_streak, 5);
}

// ============================================
// Aggregates over stored habits
// ============================================

#[test]
fn test_aggregates_ignore_days_before_creation() {
    let dir = TempDir::new().unwrap();

    let mut easy = NewHabit::named("Stretch");
    easy.difficulty = Difficulty::Easy;
    easy.allow_partial = true;
    let old = store_at(&dir, days_ago(40)).add_habit(easy).unwrap();
    let new = store_at(&dir, days_ago(1))
        .add_habit(NewHabit::named("Journal"))
        .unwrap();

    let store = store_at(&dir, today());
    store
        .set_completion(&old.id, today(), CompletionLevel::Half)
        .unwrap();
    store
        .set_completion(&new.id, today(), CompletionLevel::Full)
        .unwrap();
    // Logged before the journal habit existed
    store
        .set_completion(&new.id, days_ago(3), CompletionLevel::Full)
        .unwrap();

    let habits = store.habits().unwrap();

    let daily = daily_stats(&habits, today());
    assert_eq!(daily.total, 2);
    assert_eq!(daily.completed, 1.5);
    assert_eq!(daily.pending, 0.5);

    let weekly = weekly_stats(&habits, today());
    assert_eq!(weekly.total, 7 + 2);
    assert_eq!(weekly.completed, 1.5);

    let monthly = monthly_stats(&habits, today());
    assert_eq!(monthly.total, 20 + 2);

    let heatmap = heatmap_data(&habits, Month::containing(today()));
    assert_eq!(heatmap[&days_ago(3)].total, 1);
    assert_eq!(heatmap[&days_ago(3)].completed, 0.0);

    let score = calculate_consistency_score(&habits, today());
    assert!(score <= 100);
}

#[test]
fn test_weekly_report_from_store() {
    let dir = TempDir::new().unwrap();
    let habit = store_at(&dir, days_ago(3))
        .add_habit(NewHabit::named("Meditate"))
        .unwrap();

    let store = store_at(&dir, today());
    store
        .log_missed_reason(&habit.id, days_ago(2), "Forgot")
        .unwrap();
    store
        .set_completion(&habit.id, days_ago(1), CompletionLevel::Full)
        .unwrap();
    store
        .set_completion(&habit.id, today(), CompletionLevel::Full)
        .unwrap();

    let habits = store.habits().unwrap();
    let report = generate_weekly_analytics(&habits, today());
    let week = &report.habits_data[0];

    assert_eq!(week.habit_name, "Meditate");
    assert_eq!(week.current_streak, 2);
    assert_eq!(
        week.completion_history,
        vec![None, None, None, Some(0.0), Some(0.0), Some(1.0), Some(1.0)]
    );
    assert_eq!(week.missed_reasons[4].as_deref(), Some("Forgot"));
    assert_eq!(report.date_range, "October 14 - October 20");
    assert_eq!(
        report.current_consistency_score,
        calculate_consistency_score(&habits, today())
    );
}

#[test]
fn test_store_file_is_portable_json() {
    let dir = TempDir::new().unwrap();
    let store = store_at(&dir, today());
    let habit = store.add_habit(NewHabit::named("Water")).unwrap();
    store
        .set_completion(&habit.id, today(), CompletionLevel::Full)
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("habits.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json[0];
    assert_eq!(entry["name"], "Water");
    assert_eq!(entry["completionMap"]["2024-10-20"]["completionLevel"], 1.0);
    assert_eq!(entry["currentStreak"], 1);
    assert_eq!(entry["longestStreak"], 1);
}

//! Weekly analytics report.
//!
//! Structured last-7-days snapshot handed to the external summary and
//! insight generator. It carries data only; any prose is produced downstream.

use chrono::NaiveDate;
use serde::Serialize;

use super::consistency::calculate_consistency_score_with;
use super::period::last_n_days;
use super::policy::AnalyticsPolicy;
use crate::format::{date_range, weekday_name};
use crate::types::{CompletionRecord, Difficulty, Habit};

/// Number of days covered by the report.
pub const REPORT_DAYS: usize = 7;

/// One habit's week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWeeklyAnalytics {
    pub habit_name: String,
    pub difficulty: Difficulty,
    /// Completion level per day, oldest first; `None` before the habit existed
    pub completion_history: Vec<Option<f64>>,
    /// Logged miss reason per day, oldest first
    pub missed_reasons: Vec<Option<String>>,
    /// Streak as currently stored on the habit
    pub current_streak: u32,
}

/// The full weekly report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAnalyticsReport {
    pub habits_data: Vec<HabitWeeklyAnalytics>,
    pub current_consistency_score: u8,
    /// Weekday names of the covered days (e.g., "Monday"), oldest first
    pub day_names: Vec<String>,
    /// e.g. "October 28 - November 3"
    pub date_range: String,
}

/// Build the report for the 7 days ending at `today`.
pub fn generate_weekly_analytics(habits: &[Habit], today: NaiveDate) -> WeeklyAnalyticsReport {
    generate_weekly_analytics_with(habits, today, &AnalyticsPolicy::default())
}

/// Build the report scoring consistency under `policy`.
pub fn generate_weekly_analytics_with(
    habits: &[Habit],
    today: NaiveDate,
    policy: &AnalyticsPolicy,
) -> WeeklyAnalyticsReport {
    let days: Vec<NaiveDate> = last_n_days(today, REPORT_DAYS as i64).collect();
    let day_names = days.iter().copied().map(weekday_name).collect();
    let date_range = date_range(days[0], days[REPORT_DAYS - 1]);

    let habits_data = habits
        .iter()
        .map(|habit| habit_week(habit, &days))
        .collect();

    WeeklyAnalyticsReport {
        habits_data,
        current_consistency_score: calculate_consistency_score_with(habits, today, policy),
        day_names,
        date_range,
    }
}

fn habit_week(habit: &Habit, days: &[NaiveDate]) -> HabitWeeklyAnalytics {
    let (completion_history, missed_reasons) = days
        .iter()
        .map(|day| {
            if !habit.is_trackable_on(*day) {
                return (None, None);
            }
            match habit.record_on(*day) {
                Some(CompletionRecord {
                    completion_level,
                    reason,
                }) => (Some(completion_level.value()), reason.clone()),
                None => (Some(0.0), None),
            }
        })
        .unzip();

    HabitWeeklyAnalytics {
        habit_name: habit.name.clone(),
        difficulty: habit.difficulty,
        completion_history,
        missed_reasons,
        current_streak: habit.current_streak,
    }
}

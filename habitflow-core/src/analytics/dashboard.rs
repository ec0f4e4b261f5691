//! Dashboard analytics.
//!
//! Bundles the figures the dashboard widgets show side by side so one pass
//! computes them all against the same `today`.

use chrono::NaiveDate;
use serde::Serialize;

use super::consistency::calculate_consistency_score_with;
use super::period::{daily_stats, fully_completed_count, monthly_stats, weekly_stats, PeriodStats};
use super::policy::AnalyticsPolicy;
use crate::types::Habit;

/// Dashboard statistics for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Day the figures were computed for
    pub today: NaiveDate,
    /// Number of habits
    pub habit_count: usize,
    /// Habits fully completed today
    pub completed_today: usize,

    // Periods
    pub daily: PeriodStats,
    pub weekly: PeriodStats,
    pub monthly: PeriodStats,

    /// Consistency score (0-100)
    pub consistency_score: u8,
    /// Highest current streak across habits
    pub best_current_streak: u32,
    /// Longest streak ever across habits
    pub longest_streak: u32,
}

impl DashboardSummary {
    /// Compute every dashboard figure for `today`.
    pub fn compute(habits: &[Habit], today: NaiveDate, policy: &AnalyticsPolicy) -> Self {
        Self {
            today,
            habit_count: habits.len(),
            completed_today: fully_completed_count(habits, today),
            daily: daily_stats(habits, today),
            weekly: weekly_stats(habits, today),
            monthly: monthly_stats(habits, today),
            consistency_score: calculate_consistency_score_with(habits, today, policy),
            best_current_streak: habits.iter().map(|h| h.current_streak).max().unwrap_or(0),
            longest_streak: habits.iter().map(|h| h.longest_streak).max().unwrap_or(0),
        }
    }

    /// Format a streak for display (e.g., "1 day", "12 days").
    pub fn format_streak(days: u32) -> String {
        if days == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", days)
        }
    }
}

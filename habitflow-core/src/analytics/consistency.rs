//! Consistency score.
//!
//! Blends each habit's recent success rate with its current streak, weights
//! the result by difficulty, and averages across habits into a 0-100 score.

use chrono::{Duration, NaiveDate};

use super::policy::AnalyticsPolicy;
use crate::types::Habit;

/// Consistency score (0-100) with the default policy.
pub fn calculate_consistency_score(habits: &[Habit], today: NaiveDate) -> u8 {
    calculate_consistency_score_with(habits, today, &AnalyticsPolicy::default())
}

/// Consistency score (0-100) under `policy`.
///
/// Returns 0 for an empty habit list. Individual habits may score above 100
/// after the difficulty multiplier; the average is capped.
pub fn calculate_consistency_score_with(
    habits: &[Habit],
    today: NaiveDate,
    policy: &AnalyticsPolicy,
) -> u8 {
    if habits.is_empty() {
        return 0;
    }

    let total: f64 = habits
        .iter()
        .map(|habit| habit_consistency_score(habit, today, policy))
        .sum();
    let average = total / habits.len() as f64;

    tracing::debug!(habits = habits.len(), average, "computed consistency score");

    average.clamp(0.0, 100.0).round() as u8
}

/// One habit's difficulty-weighted contribution before averaging and capping.
pub fn habit_consistency_score(habit: &Habit, today: NaiveDate, policy: &AnalyticsPolicy) -> f64 {
    let recent_success_rate = recent_success_rate(habit, today, policy.consistency_lookback_days);

    let streak_ratio = habit.current_streak as f64 / policy.streak_target_days as f64;
    let streak_score = streak_ratio.min(1.0) * 100.0;

    let habit_score =
        recent_success_rate * policy.success_rate_weight + streak_score * policy.streak_weight;

    habit_score * policy.difficulty_multiplier(habit.difficulty)
}

/// Average completion (as a percentage) over the trackable days of the
/// `lookback_days` window ending at `today`.
pub fn recent_success_rate(habit: &Habit, today: NaiveDate, lookback_days: u32) -> f64 {
    let (sum, tracked) = (0..lookback_days as i64)
        .map(|offset| today - Duration::days(offset))
        .filter(|day| habit.is_trackable_on(*day))
        .fold((0.0, 0u32), |(sum, tracked), day| {
            (sum + habit.completion_on(day), tracked + 1)
        });

    if tracked == 0 {
        0.0
    } else {
        (sum / tracked as f64) * 100.0
    }
}

//! Period aggregation for dashboards, charts and heatmaps.
//!
//! Every aggregate shares one policy: a habit only counts on days it is
//! trackable (on or after its local creation day). Untrackable days are left
//! out of both the completed sum and the total.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::format::short_month_day;
use crate::types::Habit;

// ============================================
// Month
// ============================================

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    /// Month `month` (1-12) of `year`.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| Error::InvalidMonth(format!("{year:04}-{month:02}")))
    }

    /// The month `day` falls in.
    pub fn containing(day: NaiveDate) -> Self {
        Self {
            first: day.with_day(1).unwrap_or(day),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.days().last().unwrap_or(self.first)
    }

    /// Every day of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.first.month();
        self.first.iter_days().take_while(move |d| d.month() == month)
    }

    /// Get the previous month.
    pub fn previous(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(*self)
    }

    /// Get the next month.
    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(*self)
    }

    /// Get display name for this month (e.g., "December 2024").
    pub fn display_name(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Month::new(year, month)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

// ============================================
// Aggregates
// ============================================

/// Completed vs pending habit-days over a period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeriodStats {
    /// Sum of completion levels (fractional)
    pub completed: f64,
    /// `total - completed`
    pub pending: f64,
    /// Number of trackable habit-days
    pub total: u32,
}

impl PeriodStats {
    /// Completion percentage, 0 when nothing was trackable.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed / self.total as f64) * 100.0
        }
    }

    fn add_day(&mut self, completed: f64, total: u32) {
        self.completed += completed;
        self.total += total;
        self.pending = self.total as f64 - self.completed;
    }
}

/// One heatmap square.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HeatmapCell {
    /// `completed / total * 100`, or 0 when `total` is 0
    pub intensity: f64,
    /// Sum of completion levels of trackable habits
    pub completed: f64,
    /// Number of trackable habits; 0 means no habit existed yet
    pub total: u32,
}

/// One point of the monthly progress line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// Axis label (e.g., "Oct 3")
    pub label: String,
    /// Raw sum of completion levels across all habits
    pub completions: f64,
}

/// Completed sum and trackable count for a single day.
fn day_breakdown(habits: &[Habit], day: NaiveDate) -> (f64, u32) {
    habits
        .iter()
        .filter(|habit| habit.is_trackable_on(day))
        .fold((0.0, 0), |(completed, total), habit| {
            (completed + habit.completion_on(day), total + 1)
        })
}

fn accumulate(habits: &[Habit], days: impl IntoIterator<Item = NaiveDate>) -> PeriodStats {
    days.into_iter()
        .fold(PeriodStats::default(), |mut stats, day| {
            let (completed, total) = day_breakdown(habits, day);
            stats.add_day(completed, total);
            stats
        })
}

/// Stats for `today` alone.
pub fn daily_stats(habits: &[Habit], today: NaiveDate) -> PeriodStats {
    accumulate(habits, [today])
}

/// Stats over the 7 days ending at `today` (inclusive).
pub fn weekly_stats(habits: &[Habit], today: NaiveDate) -> PeriodStats {
    accumulate(habits, last_n_days(today, 7))
}

/// Stats from the 1st of `today`'s month through `today`.
pub fn monthly_stats(habits: &[Habit], today: NaiveDate) -> PeriodStats {
    let days = Month::containing(today)
        .days()
        .take_while(|day| *day <= today);
    accumulate(habits, days)
}

/// Heatmap cell for every day of `month`, including days after today.
pub fn heatmap_data(habits: &[Habit], month: Month) -> BTreeMap<NaiveDate, HeatmapCell> {
    month
        .days()
        .map(|day| {
            let (completed, total) = day_breakdown(habits, day);
            let intensity = if total > 0 {
                (completed / total as f64) * 100.0
            } else {
                0.0
            };
            (
                day,
                HeatmapCell {
                    intensity,
                    completed,
                    total,
                },
            )
        })
        .collect()
}

/// Total completion per day of `month` across all habits.
///
/// Unlike the other aggregates this ignores trackability: it is a raw
/// progress series with no denominator.
pub fn monthly_chart_series(habits: &[Habit], month: Month) -> Vec<ChartPoint> {
    month
        .days()
        .map(|day| ChartPoint {
            date: day,
            label: short_month_day(day),
            completions: habits.iter().map(|habit| habit.completion_on(day)).sum(),
        })
        .collect()
}

/// Number of habits fully completed on `day`.
pub fn fully_completed_count(habits: &[Habit], day: NaiveDate) -> usize {
    habits
        .iter()
        .filter(|habit| {
            habit
                .record_on(day)
                .is_some_and(|record| record.completion_level.is_full())
        })
        .count()
}

/// The `n` days ending at `today`, oldest first.
pub fn last_n_days(today: NaiveDate, n: i64) -> impl Iterator<Item = NaiveDate> {
    (0..n).rev().map(move |offset| today - Duration::days(offset))
}

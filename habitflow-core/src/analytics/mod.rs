//! Analytics engine for habitflow
//!
//! Pure functions that turn completion histories into:
//! - Current and longest streaks ([`streaks`])
//! - A weighted 0-100 consistency score ([`consistency`])
//! - Daily, weekly and monthly stats, heatmaps and chart series ([`period`])
//! - The weekly report consumed by the summary generator ([`weekly`])
//! - Dashboard bundles ([`dashboard`])
//!
//! Nothing here performs I/O or reads a clock. Every operation takes the
//! reference day explicitly and degrades to zeros on empty input.

pub mod consistency;
pub mod dashboard;
pub mod period;
pub mod policy;
pub mod streaks;
pub mod weekly;

pub use consistency::{
    calculate_consistency_score, calculate_consistency_score_with, habit_consistency_score,
    recent_success_rate,
};
pub use dashboard::DashboardSummary;
pub use period::{
    daily_stats, heatmap_data, monthly_chart_series, monthly_stats, weekly_stats, ChartPoint,
    HeatmapCell, Month, PeriodStats,
};
pub use policy::{AnalyticsPolicy, RECOVERY_DAYS_ALLOWED};
pub use streaks::{calculate_streaks, calculate_streaks_with, StreakSummary};
pub use weekly::{
    generate_weekly_analytics, generate_weekly_analytics_with, HabitWeeklyAnalytics,
    WeeklyAnalyticsReport,
};

//! Formatting helpers shared by reports and the CLI.

use chrono::NaiveDate;

/// Full weekday name (e.g., "Monday").
pub fn weekday_name(day: NaiveDate) -> String {
    day.format("%A").to_string()
}

/// Long month and day (e.g., "October 28").
pub fn long_month_day(day: NaiveDate) -> String {
    day.format("%B %-d").to_string()
}

/// Abbreviated month and day used for chart axes (e.g., "Oct 28").
pub fn short_month_day(day: NaiveDate) -> String {
    day.format("%b %-d").to_string()
}

/// Date range between two days (e.g., "October 28 - November 3").
pub fn date_range(first: NaiveDate, last: NaiveDate) -> String {
    format!("{} - {}", long_month_day(first), long_month_day(last))
}

/// Format a day relative to `today` (e.g., "yesterday", "3d ago").
pub fn format_relative_day(day: NaiveDate, today: NaiveDate) -> String {
    let days = (today - day).num_days();

    if days < 0 {
        "upcoming".to_string()
    } else if days == 0 {
        "today".to_string()
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        short_month_day(day)
    }
}

/// Format an optional day relative to `today`, or "never" if missing.
pub fn format_relative_day_opt(day: Option<NaiveDate>, today: NaiveDate) -> String {
    match day {
        Some(day) => format_relative_day(day, today),
        None => "never".to_string(),
    }
}

/// Format a percentage with no decimals (e.g., "67%").
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

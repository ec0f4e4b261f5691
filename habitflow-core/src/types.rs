//! Core domain types for habitflow
//!
//! These types represent the data model the analytics engine reads and the
//! store persists.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A recurring goal the person tracks day by day |
//! | **Completion level** | Fractional progress on one habit for one day (0, ¼, ½, ¾, 1) |
//! | **Completion map** | Per-habit record of completion levels keyed by calendar date |
//! | **Trackable day** | A calendar day on or after the habit's creation day |
//! | **Streak** | A run of fully completed days tolerant of short gaps |
//!
//! Dates are calendar values ([`NaiveDate`]) with no time component. A habit's
//! creation instant is stored in UTC and normalized to the local calendar day
//! whenever it is compared against a date key.

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered per-date completion history of a single habit.
pub type CompletionMap = BTreeMap<NaiveDate, CompletionRecord>;

// ============================================
// Completion
// ============================================

/// Fractional completion of a habit on one day.
///
/// Only the five quarter steps are representable. Anything else is rejected
/// when converting from a raw number, which is how the store boundary
/// validates persisted and user-supplied levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum CompletionLevel {
    /// Not done (0)
    #[default]
    None,
    /// A quarter done (0.25)
    Quarter,
    /// Half done (0.5)
    Half,
    /// Three quarters done (0.75)
    ThreeQuarters,
    /// Fully done (1)
    Full,
}

impl CompletionLevel {
    /// All levels in ascending order.
    pub const ALL: [CompletionLevel; 5] = [
        CompletionLevel::None,
        CompletionLevel::Quarter,
        CompletionLevel::Half,
        CompletionLevel::ThreeQuarters,
        CompletionLevel::Full,
    ];

    /// Numeric value in `[0, 1]`.
    pub fn value(self) -> f64 {
        match self {
            CompletionLevel::None => 0.0,
            CompletionLevel::Quarter => 0.25,
            CompletionLevel::Half => 0.5,
            CompletionLevel::ThreeQuarters => 0.75,
            CompletionLevel::Full => 1.0,
        }
    }

    /// Whether this level counts toward a streak.
    pub fn is_full(self) -> bool {
        self == CompletionLevel::Full
    }

    /// Whether any progress was recorded.
    pub fn is_started(self) -> bool {
        self != CompletionLevel::None
    }

    /// Whether the level is allowed on habits without partial completion.
    pub fn is_whole(self) -> bool {
        matches!(self, CompletionLevel::None | CompletionLevel::Full)
    }
}

impl TryFrom<f64> for CompletionLevel {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        CompletionLevel::ALL
            .into_iter()
            .find(|level| level.value() == value)
            .ok_or(Error::InvalidCompletionLevel(value))
    }
}

impl From<CompletionLevel> for f64 {
    fn from(level: CompletionLevel) -> Self {
        level.value()
    }
}

impl fmt::Display for CompletionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.value() * 100.0) as u32)
    }
}

/// What was logged for one habit on one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    /// Progress for the day
    pub completion_level: CompletionLevel,
    /// Why the habit was missed; only meaningful at level 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CompletionRecord {
    /// A record at `level`. Any reason is dropped unless the level is 0.
    pub fn completed(level: CompletionLevel) -> Self {
        Self {
            completion_level: level,
            reason: None,
        }
    }

    /// A level-0 record explaining the miss.
    pub fn missed(reason: impl Into<String>) -> Self {
        Self {
            completion_level: CompletionLevel::None,
            reason: Some(reason.into()),
        }
    }

    /// Numeric completion value.
    pub fn value(&self) -> f64 {
        self.completion_level.value()
    }
}

// ============================================
// Habit attributes
// ============================================

/// How hard the person considers the habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::Validation(format!("unknown difficulty: {other}"))),
        }
    }
}

/// Goal period of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(Error::Validation(format!("unknown frequency: {other}"))),
        }
    }
}

/// Whether a habit is a plain check-off or a timed activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    #[default]
    Standard,
    Timer,
}

/// Display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::Validation(format!("unknown priority: {other}"))),
        }
    }
}

/// Default habit color (a light blue).
pub const DEFAULT_COLOR: &str = "#64B5F6";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_times() -> u32 {
    1
}

// ============================================
// Habit
// ============================================

/// A tracked habit together with its completion history.
///
/// `current_streak` and `longest_streak` are cached results of
/// [`crate::analytics::calculate_streaks`]; the store recomputes them on
/// every completion change and never lets `longest_streak` shrink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier
    pub id: String,
    /// Human-friendly name
    pub name: String,
    /// When the habit was created
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub habit_type: HabitType,
    /// Session length in minutes for timer habits
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Whether fractional levels may be logged
    #[serde(default)]
    pub allow_partial: bool,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub frequency: Frequency,
    /// Goal count per frequency period
    #[serde(default = "default_times")]
    pub times: u32,

    #[serde(default)]
    pub completion_map: CompletionMap,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

impl Habit {
    /// Local calendar day the habit was created on.
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }

    /// Whether `day` counts for this habit (on or after its creation day).
    pub fn is_trackable_on(&self, day: NaiveDate) -> bool {
        day >= self.created_on()
    }

    /// Record for `day`, if one was logged.
    pub fn record_on(&self, day: NaiveDate) -> Option<&CompletionRecord> {
        self.completion_map.get(&day)
    }

    /// Completion value for `day`, treating a missing entry as 0.
    pub fn completion_on(&self, day: NaiveDate) -> f64 {
        self.record_on(day).map(CompletionRecord::value).unwrap_or(0.0)
    }

    /// Check settings and logged levels.
    ///
    /// Dates are not checked here since that needs a clock; the store does it.
    pub fn validate(&self) -> Result<()> {
        validate_settings(&self.name, self.times, self.habit_type, self.duration_minutes)?;
        if !self.allow_partial {
            if let Some((day, record)) = self
                .completion_map
                .iter()
                .find(|(_, record)| !record.completion_level.is_whole())
            {
                return Err(Error::Validation(format!(
                    "habit '{}' does not allow partial completion ({day} is {})",
                    self.name, record.completion_level
                )));
            }
        }
        Ok(())
    }
}

/// Rules shared by new and edited habits.
fn validate_settings(
    name: &str,
    times: u32,
    habit_type: HabitType,
    duration_minutes: Option<u32>,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("habit name must not be empty".to_string()));
    }
    if times == 0 {
        return Err(Error::Validation("times must be at least 1".to_string()));
    }
    if habit_type == HabitType::Timer && !matches!(duration_minutes, Some(d) if d > 0) {
        return Err(Error::Validation("timer habits need a positive duration".to_string()));
    }
    Ok(())
}

/// Fields a caller supplies when creating a habit.
///
/// Identity, creation time, history and streaks are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub habit_type: HabitType,
    #[serde(default, rename = "duration")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub allow_partial: bool,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_times")]
    pub times: u32,
}

impl NewHabit {
    /// A daily standard habit with default settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            habit_type: HabitType::default(),
            duration_minutes: None,
            allow_partial: false,
            color: default_color(),
            priority: Priority::default(),
            difficulty: Difficulty::default(),
            frequency: Frequency::default(),
            times: default_times(),
        }
    }

    /// Check the payload before it becomes a habit.
    pub fn validate(&self) -> Result<()> {
        validate_settings(&self.name, self.times, self.habit_type, self.duration_minutes)
    }

    /// Materialize into a [`Habit`] with an empty history.
    pub fn into_habit(self, id: String, created_at: DateTime<Utc>) -> Habit {
        Habit {
            id,
            name: self.name.trim().to_string(),
            created_at,
            habit_type: self.habit_type,
            duration_minutes: self.duration_minutes,
            allow_partial: self.allow_partial,
            color: self.color,
            priority: self.priority,
            difficulty: self.difficulty,
            frequency: self.frequency,
            times: self.times,
            completion_map: CompletionMap::new(),
            current_streak: 0,
            longest_streak: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_completion_level_conversion() {
        assert_eq!(CompletionLevel::try_from(0.5).unwrap(), CompletionLevel::Half);
        assert_eq!(CompletionLevel::try_from(1.0).unwrap(), CompletionLevel::Full);
        assert!(matches!(
            CompletionLevel::try_from(0.3),
            Err(Error::InvalidCompletionLevel(_))
        ));
        assert!(CompletionLevel::try_from(f64::NAN).is_err());
        assert_eq!(CompletionLevel::ThreeQuarters.to_string(), "75%");
    }

    #[test]
    fn test_habit_json_matches_storage_shape() {
        let json = r##"{
            "id": "h1",
            "name": "Read",
            "createdAt": "2024-10-01T08:30:00Z",
            "habitType": "timer",
            "duration": 20,
            "difficulty": "hard",
            "frequency": "weekly",
            "times": 3,
            "completionMap": {
                "2024-10-02": { "completionLevel": 1 },
                "2024-10-03": { "completionLevel": 0, "reason": "Busy" },
                "2024-10-04": { "completionLevel": 0.25 }
            },
            "currentStreak": 2,
            "longestStreak": 4
        }"##;

        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.habit_type, HabitType::Timer);
        assert_eq!(habit.duration_minutes, Some(20));
        assert_eq!(habit.difficulty, Difficulty::Hard);
        assert_eq!(habit.color, DEFAULT_COLOR);
        assert_eq!(habit.priority, Priority::Medium);

        let day = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
        let missed = habit.record_on(day).unwrap();
        assert_eq!(missed.completion_level, CompletionLevel::None);
        assert_eq!(missed.reason.as_deref(), Some("Busy"));
        assert_eq!(habit.completion_on(NaiveDate::from_ymd_opt(2024, 10, 4).unwrap()), 0.25);
        assert_eq!(habit.completion_on(NaiveDate::from_ymd_opt(2024, 10, 9).unwrap()), 0.0);

        let back = serde_json::to_value(&habit).unwrap();
        assert_eq!(back["completionMap"]["2024-10-02"]["completionLevel"], 1.0);
        assert!(back["completionMap"]["2024-10-02"].get("reason").is_none());
    }

    #[test]
    fn test_rejects_out_of_set_level_in_json() {
        let json = r#"{ "completionLevel": 0.6 }"#;
        assert!(serde_json::from_str::<CompletionRecord>(json).is_err());
    }

    #[test]
    fn test_trackable_uses_local_creation_day() {
        let created = Local.with_ymd_and_hms(2024, 10, 5, 23, 15, 0).unwrap();
        let habit = NewHabit::named("Walk").into_habit("h".into(), created.with_timezone(&Utc));

        assert!(!habit.is_trackable_on(NaiveDate::from_ymd_opt(2024, 10, 4).unwrap()));
        assert!(habit.is_trackable_on(NaiveDate::from_ymd_opt(2024, 10, 5).unwrap()));
        assert!(habit.is_trackable_on(NaiveDate::from_ymd_opt(2024, 10, 6).unwrap()));
    }

    #[test]
    fn test_new_habit_validation() {
        assert!(NewHabit::named("Stretch").validate().is_ok());
        assert!(NewHabit::named("   ").validate().is_err());

        let mut timer = NewHabit::named("Meditate");
        timer.habit_type = HabitType::Timer;
        assert!(timer.validate().is_err());
        timer.duration_minutes = Some(10);
        assert!(timer.validate().is_ok());

        let mut zero = NewHabit::named("Run");
        zero.times = 0;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_habit_validation_checks_levels() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
        let mut habit = NewHabit::named("Walk").into_habit("h1".into(), Utc::now());
        habit
            .completion_map
            .insert(day, CompletionRecord::completed(CompletionLevel::Full));
        assert!(habit.validate().is_ok());

        habit
            .completion_map
            .insert(day, CompletionRecord::completed(CompletionLevel::Half));
        assert!(matches!(habit.validate(), Err(Error::Validation(_))));
        habit.allow_partial = true;
        assert!(habit.validate().is_ok());

        habit.habit_type = HabitType::Timer;
        assert!(habit.validate().is_err());
        habit.duration_minutes = Some(0);
        assert!(habit.validate().is_err());
        habit.duration_minutes = Some(15);
        assert!(habit.validate().is_ok());
    }

    #[test]
    fn test_missed_and_completed_records() {
        let missed = CompletionRecord::missed("Tired");
        assert_eq!(missed.value(), 0.0);
        assert_eq!(missed.reason.as_deref(), Some("Tired"));

        let done = CompletionRecord::completed(CompletionLevel::Full);
        assert_eq!(done.value(), 1.0);
        assert!(done.reason.is_none());
    }
}

//! Streak calculation.
//!
//! A streak is a run of fully completed days (level 1). Partial levels never
//! count. Up to `recovery_days` missed days between two completions keep the
//! run alive; a longer gap closes it. The streak length is the number of
//! completed dates in the run, not the number of calendar days it spans.

use chrono::NaiveDate;
use serde::Serialize;

use super::policy::RECOVERY_DAYS_ALLOWED;
use crate::types::CompletionMap;

/// Current and longest streak of one habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Streak ending at the most recent completion, 0 if that completion is stale
    pub current_streak: u32,
    /// Longest streak anywhere in the history
    pub longest_streak: u32,
}

impl StreakSummary {
    /// Keep a previously stored longest streak if it was higher.
    ///
    /// Edits or truncated history can lower the recomputed value; the stored
    /// longest streak never regresses.
    pub fn merge_longest(self, previous_longest: u32) -> Self {
        Self {
            longest_streak: self.longest_streak.max(previous_longest),
            ..self
        }
    }
}

/// Calculate streaks with the default recovery allowance.
pub fn calculate_streaks(completion_map: &CompletionMap, today: NaiveDate) -> StreakSummary {
    calculate_streaks_with(completion_map, today, RECOVERY_DAYS_ALLOWED)
}

/// Calculate streaks tolerating up to `recovery_days` missed days between completions.
pub fn calculate_streaks_with(
    completion_map: &CompletionMap,
    today: NaiveDate,
    recovery_days: i64,
) -> StreakSummary {
    // BTreeMap keys are already in calendar order
    let completed: Vec<NaiveDate> = completion_map
        .iter()
        .filter(|(_, record)| record.completion_level.is_full())
        .map(|(date, _)| *date)
        .collect();

    let Some(&last_completed) = completed.last() else {
        return StreakSummary::default();
    };

    let continues = |earlier: NaiveDate, later: NaiveDate| {
        let gap = (later - earlier).num_days() - 1;
        gap <= recovery_days
    };

    let mut longest_streak = 0u32;
    let mut streak = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in &completed {
        streak = match previous {
            Some(prev) if continues(prev, date) => streak + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(streak);
        previous = Some(date);
    }

    if (today - last_completed).num_days() > recovery_days {
        tracing::trace!(%last_completed, %today, "streak is stale");
        return StreakSummary {
            current_streak: 0,
            longest_streak,
        };
    }

    // Walk back from the most recent completion until the first broken gap
    let mut current_streak = 1u32;
    for pair in completed.windows(2).rev() {
        if continues(pair[0], pair[1]) {
            current_streak += 1;
        } else {
            break;
        }
    }

    StreakSummary {
        current_streak,
        longest_streak,
    }
}

//! Tunable scoring constants.
//!
//! The defaults are product decisions rather than derived values. They can be
//! overridden under `[analytics]` in the config file.

use crate::error::{Error, Result};
use crate::types::Difficulty;
use serde::Deserialize;

/// Missed days tolerated between two completions without breaking a streak.
pub const RECOVERY_DAYS_ALLOWED: i64 = 1;

/// Constants used by the streak calculator and consistency scorer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyticsPolicy {
    /// Gap (in missed days) a streak survives
    #[serde(default = "default_recovery_days")]
    pub recovery_days_allowed: i64,

    /// Days looked back when computing the recent success rate
    #[serde(default = "default_lookback_days")]
    pub consistency_lookback_days: u32,

    /// Streak length that earns the full streak component
    #[serde(default = "default_streak_target_days")]
    pub streak_target_days: u32,

    /// Weight of the recent success rate in a habit's score
    #[serde(default = "default_success_rate_weight")]
    pub success_rate_weight: f64,

    /// Weight of the streak component in a habit's score
    #[serde(default = "default_streak_weight")]
    pub streak_weight: f64,

    #[serde(default = "default_easy_multiplier")]
    pub easy_multiplier: f64,

    #[serde(default = "default_medium_multiplier")]
    pub medium_multiplier: f64,

    #[serde(default = "default_hard_multiplier")]
    pub hard_multiplier: f64,
}

impl Default for AnalyticsPolicy {
    fn default() -> Self {
        Self {
            recovery_days_allowed: default_recovery_days(),
            consistency_lookback_days: default_lookback_days(),
            streak_target_days: default_streak_target_days(),
            success_rate_weight: default_success_rate_weight(),
            streak_weight: default_streak_weight(),
            easy_multiplier: default_easy_multiplier(),
            medium_multiplier: default_medium_multiplier(),
            hard_multiplier: default_hard_multiplier(),
        }
    }
}

fn default_recovery_days() -> i64 {
    RECOVERY_DAYS_ALLOWED
}

fn default_lookback_days() -> u32 {
    30
}

fn default_streak_target_days() -> u32 {
    30
}

fn default_success_rate_weight() -> f64 {
    0.7
}

fn default_streak_weight() -> f64 {
    0.3
}

fn default_easy_multiplier() -> f64 {
    0.9
}

fn default_medium_multiplier() -> f64 {
    1.0
}

fn default_hard_multiplier() -> f64 {
    1.1
}

impl AnalyticsPolicy {
    /// Score multiplier for a difficulty.
    pub fn difficulty_multiplier(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy_multiplier,
            Difficulty::Medium => self.medium_multiplier,
            Difficulty::Hard => self.hard_multiplier,
        }
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.recovery_days_allowed < 0 {
            return Err(Error::Config(
                "analytics.recovery_days_allowed must not be negative".to_string(),
            ));
        }
        if self.consistency_lookback_days == 0 {
            return Err(Error::Config(
                "analytics.consistency_lookback_days must be at least 1".to_string(),
            ));
        }
        if self.streak_target_days == 0 {
            return Err(Error::Config(
                "analytics.streak_target_days must be at least 1".to_string(),
            ));
        }
        let weights = [self.success_rate_weight, self.streak_weight];
        if weights.iter().any(|w| w.is_nan() || *w < 0.0) {
            return Err(Error::Config("analytics weights must not be negative".to_string()));
        }
        let multipliers = [
            self.easy_multiplier,
            self.medium_multiplier,
            self.hard_multiplier,
        ];
        if multipliers.iter().any(|m| m.is_nan() || *m <= 0.0) {
            return Err(Error::Config(
                "analytics difficulty multipliers must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

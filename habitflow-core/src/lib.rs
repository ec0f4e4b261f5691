//! # habitflow-core
//!
//! Core library for habitflow - a personal habit tracker.
//!
//! This library provides:
//! - Domain types for habits and their daily completion records
//! - The analytics engine: streaks, consistency score, period stats,
//!   heatmaps and the weekly report
//! - A habit store over a pluggable repository (JSON file or in-memory)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows in one direction:
//! - **Store:** the repository holds habits with their completion maps
//! - **Analytics:** pure functions read an immutable snapshot plus an explicit `today`
//! - **Reports:** structured results for dashboards and the summary generator
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitflow_core::analytics::{calculate_consistency_score, weekly_stats};
//! use habitflow_core::{Clock, Config, HabitStore, JsonFileRepository, SystemClock};
//!
//! let config = Config::load().expect("failed to load config");
//! let repo = JsonFileRepository::new(config.store.resolved_path());
//! let store = HabitStore::new(repo, SystemClock);
//!
//! let habits = store.habits().expect("failed to load habits");
//! let today = store.clock().today();
//! println!("score: {}", calculate_consistency_score(&habits, today));
//! println!("this week: {:?}", weekly_stats(&habits, today));
//! ```

// Re-export commonly used items at the crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use store::{HabitRepository, HabitStore, JsonFileRepository, MemoryRepository};
pub use types::*;

// Public modules
pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod store;
pub mod types;

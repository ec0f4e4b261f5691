//! habitflow - habit tracking from the terminal
//!
//! Records daily completions and prints streaks, consistency scores,
//! period stats, heatmaps and the weekly analytics report.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Habits: $XDG_DATA_HOME/habitflow/habits.json (~/.local/share/habitflow/habits.json)
//! - Config: $XDG_CONFIG_HOME/habitflow/config.toml (~/.config/habitflow/config.toml)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use habitflow_core::analytics::{
    generate_weekly_analytics_with, heatmap_data, monthly_chart_series, DashboardSummary, Month,
    PeriodStats,
};
use habitflow_core::format::{format_percent, format_relative_day_opt, short_month_day};
use habitflow_core::{
    Clock, CompletionLevel, Config, Difficulty, FixedClock, Frequency, Habit, HabitStore,
    HabitType, JsonFileRepository, NewHabit, Priority, SystemClock,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "habitflow")]
#[command(about = "Track habits, streaks and consistency")]
#[command(version)]
struct Args {
    /// Treat this day as today (format: YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Habit store file (default: from config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List habits with their streaks
    List,

    /// Create a habit
    Add {
        /// Habit name
        name: String,

        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,

        /// daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        frequency: Frequency,

        /// Goal count per period
        #[arg(long, default_value_t = 1)]
        times: u32,

        /// Allow partial completion levels
        #[arg(long)]
        partial: bool,

        /// Make this a timer habit of N minutes
        #[arg(long, value_name = "N")]
        timer_minutes: Option<u32>,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Display color (e.g., "#64B5F6")
        #[arg(long)]
        color: Option<String>,
    },

    /// Record a completion level (0, 0.25, 0.5, 0.75, 1 or a percentage)
    Log {
        /// Habit ID (unique prefix accepted)
        habit: String,

        #[arg(value_parser = parse_level)]
        level: CompletionLevel,

        /// Day to record (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record a missed day with a reason
    Miss {
        /// Habit ID (unique prefix accepted)
        habit: String,

        reason: String,

        /// Day to record (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete a habit and its history
    Delete {
        /// Habit ID (unique prefix accepted)
        habit: String,
    },

    /// Daily, weekly and monthly stats with the consistency score
    Stats {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Per-day completion intensity for a month
    Heatmap {
        /// Month (format: YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<Month>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Total completions per day for a month
    Chart {
        /// Month (format: YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<Month>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Weekly analytics report (JSON) for the summary generator
    Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Parse "0.5", "1" or "50%" into a completion level.
fn parse_level(s: &str) -> std::result::Result<CompletionLevel, String> {
    let value: f64 = match s.trim().strip_suffix('%') {
        Some(pct) => pct
            .trim()
            .parse::<f64>()
            .map(|p| p / 100.0)
            .map_err(|e| e.to_string())?,
        None => s.trim().parse().map_err(|e: std::num::ParseFloatError| e.to_string())?,
    };
    CompletionLevel::try_from(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        habitflow_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let store_path = args
        .store
        .clone()
        .unwrap_or_else(|| config.store.resolved_path());
    let repo = JsonFileRepository::new(store_path);

    match args.today {
        Some(day) => {
            let store = HabitStore::with_policy(repo, FixedClock::new(day), config.analytics);
            run(args.command, store)
        }
        None => {
            let store = HabitStore::with_policy(repo, SystemClock, config.analytics);
            run(args.command, store)
        }
    }
}

fn run<C: Clock>(command: Command, store: HabitStore<JsonFileRepository, C>) -> Result<()> {
    let today = store.clock().today();
    tracing::debug!(%today, ?command, "running command");

    match command {
        Command::List => {
            let habits = store.habits().context("failed to load habits")?;
            print_list(&habits, today);
        }
        Command::Add {
            name,
            difficulty,
            frequency,
            times,
            partial,
            timer_minutes,
            priority,
            color,
        } => {
            let mut new = NewHabit::named(name);
            new.difficulty = difficulty;
            new.frequency = frequency;
            new.times = times;
            new.allow_partial = partial;
            new.priority = priority;
            if let Some(minutes) = timer_minutes {
                new.habit_type = HabitType::Timer;
                new.duration_minutes = Some(minutes);
            }
            if let Some(color) = color {
                new.color = color;
            }

            let habit = store.add_habit(new).context("failed to add habit")?;
            println!("Added {} ({})", habit.name, habit.id);
        }
        Command::Log { habit, level, date } => {
            let id = store.resolve_id(&habit)?;
            let date = date.unwrap_or(today);
            let habit = store
                .set_completion(&id, date, level)
                .context("failed to record completion")?;
            println!(
                "{}: {} on {} (streak {}, best {})",
                habit.name, level, date, habit.current_streak, habit.longest_streak
            );
        }
        Command::Miss {
            habit,
            reason,
            date,
        } => {
            let id = store.resolve_id(&habit)?;
            let date = date.unwrap_or(today);
            let habit = store
                .log_missed_reason(&id, date, &reason)
                .context("failed to record miss")?;
            println!(
                "{}: missed on {} ({}) (streak {})",
                habit.name, date, reason, habit.current_streak
            );
        }
        Command::Delete { habit } => {
            let id = store.resolve_id(&habit)?;
            store.delete_habit(&id).context("failed to delete habit")?;
            println!("Deleted {}", id);
        }
        Command::Stats { format } => {
            let habits = store.habits().context("failed to load habits")?;
            let summary = DashboardSummary::compute(&habits, today, store.policy());
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                Format::Text => print_stats(&summary),
            }
        }
        Command::Heatmap { month, format } => {
            let habits = store.habits().context("failed to load habits")?;
            let month = month.unwrap_or_else(|| Month::containing(today));
            let heatmap = heatmap_data(&habits, month);
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&heatmap)?),
                Format::Text => {
                    println!("{}", month.display_name());
                    for (day, cell) in &heatmap {
                        let shade = if cell.total == 0 {
                            "·".to_string()
                        } else {
                            "█".repeat((cell.intensity / 20.0).ceil() as usize)
                        };
                        println!(
                            "   {:>7}  {:<5} {:>4}  ({}/{})",
                            short_month_day(*day),
                            shade,
                            format_percent(cell.intensity),
                            cell.completed,
                            cell.total
                        );
                    }
                }
            }
        }
        Command::Chart { month, format } => {
            let habits = store.habits().context("failed to load habits")?;
            let month = month.unwrap_or_else(|| Month::containing(today));
            let series = monthly_chart_series(&habits, month);
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&series)?),
                Format::Text => {
                    println!("{}", month.display_name());
                    for point in &series {
                        println!("   {:>7}  {}", point.label, point.completions);
                    }
                }
            }
        }
        Command::Report => {
            let habits = store.habits().context("failed to load habits")?;
            let report = generate_weekly_analytics_with(&habits, today, store.policy());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_list(habits: &[Habit], today: NaiveDate) {
    if habits.is_empty() {
        println!("No habits yet.");
        println!("Run 'habitflow add <name>' to create one.");
        return;
    }

    for habit in habits {
        let last_done = habit
            .completion_map
            .iter()
            .rev()
            .find(|(_, record)| record.completion_level.is_full())
            .map(|(day, _)| *day);
        let short_id: String = habit.id.chars().take(8).collect();
        println!(
            "{}  {:<24} {:<6} {:<7} streak {:>3}  best {:>3}  last {}",
            short_id,
            habit.name,
            habit.difficulty.as_str(),
            habit.frequency.as_str(),
            habit.current_streak,
            habit.longest_streak,
            format_relative_day_opt(last_done, today)
        );
    }
}

fn print_period(label: &str, stats: &PeriodStats) {
    println!(
        "   {:<10} {:>6.2} done  {:>6.2} pending  of {:<4} ({})",
        label,
        stats.completed,
        stats.pending,
        stats.total,
        format_percent(stats.completion_rate())
    );
}

fn print_stats(summary: &DashboardSummary) {
    println!("SUMMARY");
    println!(
        "   Habits: {:<8} Done today: {}",
        summary.habit_count, summary.completed_today
    );
    println!("   Consistency score: {}/100", summary.consistency_score);
    println!(
        "   Best current streak: {}   Longest ever: {}",
        DashboardSummary::format_streak(summary.best_current_streak),
        DashboardSummary::format_streak(summary.longest_streak)
    );
    println!();

    println!("PERIODS");
    print_period("Today", &summary.daily);
    print_period("Last 7d", &summary.weekly);
    print_period("Month", &summary.monthly);
}

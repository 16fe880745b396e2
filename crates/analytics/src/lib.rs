//! # Tradelog Analytics Engine
//!
//! Turns a trading journal into performance statistics: win rate, profit
//! factor, expectancy, tag breakdowns, a calendar grid, an equity curve and
//! Monte Carlo risk-of-ruin estimates.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O. Trades come in as `core_types::TradeRecord` values and
//!   a `StatisticsReport` goes out.
//! - **Stateless calculation:** the `AnalyticsEngine` keeps nothing between calls.
//!   Randomness is injected by the caller, so a seeded generator reproduces a
//!   report exactly.
//! - **Sparse data is normal:** empty journals, no losses or a single trade yield
//!   zeroed metrics, never errors. Errors are reserved for invalid settings.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: assembles the full report.
//! - `StatisticsReport`: the serializable result.
//! - `summarize`: quick statistics over a filtered journal.
//! - `AnalyticsError`: the error type of this crate.

// Declare the modules that constitute this crate.
pub mod calendar;
pub mod classifier;
pub mod engine;
pub mod equity;
pub mod error;
pub mod hourly;
pub mod insights;
pub mod kpi;
pub mod monte_carlo;
pub mod report;
pub mod rounding;
pub mod summary;
pub mod tags;

// Re-export the key components to create a clean, public-facing API.
pub use calendar::{CalendarMonth, CalendarPeriod, CalendarWeek, DayCell};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use insights::Insight;
pub use kpi::Kpis;
pub use monte_carlo::{DrawdownProbability, MonteCarloSimulator, RiskOfRuin};
pub use report::StatisticsReport;
pub use summary::{FilterSummary, TradeFilter, summarize};
pub use tags::{Dimension, SortOrder, TagStat};

use crate::calendar::{self, CalendarPeriod};
use crate::classifier;
use crate::equity;
use crate::error::AnalyticsError;
use crate::hourly;
use crate::insights;
use crate::kpi::{self, ReturnProfile};
use crate::monte_carlo::MonteCarloSimulator;
use crate::report::StatisticsReport;
use crate::tags::{Dimension, breakdown};
use configuration::{Config, ReportSettings};
use core_types::TradeRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A stateless calculator turning a trading journal into a `StatisticsReport`.
///
/// Holds only validated settings, so one engine can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    simulator: MonteCarloSimulator,
    report: ReportSettings,
}

impl AnalyticsEngine {
    /// Builds an engine, rejecting settings that indicate misuse.
    pub fn new(config: &Config) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self {
            simulator: MonteCarloSimulator::new(config.simulation.clone())?,
            report: config.report.clone(),
        })
    }

    /// The main entry point for calculating journal statistics.
    ///
    /// # Arguments
    ///
    /// * `trades` - The journal, in any order. Re-sorted internally where order matters.
    /// * `period` - The month shown in the calendar grid.
    /// * `rng` - Source of randomness for the Monte Carlo simulator. Two independent
    ///   generators are derived from it, one per simulation mode.
    pub fn calculate<R: Rng>(
        &self,
        trades: &[TradeRecord],
        period: CalendarPeriod,
        rng: &mut R,
    ) -> StatisticsReport {
        if trades.is_empty() {
            // Nothing to divide or simulate; every field keeps its zero value.
            tracing::info!("No trades supplied, returning an empty report.");
            return StatisticsReport::no_data();
        }

        let mut ruin_rng = StdRng::seed_from_u64(rng.next_u64());
        let mut paths_rng = StdRng::seed_from_u64(rng.next_u64());

        let classified = classifier::partition(trades);
        let active = &classified.active;
        let all: Vec<&TradeRecord> = trades.iter().collect();
        tracing::debug!(
            total = classified.total(),
            active = active.len(),
            "Journal classified."
        );

        let kpis = kpi::calculate(&classified);

        let emotion_table = breakdown(&all, Dimension::Emotion);
        let week_of_month_table = calendar::week_of_month_ranking(trades);
        let best_week = week_of_month_table.first().cloned();

        let mut equity = equity::build(active);
        equity.projection = equity::project(
            equity.final_value(),
            kpis.expectancy,
            self.report.projection_points,
        );

        let profile = ReturnProfile::from_active(active);
        let risk_of_ruin = self.simulator.risk_of_ruin(&profile, &mut ruin_rng);
        let simulated_paths = self.simulator.resample_paths(&profile, &mut paths_rng);

        let insights = insights::derive(&kpis, &emotion_table);

        let report = StatisticsReport {
            no_data: false,
            timeframe_table: breakdown(active, Dimension::Timeframe),
            alignment_table: breakdown(active, Dimension::Alignment),
            pros_table: breakdown(active, Dimension::Pros),
            cons_table: breakdown(active, Dimension::Cons),
            confluence_table: breakdown(active, Dimension::Confluence),
            asset_table: breakdown(active, Dimension::Asset),
            weekday_table: breakdown(active, Dimension::Weekday),
            direction_table: breakdown(active, Dimension::Direction),
            emotion_table,
            week_of_month_table,
            best_week,
            calendar: calendar::build_month(trades, period),
            hourly: hourly::distribution(active),
            equity,
            risk_of_ruin,
            simulated_paths,
            insights,
            kpis,
        };

        tracing::info!(
            total_trades = report.kpis.total_trades,
            total_active = report.kpis.total_active,
            win_rate = report.kpis.win_rate,
            net_result = report.kpis.net_result,
            simulated = report.risk_of_ruin.simulated,
            "Statistics report assembled."
        );

        report
    }
}

use crate::calendar::CalendarMonth;
use crate::equity::EquityCurve;
use crate::hourly::HourBucket;
use crate::insights::Insight;
use crate::kpi::Kpis;
use crate::monte_carlo::RiskOfRuin;
use crate::tags::TagStat;
use serde::{Deserialize, Serialize};

/// A complete statistics snapshot of a trading journal.
///
/// This struct is the final output of the `AnalyticsEngine` and the only thing
/// handed to the presentation layer. Tables are already ranked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Set when the journal was empty; every other field is then zero or empty.
    pub no_data: bool,

    // I. Scalar metrics
    pub kpis: Kpis,

    // II. Tag breakdowns, most frequent first
    pub timeframe_table: Vec<TagStat>,
    pub alignment_table: Vec<TagStat>,
    pub pros_table: Vec<TagStat>,
    pub cons_table: Vec<TagStat>,
    pub confluence_table: Vec<TagStat>,

    // III. Breakdowns, most profitable first
    pub asset_table: Vec<TagStat>,
    pub weekday_table: Vec<TagStat>,
    pub direction_table: Vec<TagStat>,
    pub emotion_table: Vec<TagStat>,
    pub week_of_month_table: Vec<TagStat>,
    pub best_week: Option<TagStat>,

    // IV. Calendar and time of day
    pub calendar: CalendarMonth,
    pub hourly: Vec<HourBucket>,

    // V. Equity and simulation
    pub equity: EquityCurve,
    pub risk_of_ruin: RiskOfRuin,
    pub simulated_paths: Vec<Vec<f64>>,

    // VI. Coaching
    pub insights: Vec<Insight>,
}

impl StatisticsReport {
    /// The report for an empty journal.
    pub fn no_data() -> Self {
        Self {
            no_data: true,
            ..Self::default()
        }
    }
}

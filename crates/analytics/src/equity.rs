use crate::rounding::round_to;
use chrono::NaiveDate;
use core_types::TradeRecord;
use serde::{Deserialize, Serialize};

/// Cumulative result of the active trades in date order, plus a linear
/// extrapolation of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquityCurve {
    pub dates: Vec<NaiveDate>,
    /// `dd/mm` chart labels, parallel to `dates`.
    pub labels: Vec<String>,
    /// Running sum of results, starting from 0 before the first trade.
    pub values: Vec<f64>,
    /// Points continuing `values` by the expectancy per trade.
    pub projection: Vec<f64>,
}

impl EquityCurve {
    /// The last cumulative value, or 0 for an empty curve.
    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

/// Builds the curve from active trades.
///
/// Trades are stably sorted by date, so same-day trades keep their input order.
pub fn build(active: &[&TradeRecord]) -> EquityCurve {
    let mut chronological: Vec<&TradeRecord> = active.to_vec();
    chronological.sort_by_key(|t| t.date);

    let mut curve = EquityCurve::default();
    let mut running = 0.0;
    for trade in chronological {
        running += trade.result();
        curve.dates.push(trade.date);
        curve.labels.push(trade.date.format("%d/%m").to_string());
        curve.values.push(round_to(running, 2));
    }
    curve
}

/// `points` values, each `expectancy` above the previous, starting after `last`.
pub fn project(last: f64, expectancy: f64, points: usize) -> Vec<f64> {
    (1..=points)
        .map(|step| round_to(last + expectancy * step as f64, 2))
        .collect()
}

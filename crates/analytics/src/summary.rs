use crate::calendar::CalendarPeriod;
use crate::rounding::{percentage, round_to};
use core_types::{Outcome, TradeRecord};
use serde::{Deserialize, Serialize};

/// Narrows a journal before summarizing it. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeFilter {
    pub pair: Option<String>,
    pub outcome: Option<Outcome>,
    pub period: Option<CalendarPeriod>,
}

impl TradeFilter {
    pub fn matches(&self, trade: &TradeRecord) -> bool {
        self.pair.as_deref().is_none_or(|pair| trade.pair == pair)
            && self.outcome.is_none_or(|outcome| trade.outcome == outcome)
            && self.period.is_none_or(|period| period.contains(trade.date))
    }
}

/// Quick statistics over a filtered journal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSummary {
    pub total: usize,
    /// Sum of results over every matching trade, active or not.
    pub net_profit: f64,
    /// Wins over active matches, 1 decimal.
    pub win_rate: f64,
    /// Mean of the positive risk/reward values recorded.
    pub avg_rr: f64,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
}

pub fn summarize(trades: &[TradeRecord], filter: &TradeFilter) -> FilterSummary {
    let matching: Vec<&TradeRecord> = trades.iter().filter(|t| filter.matches(t)).collect();
    if matching.is_empty() {
        return FilterSummary::default();
    }

    let active = matching.iter().filter(|t| t.is_active()).count();
    let count = |outcome: Outcome| matching.iter().filter(|t| t.outcome == outcome).count();
    let wins = count(Outcome::Target);

    let rrs: Vec<f64> = matching
        .iter()
        .filter_map(|t| t.rr_final)
        .filter(|rr| *rr > 0.0)
        .collect();
    let avg_rr = if rrs.is_empty() {
        0.0
    } else {
        rrs.iter().sum::<f64>() / rrs.len() as f64
    };

    FilterSummary {
        total: matching.len(),
        net_profit: round_to(matching.iter().map(|t| t.result()).sum(), 2),
        win_rate: percentage(wins, active, 1),
        avg_rr: round_to(avg_rr, 2),
        wins,
        losses: count(Outcome::StopLoss),
        breakevens: count(Outcome::Breakeven),
    }
}

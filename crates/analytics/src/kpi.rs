use crate::classifier::Classified;
use crate::rounding::{percentage, round_to};
use chrono::Datelike;
use core_types::{Outcome, TradeRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scalar performance metrics of a journal.
///
/// Every ratio falls back to 0 (or, for the profit factor, to the gross profit)
/// when its denominator is empty. Figures are rounded for presentation: rates
/// and money-like values to 2 decimals, weekly frequency to 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Kpis {
    // I. Counts
    pub total_trades: usize,
    pub total_active: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub num_non_filled: usize,
    pub num_setup: usize,
    pub unique_days: usize,

    // II. Profitability
    pub win_rate: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    /// `gross_profit - gross_loss`; breakeven results are left out.
    pub net_result: f64,
    /// Sum of every active result, breakevens included. The equity curve ends here.
    pub active_net_result: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    /// Signed, so a non-zero value is negative.
    pub avg_loss: f64,
    pub avg_rr_realized: f64,
    pub expectancy: f64,

    // III. Dispersion
    pub std_dev: f64,
    pub sharpe_ratio: f64,

    // IV. Frequency
    pub avg_weekly_trades: f64,
}

/// The unrounded return distribution of the active trades.
///
/// This is what the Monte Carlo simulator draws from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnProfile {
    /// Per-trade results in input order.
    pub returns: Vec<f64>,
    pub win_probability: f64,
    pub loss_probability: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub gross_loss: f64,
}

impl ReturnProfile {
    pub fn from_active(active: &[&TradeRecord]) -> Self {
        let returns: Vec<f64> = active.iter().map(|t| t.result()).collect();
        let wins: Vec<f64> = active.iter().filter(|t| t.is_win()).map(|t| t.result()).collect();
        let losses: Vec<f64> = active.iter().filter(|t| t.is_loss()).map(|t| t.result()).collect();

        let total = active.len();
        let (win_probability, loss_probability) = if total > 0 {
            (wins.len() as f64 / total as f64, losses.len() as f64 / total as f64)
        } else {
            (0.0, 0.0)
        };

        Self {
            returns,
            win_probability,
            loss_probability,
            avg_win: mean(&wins),
            avg_loss: mean(&losses),
            gross_loss: losses.iter().sum::<f64>().abs(),
        }
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Expected result per trade from the win/loss rates and magnitudes.
    pub fn expectancy(&self) -> f64 {
        self.win_probability * self.avg_win - self.loss_probability * self.avg_loss.abs()
    }
}

/// Computes the scalar metrics for a classified journal.
pub fn calculate(classified: &Classified<'_>) -> Kpis {
    let active = &classified.active;
    let profile = ReturnProfile::from_active(active);

    let total_trades = classified.total();
    let total_active = active.len();
    let wins = active.iter().filter(|t| t.is_win()).count();
    let losses = active.iter().filter(|t| t.is_loss()).count();
    let breakevens = total_active - wins - losses;

    let gross_profit: f64 = active.iter().filter(|t| t.is_win()).map(|t| t.result()).sum();
    let gross_loss = profile.gross_loss;
    let net_result = gross_profit - gross_loss;
    let active_net_result: f64 = profile.returns.iter().sum();

    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else {
        gross_profit
    };

    let avg_rr_realized = if profile.avg_loss != 0.0 {
        profile.avg_win / profile.avg_loss.abs()
    } else {
        0.0
    };

    let std_dev = sample_std_dev(&profile.returns);
    let sharpe_ratio = if std_dev > 0.0 {
        mean(&profile.returns) / std_dev
    } else {
        0.0
    };

    let all = || classified.active.iter().chain(classified.inactive.iter());
    let count_outcome = |outcome: Outcome| all().filter(|t| t.outcome == outcome).count();
    let unique_days = all().map(|t| t.date).collect::<HashSet<_>>().len();
    let iso_weeks = all()
        .map(|t| {
            let week = t.date.iso_week();
            (week.year(), week.week())
        })
        .collect::<HashSet<_>>()
        .len();

    Kpis {
        total_trades,
        total_active,
        wins,
        losses,
        breakevens,
        num_non_filled: count_outcome(Outcome::NotFilled),
        num_setup: count_outcome(Outcome::Setup),
        unique_days,
        win_rate: percentage(wins, total_active, 2),
        gross_profit: round_to(gross_profit, 2),
        gross_loss: round_to(gross_loss, 2),
        net_result: round_to(net_result, 2),
        active_net_result: round_to(active_net_result, 2),
        profit_factor: round_to(profit_factor, 2),
        avg_win: round_to(profile.avg_win, 2),
        avg_loss: round_to(profile.avg_loss, 2),
        avg_rr_realized: round_to(avg_rr_realized, 2),
        expectancy: round_to(profile.expectancy(), 2),
        std_dev: round_to(std_dev, 2),
        sharpe_ratio: round_to(sharpe_ratio, 2),
        avg_weekly_trades: round_to(total_trades as f64 / iso_weeks.max(1) as f64, 1),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (n - 1) standard deviation; 0 for fewer than two values.
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

use crate::kpi::Kpis;
use crate::tags::TagStat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this win rate the trader is told to be more selective.
pub const LOW_WIN_RATE: f64 = 40.0;
/// Above this win rate the trader's direction calls are praised.
pub const HIGH_WIN_RATE: f64 = 60.0;
/// An average loss worse than this is flagged as oversized.
pub const OVERSIZED_AVG_LOSS: f64 = -1.5;

/// A rule-based coaching remark derived from the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Insight {
    LowWinRate { win_rate: f64 },
    HighWinRate { win_rate: f64 },
    LosingProfitFactor { profit_factor: f64 },
    OversizedStops { avg_loss: f64 },
    CostlyEmotion { emotion: String, net_result: f64 },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::LowWinRate { win_rate } => {
                write!(f, "Win rate ({win_rate}%) is low. Be more selective with entries.")
            }
            Insight::HighWinRate { win_rate } => {
                write!(f, "Strong win rate ({win_rate}%). Your directional read is working.")
            }
            Insight::LosingProfitFactor { profit_factor } => write!(
                f,
                "Profit factor {profit_factor} is below 1: the journal is losing money. Cut losses sooner."
            ),
            Insight::OversizedStops { avg_loss } => {
                write!(f, "Average stop is too large ({avg_loss}%). Reduce risk per trade.")
            }
            Insight::CostlyEmotion { emotion, net_result } => write!(
                f,
                "Trades taken feeling '{emotion}' net {net_result}%. Watch your psychology."
            ),
        }
    }
}

/// Derives coaching remarks from the metrics and the emotion breakdown.
///
/// `emotions` is expected ranked by net result, most profitable first.
pub fn derive(kpis: &Kpis, emotions: &[TagStat]) -> Vec<Insight> {
    let mut insights = Vec::new();

    if kpis.win_rate < LOW_WIN_RATE {
        insights.push(Insight::LowWinRate { win_rate: kpis.win_rate });
    } else if kpis.win_rate > HIGH_WIN_RATE {
        insights.push(Insight::HighWinRate { win_rate: kpis.win_rate });
    }
    if kpis.profit_factor < 1.0 {
        insights.push(Insight::LosingProfitFactor { profit_factor: kpis.profit_factor });
    }
    if kpis.avg_loss < OVERSIZED_AVG_LOSS {
        insights.push(Insight::OversizedStops { avg_loss: kpis.avg_loss });
    }
    if let Some(worst) = emotions.last().filter(|e| e.net_result < 0.0) {
        insights.push(Insight::CostlyEmotion {
            emotion: worst.name.clone(),
            net_result: worst.net_result,
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_a_struggling_journal() {
        let kpis = Kpis { win_rate: 30.0, profit_factor: 0.6, avg_loss: -2.0, ..Default::default() };
        let emotions = vec![
            TagStat { name: "Calm".into(), net_result: 3.0, ..Default::default() },
            TagStat { name: "FOMO".into(), net_result: -4.5, ..Default::default() },
        ];
        let insights = derive(&kpis, &emotions);
        assert_eq!(
            insights,
            vec![
                Insight::LowWinRate { win_rate: 30.0 },
                Insight::LosingProfitFactor { profit_factor: 0.6 },
                Insight::OversizedStops { avg_loss: -2.0 },
                Insight::CostlyEmotion { emotion: "FOMO".into(), net_result: -4.5 },
            ]
        );
        assert!(insights[3].to_string().contains("FOMO"));
    }

    #[test]
    fn praises_a_healthy_journal() {
        let kpis = Kpis { win_rate: 65.0, profit_factor: 2.1, avg_loss: -1.0, ..Default::default() };
        let emotions = vec![TagStat { name: "Calm".into(), net_result: 3.0, ..Default::default() }];
        assert_eq!(derive(&kpis, &emotions), vec![Insight::HighWinRate { win_rate: 65.0 }]);
    }
}

use core_types::{Outcome, TradeRecord};
use serde::{Deserialize, Serialize};

/// Resolved trades entered during one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub targets: usize,
    pub stops: usize,
    pub breakevens: usize,
}

impl HourBucket {
    /// `HH:00` chart label.
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    pub fn total(&self) -> usize {
        self.targets + self.stops + self.breakevens
    }
}

/// Distributes active trades over the 24 hours of the day.
///
/// Trades without a time are left out silently; trades whose time does not parse
/// are left out with a warning.
pub fn distribution(active: &[&TradeRecord]) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (0..24).map(|hour| HourBucket { hour, ..Default::default() }).collect();

    for trade in active {
        let Some(raw) = trade.time.as_deref() else {
            continue;
        };
        let Some(hour) = trade.hour() else {
            tracing::warn!(date = %trade.date, pair = %trade.pair, time = raw, "Unparsable trade time skipped.");
            continue;
        };
        let bucket = &mut buckets[hour as usize];
        match trade.outcome {
            Outcome::Target => bucket.targets += 1,
            Outcome::StopLoss => bucket.stops += 1,
            Outcome::Breakeven => bucket.breakevens += 1,
            Outcome::NotFilled | Outcome::Setup => {}
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade(outcome: Outcome, time: Option<&str>) -> TradeRecord {
        let t = TradeRecord::new(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), "EURUSD", outcome);
        match time {
            Some(time) => t.with_time(time),
            None => t,
        }
    }

    #[test]
    fn buckets_by_hour_and_skips_bad_times() {
        let trades = vec![
            trade(Outcome::Target, Some("09:15")),
            trade(Outcome::StopLoss, Some("09:45")),
            trade(Outcome::Breakeven, Some("14:00")),
            trade(Outcome::Target, Some("9h")),
            trade(Outcome::Target, None),
        ];
        let refs: Vec<&TradeRecord> = trades.iter().collect();
        let hours = distribution(&refs);

        assert_eq!(hours.len(), 24);
        assert_eq!((hours[9].targets, hours[9].stops), (1, 1));
        assert_eq!(hours[14].breakevens, 1);
        assert_eq!(hours[14].label(), "14:00");
        assert_eq!(hours.iter().map(HourBucket::total).sum::<usize>(), 3);
    }
}

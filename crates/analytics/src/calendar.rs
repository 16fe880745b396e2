use crate::error::AnalyticsError;
use crate::tags::{Dimension, TagStat, breakdown};
use chrono::{Datelike, NaiveDate};
use core_types::TradeRecord;
use serde::{Deserialize, Serialize};

/// A calendar month, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPeriod {
    year: i32,
    month: u32,
}

impl CalendarPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, AnalyticsError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or(AnalyticsError::InvalidPeriod { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in the month.
    pub fn days(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .map(|d| d.day())
            // Only reachable for the last representable month.
            .unwrap_or(31)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayCell {
    pub day: u32,
    pub net_result: f64,
    pub trade_count: usize,
}

/// One Sunday-to-Saturday row of the month grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalendarWeek {
    /// Seven slots, Sunday first; `None` outside the month.
    pub days: Vec<Option<DayCell>>,
    pub week_pl: f64,
    pub week_trade_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<CalendarWeek>,
    pub month_pl: f64,
    pub month_trade_count: usize,
}

impl CalendarMonth {
    /// The non-empty day cells in date order.
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|w| w.days.iter().flatten())
    }
}

/// Buckets every trade dated inside `period` into its day cell.
///
/// Active and inactive trades are both counted; dates are taken as already
/// normalized to the trader's calendar. Sums are left unrounded so that day
/// cells, week rows and the month total stay additive.
pub fn build_month(trades: &[TradeRecord], period: CalendarPeriod) -> CalendarMonth {
    let days_in_month = period.days() as usize;
    let mut sums = vec![0.0_f64; days_in_month];
    let mut counts = vec![0_usize; days_in_month];

    for trade in trades.iter().filter(|t| period.contains(t.date)) {
        let idx = trade.date.day0() as usize;
        sums[idx] += trade.result();
        counts[idx] += 1;
    }

    let leading_blanks = period
        .first_day()
        .map(|d| d.weekday().num_days_from_sunday() as usize)
        .unwrap_or(0);

    let mut slots: Vec<Option<DayCell>> = vec![None; leading_blanks];
    slots.extend((0..days_in_month).map(|idx| {
        Some(DayCell {
            day: idx as u32 + 1,
            net_result: sums[idx],
            trade_count: counts[idx],
        })
    }));
    while slots.len() % 7 != 0 {
        slots.push(None);
    }

    let weeks: Vec<CalendarWeek> = slots
        .chunks(7)
        .map(|row| {
            let cells = row.iter().flatten();
            CalendarWeek {
                week_pl: cells.clone().map(|c| c.net_result).sum(),
                week_trade_count: cells.map(|c| c.trade_count).sum(),
                days: row.to_vec(),
            }
        })
        .collect();

    let month_pl = sums.iter().sum();
    let month_trade_count = weeks.iter().map(|w| w.week_trade_count).sum();

    tracing::debug!(
        year = period.year(),
        month = period.month(),
        month_trade_count,
        "Calendar month built."
    );

    CalendarMonth {
        year: period.year(),
        month: period.month(),
        weeks,
        month_pl,
        month_trade_count,
    }
}

/// Ranks week-of-month buckets over the whole journal, most profitable first.
pub fn week_of_month_ranking(trades: &[TradeRecord]) -> Vec<TagStat> {
    let refs: Vec<&TradeRecord> = trades.iter().collect();
    breakdown(&refs, Dimension::WeekOfMonth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Outcome;

    fn trade(y: i32, m: u32, d: u32, outcome: Outcome, result: f64) -> TradeRecord {
        TradeRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), "EURUSD", outcome)
            .with_result(result)
    }

    #[test]
    fn rejects_invalid_period() {
        assert!(CalendarPeriod::new(2024, 13).is_err());
        assert!(CalendarPeriod::new(2024, 0).is_err());
        assert!(CalendarPeriod::new(2024, 2).is_ok());
    }

    #[test]
    fn month_lengths() {
        assert_eq!(CalendarPeriod::new(2024, 2).unwrap().days(), 29);
        assert_eq!(CalendarPeriod::new(2023, 2).unwrap().days(), 28);
        assert_eq!(CalendarPeriod::new(2024, 12).unwrap().days(), 31);
        assert_eq!(CalendarPeriod::new(2024, 4).unwrap().days(), 30);
    }

    #[test]
    fn grid_starts_on_sunday() {
        // 1 September 2024 is a Sunday, 1 May 2024 a Wednesday.
        let sept = build_month(&[], CalendarPeriod::new(2024, 9).unwrap());
        assert_eq!(sept.weeks[0].days[0].as_ref().map(|c| c.day), Some(1));
        assert_eq!(sept.weeks.len(), 5);

        let may = build_month(&[], CalendarPeriod::new(2024, 5).unwrap());
        assert!(may.weeks[0].days[..3].iter().all(Option::is_none));
        assert_eq!(may.weeks[0].days[3].as_ref().map(|c| c.day), Some(1));
        assert!(may.weeks.iter().all(|w| w.days.len() == 7));
        assert_eq!(may.cells().count(), 31);
    }

    #[test]
    fn day_cells_sum_to_month_total() {
        let trades = vec![
            trade(2024, 5, 1, Outcome::Target, 2.5),
            trade(2024, 5, 1, Outcome::StopLoss, -1.0),
            trade(2024, 5, 14, Outcome::NotFilled, 0.0),
            trade(2024, 5, 31, Outcome::Target, 1.25),
            trade(2024, 6, 1, Outcome::Target, 9.0),
            trade(2023, 5, 1, Outcome::Target, 9.0),
        ];
        let period = CalendarPeriod::new(2024, 5).unwrap();
        let month = build_month(&trades, period);

        let direct: f64 = trades
            .iter()
            .filter(|t| period.contains(t.date))
            .map(|t| t.result())
            .sum();
        let cells: f64 = month.cells().map(|c| c.net_result).sum();
        assert!((cells - direct).abs() < 1e-9);
        assert!((month.month_pl - 2.75).abs() < 1e-9);
        assert_eq!(month.month_trade_count, 4);
        assert_eq!(month.cells().map(|c| c.trade_count).sum::<usize>(), 4);

        let first = month.cells().next().unwrap();
        assert_eq!((first.day, first.trade_count), (1, 2));
        assert!((first.net_result - 1.5).abs() < 1e-9);

        let week_sum: f64 = month.weeks.iter().map(|w| w.week_pl).sum();
        assert!((week_sum - month.month_pl).abs() < 1e-9);
    }

    #[test]
    fn fractional_results_do_not_drift() {
        let trades: Vec<TradeRecord> =
            (1..=4).map(|d| trade(2024, 5, d, Outcome::Target, 0.125)).collect();
        let period = CalendarPeriod::new(2024, 5).unwrap();
        let month = build_month(&trades, period);

        let direct: f64 = trades.iter().map(|t| t.result()).sum();
        assert!((month.month_pl - direct).abs() < 1e-9, "{} vs {direct}", month.month_pl);
        let cells: f64 = month.cells().map(|c| c.net_result).sum();
        assert!((cells - direct).abs() < 1e-9);
        assert!((month.weeks[0].week_pl - 0.5).abs() < 1e-9);
    }

    #[test]
    fn week_of_month_ranking_covers_all_months() {
        let trades = vec![
            trade(2024, 1, 3, Outcome::Target, 1.0),
            trade(2024, 2, 5, Outcome::StopLoss, -1.0),
            trade(2024, 3, 30, Outcome::Target, 3.0),
            trade(2024, 4, 10, Outcome::Setup, 0.0),
        ];
        let ranking = week_of_month_ranking(&trades);
        assert_eq!(ranking[0].name, "Week 5");
        assert_eq!(ranking[0].win_rate, 100.0);
        let week1 = ranking.iter().find(|s| s.name == "Week 1").unwrap();
        assert_eq!(week1.total, 2);
        assert_eq!(week1.net_result, 0.0);
        assert_eq!(week1.win_rate, 50.0);
        assert_eq!(ranking.last().unwrap().name, "Week 2");
    }
}

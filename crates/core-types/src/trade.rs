use crate::enums::{Direction, Outcome};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// One journaled trade, as supplied by the storage layer.
///
/// The analytics engine only ever reads these. Multi-valued attributes
/// (timeframes, trend alignment, pros, cons) are explicit ordered lists; any
/// joining or splitting of them belongs to the persistence adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    /// Clock time as entered by the trader, expected as "HH:MM".
    #[serde(default)]
    pub time: Option<String>,
    pub pair: String,
    #[serde(default)]
    pub direction: Option<Direction>,
    pub outcome: Outcome,
    #[serde(default)]
    pub result_percent: Option<f64>,
    #[serde(default)]
    pub rr_final: Option<f64>,
    #[serde(default)]
    pub risk_percent: Option<f64>,
    #[serde(default)]
    pub pips_tp: Option<f64>,
    #[serde(default)]
    pub pips_sl: Option<f64>,
    /// Entry timeframe tags.
    #[serde(default)]
    pub timeframe: Vec<String>,
    /// Trend-alignment tags.
    #[serde(default)]
    pub alignment: Vec<String>,
    /// Confluences observed on the trade.
    #[serde(default)]
    pub selected_pros: Vec<String>,
    /// Risk factors observed on the trade.
    #[serde(default)]
    pub selected_cons: Vec<String>,
    #[serde(default)]
    pub emotions: Option<String>,
}

impl TradeRecord {
    /// Creates a record with the required fields; everything else starts empty.
    pub fn new(date: NaiveDate, pair: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            date,
            time: None,
            pair: pair.into(),
            direction: None,
            outcome,
            result_percent: None,
            rr_final: None,
            risk_percent: None,
            pips_tp: None,
            pips_sl: None,
            timeframe: Vec::new(),
            alignment: Vec::new(),
            selected_pros: Vec::new(),
            selected_cons: Vec::new(),
            emotions: None,
        }
    }

    pub fn with_result(mut self, result_percent: f64) -> Self {
        self.result_percent = Some(result_percent);
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_rr(mut self, rr_final: f64) -> Self {
        self.rr_final = Some(rr_final);
        self
    }

    pub fn with_timeframes<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timeframe = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alignment<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alignment = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pros<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_pros = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cons<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_cons = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotions = Some(emotion.into());
        self
    }

    /// The signed result in percent, 0 when it was never recorded.
    pub fn result(&self) -> f64 {
        self.result_percent.unwrap_or(0.0)
    }

    pub fn is_active(&self) -> bool {
        self.outcome.is_active()
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Target
    }

    pub fn is_loss(&self) -> bool {
        self.outcome == Outcome::StopLoss
    }

    /// The hour of day the trade was taken, if `time` parses as a clock time.
    pub fn hour(&self) -> Option<u32> {
        let raw = self.time.as_deref()?.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
            .map(|t| t.hour())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn missing_numbers_default_to_zero() {
        let trade = TradeRecord::new(day(), "EURUSD", Outcome::Target);
        assert_eq!(trade.result(), 0.0);
        assert_eq!(trade.rr_final, None);
        assert!(trade.is_win());
        assert!(!trade.is_loss());
    }

    #[test]
    fn hour_parsing_tolerates_bad_input() {
        let base = TradeRecord::new(day(), "EURUSD", Outcome::Target);
        assert_eq!(base.clone().with_time("09:30").hour(), Some(9));
        assert_eq!(base.clone().with_time("23:05:10").hour(), Some(23));
        assert_eq!(base.clone().with_time("25:00").hour(), None);
        assert_eq!(base.clone().with_time("morning").hour(), None);
        assert_eq!(base.hour(), None);
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let json = r#"{"date":"2024-03-04","pair":"GBPUSD","outcome":"Stop Loss","result_percent":-1.0}"#;
        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(trade.outcome, Outcome::StopLoss);
        assert_eq!(trade.result(), -1.0);
        assert!(trade.timeframe.is_empty());
        assert!(trade.direction.is_none());
    }
}

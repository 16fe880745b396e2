//! Grouping of trades by a recurring attribute ("tag") and ranking of the groups.
//!
//! One routine, [`aggregate`], backs every breakdown in the report. A
//! [`Dimension`] supplies the tag extraction and the ranking rule for each of
//! them.

use crate::classifier::{TagField, tag_pairs, tags};
use crate::rounding::{percentage, round_to};
use chrono::{Datelike, Weekday};
use core_types::{Outcome, TradeRecord};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Win/loss record of the trades carrying one tag value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TagStat {
    pub name: String,
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    /// Percentage of `total` that hit target, 1 decimal.
    pub win_rate: f64,
    /// Sum of results, 2 decimals.
    pub net_result: f64,
}

/// How a breakdown is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most frequent first; surfaces the most common setups.
    ByTotal,
    /// Most profitable first; surfaces the best performers.
    ByNetResult,
}

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    wins: usize,
    losses: usize,
    breakevens: usize,
    net_result: f64,
}

/// Groups `trades` by the tags `extract` yields and ranks the groups.
///
/// A trade is credited once to every distinct tag it carries, so per-tag totals
/// of a multi-valued attribute can add up to more than `trades.len()`. Groups
/// with equal sort keys keep first-seen order.
pub fn aggregate<'a, F, I>(trades: &[&'a TradeRecord], extract: F, order: SortOrder) -> Vec<TagStat>
where
    F: Fn(&'a TradeRecord) -> I,
    I: IntoIterator<Item = Cow<'a, str>>,
{
    let pairs = trades
        .iter()
        .flat_map(|&trade| extract(trade).into_iter().map(move |tag| (trade, tag)));
    tally_pairs(pairs, order)
}

/// Ranks `(trade, tag)` pairs. Pairs of one trade must be adjacent; a tag
/// repeated within them counts once.
pub fn tally_pairs<'a, P>(pairs: P, order: SortOrder) -> Vec<TagStat>
where
    P: IntoIterator<Item = (&'a TradeRecord, Cow<'a, str>)>,
{
    let mut index: HashMap<Cow<'a, str>, usize> = HashMap::new();
    let mut groups: Vec<(Cow<'a, str>, Tally)> = Vec::new();
    let mut current: Option<&TradeRecord> = None;
    let mut seen: Vec<usize> = Vec::new();

    for (trade, tag) in pairs {
        if !current.is_some_and(|c| std::ptr::eq(c, trade)) {
            current = Some(trade);
            seen.clear();
        }

        let slot = match index.get(&tag) {
            Some(&slot) => slot,
            None => {
                groups.push((tag.clone(), Tally::default()));
                index.insert(tag, groups.len() - 1);
                groups.len() - 1
            }
        };
        if seen.contains(&slot) {
            continue;
        }
        seen.push(slot);

        let tally = &mut groups[slot].1;
        tally.total += 1;
        tally.net_result += trade.result();
        match trade.outcome {
            Outcome::Target => tally.wins += 1,
            Outcome::StopLoss => tally.losses += 1,
            Outcome::Breakeven => tally.breakevens += 1,
            Outcome::NotFilled | Outcome::Setup => {}
        }
    }

    let mut stats: Vec<TagStat> = groups
        .into_iter()
        .map(|(name, tally)| TagStat {
            name: name.into_owned(),
            total: tally.total,
            wins: tally.wins,
            losses: tally.losses,
            breakevens: tally.breakevens,
            win_rate: percentage(tally.wins, tally.total, 1),
            net_result: round_to(tally.net_result, 2),
        })
        .collect();

    match order {
        SortOrder::ByTotal => stats.sort_by(|a, b| b.total.cmp(&a.total)),
        SortOrder::ByNetResult => stats.sort_by(|a, b| b.net_result.total_cmp(&a.net_result)),
    }
    stats
}

/// The attributes the report breaks trades down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Timeframe,
    Alignment,
    Pros,
    Cons,
    /// Pros and cons together.
    Confluence,
    Asset,
    Weekday,
    WeekOfMonth,
    Emotion,
    Direction,
}

impl Dimension {
    pub fn sort_order(self) -> SortOrder {
        match self {
            Dimension::Timeframe
            | Dimension::Alignment
            | Dimension::Pros
            | Dimension::Cons
            | Dimension::Confluence => SortOrder::ByTotal,
            Dimension::Asset
            | Dimension::Weekday
            | Dimension::WeekOfMonth
            | Dimension::Emotion
            | Dimension::Direction => SortOrder::ByNetResult,
        }
    }

    /// The single tag field backing this dimension, if any.
    pub fn tag_field(self) -> Option<TagField> {
        match self {
            Dimension::Timeframe => Some(TagField::Timeframe),
            Dimension::Alignment => Some(TagField::Alignment),
            Dimension::Pros => Some(TagField::Pros),
            Dimension::Cons => Some(TagField::Cons),
            _ => None,
        }
    }

    pub fn extract(self, trade: &TradeRecord) -> Vec<Cow<'_, str>> {
        let field_tags = |field: TagField| tags(trade, field).map(Cow::Borrowed);
        match self {
            Dimension::Timeframe => field_tags(TagField::Timeframe).collect(),
            Dimension::Alignment => field_tags(TagField::Alignment).collect(),
            Dimension::Pros => field_tags(TagField::Pros).collect(),
            Dimension::Cons => field_tags(TagField::Cons).collect(),
            Dimension::Confluence => field_tags(TagField::Pros)
                .chain(field_tags(TagField::Cons))
                .collect(),
            Dimension::Asset => vec![Cow::Borrowed(trade.pair.trim())],
            Dimension::Weekday => vec![Cow::Borrowed(weekday_name(trade.date.weekday()))],
            Dimension::WeekOfMonth => {
                vec![Cow::Owned(format!("Week {}", week_of_month(trade.date.day())))]
            }
            Dimension::Emotion => {
                let emotion = trade.emotions.as_deref().map(str::trim).unwrap_or("");
                if emotion.is_empty() {
                    vec![Cow::Borrowed("None")]
                } else {
                    vec![Cow::Borrowed(emotion)]
                }
            }
            Dimension::Direction => trade
                .direction
                .map(|d| Cow::Borrowed(d.label()))
                .into_iter()
                .collect(),
        }
    }
}

/// Ranks `trades` along `dimension`.
///
/// Tag-field dimensions go through the classifier's `(trade, tag)` pairs; the
/// rest through [`aggregate`] with the dimension's extractor.
pub fn breakdown(trades: &[&TradeRecord], dimension: Dimension) -> Vec<TagStat> {
    let order = dimension.sort_order();
    match dimension.tag_field() {
        Some(field) => tally_pairs(
            tag_pairs(trades, field)
                .into_iter()
                .map(|(trade, tag)| (trade, Cow::Borrowed(tag))),
            order,
        ),
        None => aggregate(trades, |t| dimension.extract(t), order),
    }
}

/// 1-based week of the month, days 29 and later folded into week 5.
pub fn week_of_month(day_of_month: u32) -> u32 {
    (day_of_month.saturating_sub(1) / 7 + 1).min(5)
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Direction;

    fn trade(day: u32, pair: &str, outcome: Outcome, result: f64) -> TradeRecord {
        TradeRecord::new(NaiveDate::from_ymd_opt(2024, 4, day).unwrap(), pair, outcome)
            .with_result(result)
    }

    #[test]
    fn multi_tag_trade_counts_once_per_tag() {
        let a = trade(1, "EURUSD", Outcome::Target, 2.0).with_timeframes(["H1", "M15"]);
        let b = trade(2, "EURUSD", Outcome::StopLoss, -1.0).with_timeframes(["H1"]);
        let c = trade(3, "EURUSD", Outcome::Breakeven, 0.0).with_timeframes(["H1", " H1 "]);
        let refs = vec![&a, &b, &c];

        let table = breakdown(&refs, Dimension::Timeframe);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].name, "H1");
        assert_eq!(table[0].total, 3);
        assert_eq!(
            (table[0].wins, table[0].losses, table[0].breakevens),
            (1, 1, 1)
        );
        assert_eq!(table[0].win_rate, 33.3);
        assert_eq!(table[0].net_result, 1.0);
        assert_eq!(table[1].name, "M15");
        assert_eq!(table[1].win_rate, 100.0);

        let summed: usize = table.iter().map(|s| s.total).sum();
        assert!(summed > refs.len());
    }

    #[test]
    fn single_valued_dimension_totals_match_trade_count() {
        let trades = vec![
            trade(1, "EURUSD", Outcome::Target, 1.0),
            trade(2, "GBPUSD", Outcome::Target, 3.0),
            trade(3, "EURUSD", Outcome::StopLoss, -1.0),
            trade(4, "XAUUSD", Outcome::StopLoss, -2.0),
        ];
        let refs: Vec<&TradeRecord> = trades.iter().collect();
        let table = breakdown(&refs, Dimension::Asset);

        let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["GBPUSD", "EURUSD", "XAUUSD"]);
        assert_eq!(table.iter().map(|s| s.total).sum::<usize>(), refs.len());
    }

    #[test]
    fn frequency_ranking_differs_from_profit_ranking() {
        let a = trade(1, "EURUSD", Outcome::StopLoss, -1.0).with_pros(["Trendline"]);
        let b = trade(2, "EURUSD", Outcome::StopLoss, -1.0).with_pros(["Trendline"]);
        let c = trade(3, "EURUSD", Outcome::Target, 5.0).with_pros(["Support"]);
        let refs = vec![&a, &b, &c];

        let by_total = aggregate(&refs, |t| Dimension::Pros.extract(t), SortOrder::ByTotal);
        assert_eq!(by_total[0].name, "Trendline");
        let by_result = aggregate(&refs, |t| Dimension::Pros.extract(t), SortOrder::ByNetResult);
        assert_eq!(by_result[0].name, "Support");
    }

    #[test]
    fn confluence_merges_pros_and_cons() {
        let a = trade(1, "EURUSD", Outcome::Target, 1.0)
            .with_pros(["Trendline"])
            .with_cons(["News"]);
        let b = trade(2, "EURUSD", Outcome::StopLoss, -1.0).with_cons(["News"]);
        let refs = vec![&a, &b];
        let table = breakdown(&refs, Dimension::Confluence);
        assert_eq!(table[0].name, "News");
        assert_eq!(table[0].total, 2);
        assert_eq!(table[1].name, "Trendline");
    }

    #[test]
    fn weekday_emotion_and_direction_labels() {
        // 2024-04-01 is a Monday.
        let a = trade(1, "EURUSD", Outcome::Target, 1.0)
            .with_direction(Direction::Long)
            .with_emotion("Calm");
        let b = trade(2, "EURUSD", Outcome::StopLoss, -1.0);
        let refs = vec![&a, &b];

        let days = breakdown(&refs, Dimension::Weekday);
        assert_eq!(days[0].name, "Monday");
        assert_eq!(days[1].name, "Tuesday");

        let emotions = breakdown(&refs, Dimension::Emotion);
        assert_eq!(emotions[0].name, "Calm");
        assert_eq!(emotions[1].name, "None");

        let directions = breakdown(&refs, Dimension::Direction);
        assert_eq!(directions.len(), 1);
        assert_eq!(directions[0].name, "Long");
    }

    #[test]
    fn pair_and_extractor_paths_agree() {
        let a = trade(1, "EURUSD", Outcome::Target, 2.0).with_alignment(["D1 up", "H4 up"]);
        let b = trade(2, "EURUSD", Outcome::StopLoss, -1.0).with_alignment(["H4 up", "H4 up"]);
        let refs = vec![&a, &b];

        let via_pairs = breakdown(&refs, Dimension::Alignment);
        let via_extract =
            aggregate(&refs, |t| Dimension::Alignment.extract(t), SortOrder::ByTotal);
        assert_eq!(via_pairs, via_extract);
        assert_eq!(via_pairs[0].name, "H4 up");
        assert_eq!(via_pairs[0].total, 2);
    }

    #[test]
    fn week_of_month_buckets() {
        assert_eq!(week_of_month(1), 1);
        assert_eq!(week_of_month(7), 1);
        assert_eq!(week_of_month(8), 2);
        assert_eq!(week_of_month(28), 4);
        assert_eq!(week_of_month(29), 5);
        assert_eq!(week_of_month(31), 5);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let refs: Vec<&TradeRecord> = Vec::new();
        assert!(breakdown(&refs, Dimension::Timeframe).is_empty());
    }
}

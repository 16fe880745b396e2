//! Splits a journal into active and inactive trades and decomposes tag fields.

use core_types::TradeRecord;

/// The journal split by whether each trade takes part in win/loss statistics.
///
/// Both halves keep the relative order of the input.
#[derive(Debug, Clone, Default)]
pub struct Classified<'a> {
    /// Target, Stop Loss and Breakeven trades.
    pub active: Vec<&'a TradeRecord>,
    /// Unfilled orders and setup-only entries.
    pub inactive: Vec<&'a TradeRecord>,
}

impl<'a> Classified<'a> {
    pub fn total(&self) -> usize {
        self.active.len() + self.inactive.len()
    }
}

pub fn partition(trades: &[TradeRecord]) -> Classified<'_> {
    let (active, inactive): (Vec<&TradeRecord>, Vec<&TradeRecord>) =
        trades.iter().partition(|t| t.is_active());
    Classified { active, inactive }
}

/// The multi-valued tag fields of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Timeframe,
    Alignment,
    Pros,
    Cons,
}

impl TagField {
    pub fn raw(self, trade: &TradeRecord) -> &[String] {
        match self {
            TagField::Timeframe => &trade.timeframe,
            TagField::Alignment => &trade.alignment,
            TagField::Pros => &trade.selected_pros,
            TagField::Cons => &trade.selected_cons,
        }
    }
}

/// Trimmed, non-empty tags of `field`, in the order they were recorded.
pub fn tags(trade: &TradeRecord, field: TagField) -> impl Iterator<Item = &str> {
    field
        .raw(trade)
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
}

/// Flattens `field` over `trades` into one `(trade, tag)` pair per tag.
pub fn tag_pairs<'a>(trades: &[&'a TradeRecord], field: TagField) -> Vec<(&'a TradeRecord, &'a str)> {
    trades
        .iter()
        .flat_map(|&trade| tags(trade, field).map(move |tag| (trade, tag)))
        .collect()
}

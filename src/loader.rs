//! Reads journal exports into `TradeRecord`s.
//!
//! The journal stores multi-valued attributes as comma-joined strings; this is
//! the only place they are split.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use core_types::{Direction, Outcome, TradeRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One row of a journal export, shaped like the storage table.
#[derive(Debug, Deserialize)]
struct JournalRow {
    date: String,
    #[serde(default)]
    time: Option<String>,
    pair: String,
    #[serde(default)]
    direction: Option<String>,
    outcome: String,
    #[serde(default)]
    result_percent: Option<f64>,
    #[serde(default)]
    rr_final: Option<f64>,
    #[serde(default)]
    risk_percent: Option<f64>,
    #[serde(default)]
    pips_tp: Option<f64>,
    #[serde(default)]
    pips_sl: Option<f64>,
    #[serde(default)]
    timeframe: Option<String>,
    #[serde(default)]
    alignment: Option<String>,
    #[serde(default)]
    selected_pros: Option<String>,
    #[serde(default)]
    selected_cons: Option<String>,
    #[serde(default)]
    emotions: Option<String>,
}

/// Loads a JSON array of journal rows.
///
/// Rows with an unknown outcome or an unparsable date are skipped with a warning;
/// an unknown direction is dropped from its row.
pub fn load_trades(path: &Path) -> Result<Vec<TradeRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read journal file {}", path.display()))?;
    parse_trades(&raw).with_context(|| format!("Failed to parse journal file {}", path.display()))
}

pub fn parse_trades(raw: &str) -> Result<Vec<TradeRecord>> {
    let rows: Vec<JournalRow> = serde_json::from_str(raw)?;
    let total = rows.len();

    let trades: Vec<TradeRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match to_record(row) {
            Ok(trade) => Some(trade),
            Err(e) => {
                tracing::warn!(row = idx + 1, error = %e, "Skipping journal row.");
                None
            }
        })
        .collect();

    tracing::info!(loaded = trades.len(), skipped = total - trades.len(), "Journal loaded.");
    Ok(trades)
}

fn to_record(row: JournalRow) -> Result<TradeRecord> {
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}'", row.date))?;
    let outcome: Outcome = row.outcome.parse()?;

    let direction = match row.direction.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<Direction>() {
            Ok(direction) => Some(direction),
            Err(e) => {
                tracing::warn!(date = %date, pair = %row.pair, error = %e, "Ignoring direction.");
                None
            }
        },
    };

    Ok(TradeRecord {
        date,
        time: row.time.filter(|t| !t.trim().is_empty()),
        pair: row.pair.trim().to_uppercase(),
        direction,
        outcome,
        result_percent: row.result_percent,
        rr_final: row.rr_final,
        risk_percent: row.risk_percent,
        pips_tp: row.pips_tp,
        pips_sl: row.pips_sl,
        timeframe: split_tags(row.timeframe.as_deref()),
        alignment: split_tags(row.alignment.as_deref()),
        selected_pros: split_tags(row.selected_pros.as_deref()),
        selected_cons: split_tags(row.selected_cons.as_deref()),
        emotions: row.emotions.filter(|e| !e.trim().is_empty()),
    })
}

/// Splits a comma-joined tag column into trimmed, non-empty tags.
pub fn split_tags(joined: Option<&str>) -> Vec<String> {
    joined
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

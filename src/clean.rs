//! Typed parsing of scraped cells and the missing-data stage.
//!
//! Sentinel rules:
//! - blank, `nan`, `none`, `null` → missing
//! - `-0` → 0.0
//! - `OT` (overtime marker) → 1.0
//! - JSON null or NaN → missing
//!
//! Count stats in `ZERO_FILL_STATS` are blank when the count was zero; the
//! cleaner fills them with 0.0 before any derived stat is computed.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{DOWN_CONVERSION_STATS, OVERTIME, RESULT_WIN, ZERO_FILL_STATS};
use crate::frame::GameFrame;
use crate::loader::RawValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win,
    Loss,
    Tie,
}

impl GameOutcome {
    /// Dummy encoding with loss as the baseline: `(result_win, result_tie)`.
    pub fn dummies(self) -> (f64, f64) {
        match self {
            GameOutcome::Win => (1.0, 0.0),
            GameOutcome::Loss => (0.0, 0.0),
            GameOutcome::Tie => (0.0, 1.0),
        }
    }
}

pub fn parse_stat(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(n) if n.is_nan() => None,
        // Normalizes -0.0 as well.
        RawValue::Number(n) => Some(*n + 0.0),
        RawValue::Null => None,
        RawValue::Text(text) => parse_stat_text(text),
    }
}

pub fn parse_stat_text(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if is_missing_token(text) {
        return None;
    }
    if text == "-0" {
        return Some(0.0);
    }
    if text.eq_ignore_ascii_case("ot") {
        return Some(1.0);
    }
    let value = text.replace(',', "").parse::<f64>().ok()?;
    if value.is_nan() { None } else { Some(value + 0.0) }
}

/// Team abbreviations and other identity text; the scraper writes `nan` for blanks.
pub fn parse_identity(raw: Option<&str>) -> Option<String> {
    let text = raw?.trim();
    if is_missing_token(text) {
        return None;
    }
    Some(text.to_string())
}

pub fn parse_outcome(raw: Option<&str>) -> Option<GameOutcome> {
    let text = raw?.trim();
    match text.to_ascii_lowercase().as_str() {
        "w" | "win" => Some(GameOutcome::Win),
        "l" | "loss" => Some(GameOutcome::Loss),
        "t" | "tie" => Some(GameOutcome::Tie),
        _ => None,
    }
}

/// Splits a `W-L-T` record. Older records omit the tie count, which defaults to 0.
pub fn parse_team_record(raw: &str) -> Option<(u32, u32, u32)> {
    let mut parts = raw.trim().split('-').map(str::trim);
    let wins = parts.next()?.parse::<u32>().ok()?;
    let losses = parts.next()?.parse::<u32>().ok()?;
    let ties = match parts.next() {
        Some(t) if !t.is_empty() => t.parse::<u32>().ok()?,
        _ => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((wins, losses, ties))
}

fn is_missing_token(text: &str) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case("nan")
        || text.eq_ignore_ascii_case("none")
        || text.eq_ignore_ascii_case("null")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub zero_filled: usize,
    pub missing_outcome: usize,
    pub missing_down_conversions: usize,
}

/// Replaces blank count cells with 0.0 and returns how many cells were filled.
pub fn zero_fill_counts(frame: GameFrame) -> Result<(GameFrame, usize)> {
    let mut frame = frame;
    let mut filled = 0;
    for stat in ZERO_FILL_STATS {
        let values = frame
            .require(stat)?
            .iter()
            .map(|v| {
                if v.is_none() {
                    filled += 1;
                }
                Some(v.unwrap_or(0.0))
            })
            .collect();
        frame.set_column(*stat, values)?;
    }
    if filled > 0 {
        info!(cells = filled, "filled blank count stats with zero");
    }
    Ok((frame, filled))
}

/// Drops rows with no outcome or incomplete down-conversion stats and fills the
/// overtime flag.
pub fn drop_incomplete(frame: GameFrame) -> Result<(GameFrame, CleanSummary)> {
    let mut summary = CleanSummary::default();
    let mut keep = Vec::with_capacity(frame.len());

    for row in 0..frame.len() {
        if frame.value(RESULT_WIN, row).is_none() {
            summary.missing_outcome += 1;
            continue;
        }
        let complete = DOWN_CONVERSION_STATS
            .iter()
            .all(|col| frame.value(col, row).is_some());
        if !complete {
            summary.missing_down_conversions += 1;
            continue;
        }
        keep.push(row);
    }

    let mut out = frame.select_rows(&keep);
    let overtime = match out.column(OVERTIME) {
        Some(col) => col.iter().map(|v| Some(v.unwrap_or(0.0))).collect(),
        None => vec![Some(0.0); out.len()],
    };
    out.set_column(OVERTIME, overtime)?;

    if summary.missing_outcome + summary.missing_down_conversions > 0 {
        warn!(
            missing_outcome = summary.missing_outcome,
            missing_down_conversions = summary.missing_down_conversions,
            "dropped incomplete rows"
        );
    }
    info!(rows = out.len(), "cleaned missing data");
    Ok((out, summary))
}

use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{MARGIN, MIRRORED_STATS, TOTAL_TD, TOTAL_YDS, def_name};
use crate::frame::GameFrame;
use crate::window::{diff, sum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AugmentSummary {
    pub unpaired: usize,
}

/// Adds per-row derived stats, then merges the opponent's box score in as `_def`
/// columns. Rows whose opponent row is absent cannot be merged and are dropped.
pub fn augment(frame: GameFrame) -> Result<(GameFrame, AugmentSummary)> {
    let mut frame = frame;
    add_row_stats(&mut frame)?;
    let (frame, summary) = merge_opponent_box_scores(frame)?;
    info!(rows = frame.len(), "added derived and defensive stats");
    Ok((frame, summary))
}

pub fn add_row_stats(frame: &mut GameFrame) -> Result<()> {
    frame.derive(MARGIN, |f, row| {
        diff(f.value("pts_off", row), f.value("pts_def", row))
    })?;
    frame.derive("to2_off", |f, row| f.value("to_off", row).map(|v| v * v))?;
    frame.derive("to2_def", |f, row| f.value("to_def", row).map(|v| v * v))?;
    frame.derive(TOTAL_YDS, |f, row| {
        sum(f.value("pass_yds", row), f.value("rush_yds", row))
    })?;
    frame.derive(TOTAL_TD, |f, row| {
        sum(f.value("pass_td", row), f.value("rush_td", row))
    })?;
    Ok(())
}

/// Index of each row's counterpart: the row of the same game seen from the other side.
/// Same-day rematches share a game id; the first counterpart in frame order wins.
pub fn counterpart_rows(frame: &GameFrame) -> Vec<Option<usize>> {
    let mut by_side: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    for (row, key) in frame.keys().iter().enumerate() {
        by_side
            .entry((key.game_id.as_str(), key.team.as_str()))
            .or_default()
            .push(row);
    }

    frame
        .keys()
        .iter()
        .map(|key| {
            by_side
                .get(&(key.game_id.as_str(), key.opponent.as_str()))
                .and_then(|rows| rows.first().copied())
        })
        .collect()
}

fn merge_opponent_box_scores(frame: GameFrame) -> Result<(GameFrame, AugmentSummary)> {
    let counterparts = counterpart_rows(&frame);
    let keep = counterparts
        .iter()
        .enumerate()
        .filter_map(|(row, other)| other.map(|o| (row, o)))
        .collect::<Vec<_>>();
    let summary = AugmentSummary {
        unpaired: frame.len() - keep.len(),
    };

    let rows = keep.iter().map(|(row, _)| *row).collect::<Vec<_>>();
    let mut out = frame.select_rows(&rows);
    for stat in MIRRORED_STATS.iter() {
        let source = frame.require(stat)?;
        let values = keep.iter().map(|(_, other)| source[*other]).collect();
        out.set_column(def_name(stat), values)?;
    }

    if summary.unpaired > 0 {
        warn!(
            rows = summary.unpaired,
            "dropped rows whose opponent row is missing"
        );
    }
    Ok((out, summary))
}

//! Opponent pairing: one output row per game, the primary team's columns plus the
//! opponent's pre-game columns under an `_opp` suffix.
//!
//! The primary side is the row whose team sorts first, so every game id starts
//! with the primary team's abbreviation.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::augment::counterpart_rows;
use crate::catalog::{is_opponent_pull_column, opp_name};
use crate::frame::GameFrame;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinSummary {
    pub rows_in: usize,
    pub games_out: usize,
    pub unmatched_rows: usize,
}

/// `(primary_row, opponent_row)` for each game, ordered by date then game id.
pub fn pair_games(frame: &GameFrame) -> Vec<(usize, usize)> {
    let counterparts = counterpart_rows(frame);
    let keys = frame.keys();

    let mut used = HashSet::new();
    let mut games = HashSet::new();
    let mut pairs = Vec::new();
    for (row, key) in keys.iter().enumerate() {
        if key.team >= key.opponent {
            continue;
        }
        let Some(other) = counterparts[row] else {
            continue;
        };
        if used.contains(&other) || !games.insert(key.game_id.as_str()) {
            continue;
        }
        used.insert(other);
        pairs.push((row, other));
    }

    pairs.sort_by(|a, b| {
        let (ka, kb) = (&keys[a.0], &keys[b.0]);
        ka.game_date
            .cmp(&kb.game_date)
            .then_with(|| ka.game_id.cmp(&kb.game_id))
    });
    pairs
}

pub fn join_opponents(frame: GameFrame) -> Result<(GameFrame, JoinSummary)> {
    let pairs = pair_games(&frame);
    let summary = JoinSummary {
        rows_in: frame.len(),
        games_out: pairs.len(),
        unmatched_rows: frame.len() - 2 * pairs.len(),
    };

    let pull = frame
        .column_names()
        .iter()
        .filter(|name| is_opponent_pull_column(name))
        .cloned()
        .collect::<Vec<_>>();

    let primary = pairs.iter().map(|(row, _)| *row).collect::<Vec<_>>();
    let mut out = frame.select_rows(&primary);
    for name in &pull {
        let source = frame.require(name)?;
        let values = pairs.iter().map(|(_, other)| source[*other]).collect();
        out.set_column(opp_name(name), values)?;
    }

    if summary.unmatched_rows > 0 {
        warn!(
            rows = summary.unmatched_rows,
            "rows without a joinable opponent row"
        );
    }
    info!(
        games = summary.games_out,
        opponent_columns = pull.len(),
        "joined opponent columns"
    );
    Ok((out, summary))
}

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{HOME_GAME, NUMERIC_INPUT_STATS, PLAYOFF_GAME, RESULT_TIE, RESULT_WIN};
use crate::clean::{parse_identity, parse_outcome, parse_stat, parse_team_record};
use crate::config::AWAY_MARKER;
use crate::frame::{GameFrame, RowKey};
use crate::loader::{RawTeamGame, RawValue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeSummary {
    pub rows_in: usize,
    pub malformed: usize,
}

/// Canonical game identifier: the sorted team pair plus the game day.
pub fn game_id(team: &str, opponent: &str, date: NaiveDate) -> String {
    let (first, second) = if team <= opponent {
        (team, opponent)
    } else {
        (opponent, team)
    };
    format!("{first}-{second}-{}", date.format("%Y-%m-%d"))
}

pub fn team_season_key(team: &str, season: i32) -> String {
    format!("{team}-{season}")
}

/// Anything other than the away marker, blank included, is a home game.
pub fn is_home_game(location: Option<&str>) -> bool {
    location.map(str::trim) != Some(AWAY_MARKER)
}

/// Accepts ISO dates, ISO datetimes (truncated to the day) and the schedule form
/// `"October 7"`, which carries no year: January and February games belong to
/// the calendar year after the season started.
pub fn parse_game_date(raw: &str, season: i32) -> Option<NaiveDate> {
    let text = raw.trim();
    if let Some(day) = text.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d")
    {
        return Some(date);
    }

    let date = NaiveDate::parse_from_str(&format!("{text} {season}"), "%B %d %Y").ok()?;
    if date.month() <= 2 {
        return date.with_year(season + 1);
    }
    Some(date)
}

/// Regular-season week, or `None` for playoff rounds (named weeks or blank).
pub fn parse_week(raw: Option<&RawValue>) -> Option<u32> {
    let value = parse_stat(raw?)?;
    if value < 1.0 || value.fract() != 0.0 {
        return None;
    }
    Some(value as u32)
}

/// Builds the typed frame: identity keys, outcome dummies, record split, calendar
/// buckets and every catalogued numeric stat.
pub fn normalize(rows: &[RawTeamGame]) -> Result<(GameFrame, NormalizeSummary)> {
    let mut summary = NormalizeSummary {
        rows_in: rows.len(),
        ..NormalizeSummary::default()
    };

    let mut keys = Vec::with_capacity(rows.len());
    let mut kept: Vec<&RawTeamGame> = Vec::with_capacity(rows.len());
    for row in rows {
        match row_key(row) {
            Some(key) => {
                keys.push(key);
                kept.push(row);
            }
            None => {
                summary.malformed += 1;
                debug!(team = ?row.team, opponent = ?row.opponent, "malformed row");
            }
        }
    }

    let mut frame = GameFrame::new(keys);
    let flag = |b: bool| Some(if b { 1.0 } else { 0.0 });

    frame.set_column(
        HOME_GAME,
        kept.iter()
            .map(|r| flag(is_home_game(r.game_location.as_deref())))
            .collect(),
    )?;
    let playoff = frame.keys().iter().map(|k| flag(k.playoff)).collect();
    frame.set_column(PLAYOFF_GAME, playoff)?;
    let decade = frame
        .keys()
        .iter()
        .map(|k| Some(f64::from(k.season_year.div_euclid(10))))
        .collect();
    frame.set_column("decade", decade)?;
    let log_year = frame
        .keys()
        .iter()
        .map(|k| Some(f64::from(k.season_year).ln()))
        .collect();
    frame.set_column("log_year", log_year)?;

    let outcomes = kept
        .iter()
        .map(|r| parse_outcome(r.game_outcome.as_deref()).map(|o| o.dummies()))
        .collect::<Vec<_>>();
    frame.set_column(RESULT_WIN, outcomes.iter().map(|o| o.map(|d| d.0)).collect())?;
    frame.set_column(RESULT_TIE, outcomes.iter().map(|o| o.map(|d| d.1)).collect())?;

    let records = kept
        .iter()
        .map(|r| r.team_record.as_deref().and_then(parse_team_record))
        .collect::<Vec<_>>();
    frame.set_column(
        "wins",
        records.iter().map(|r| r.map(|(w, _, _)| f64::from(w))).collect(),
    )?;
    frame.set_column(
        "losses",
        records.iter().map(|r| r.map(|(_, l, _)| f64::from(l))).collect(),
    )?;
    frame.set_column(
        "ties",
        records.iter().map(|r| r.map(|(_, _, t)| f64::from(t))).collect(),
    )?;

    for stat in NUMERIC_INPUT_STATS.iter() {
        frame.set_column(*stat, kept.iter().map(|r| r.stat(stat)).collect())?;
    }

    if summary.malformed > 0 {
        warn!(rows = summary.malformed, "dropped malformed rows");
    }
    info!(
        rows = frame.len(),
        columns = frame.column_names().len(),
        "normalized columns"
    );
    Ok((frame, summary))
}

fn row_key(row: &RawTeamGame) -> Option<RowKey> {
    let team = parse_identity(row.team.as_deref())?;
    let opponent = parse_identity(row.opponent.as_deref())?;
    if team == opponent {
        return None;
    }
    let season_year = row.season()?;
    let game_date = parse_game_date(row.game_date.as_deref()?, season_year)?;
    let week = parse_week(row.week_num.as_ref());

    Some(RowKey {
        game_id: game_id(&team, &opponent, game_date),
        team_season_key: team_season_key(&team, season_year),
        week_num: week.unwrap_or(0),
        playoff: week.is_none(),
        team,
        opponent,
        season_year,
        game_date,
    })
}

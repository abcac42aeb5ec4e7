use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::frame::GameFrame;
use crate::normalize::game_id;

pub const VEGAS_PRED_MARGIN: &str = "vegas_pred_margin";
/// Favorite value used when the line is a pick'em.
pub const PICK: &str = "PICK";

/// Closing point spread for one game, already mapped to the schedule's team abbreviations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadLine {
    pub schedule_date: NaiveDate,
    pub team_home: String,
    pub team_away: String,
    pub team_favorite_id: String,
    /// Non-positive points the favorite gives, as quoted (e.g. -3.5).
    pub spread_favorite: f64,
}

/// Spreadspoke franchise names, current and relocated, to schedule abbreviations.
static TEAM_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Arizona Cardinals", "crd"),
        ("Atlanta Falcons", "atl"),
        ("Baltimore Colts", "clt"),
        ("Baltimore Ravens", "rav"),
        ("Buffalo Bills", "buf"),
        ("Carolina Panthers", "car"),
        ("Chicago Bears", "chi"),
        ("Cincinnati Bengals", "cin"),
        ("Cleveland Browns", "cle"),
        ("Dallas Cowboys", "dal"),
        ("Denver Broncos", "den"),
        ("Detroit Lions", "det"),
        ("Green Bay Packers", "gnb"),
        ("Houston Oilers", "oti"),
        ("Houston Texans", "htx"),
        ("Indianapolis Colts", "clt"),
        ("Jacksonville Jaguars", "jax"),
        ("Kansas City Chiefs", "kan"),
        ("Las Vegas Raiders", "rai"),
        ("Los Angeles Chargers", "sdg"),
        ("Los Angeles Raiders", "rai"),
        ("Los Angeles Rams", "ram"),
        ("Miami Dolphins", "mia"),
        ("Minnesota Vikings", "min"),
        ("New England Patriots", "nwe"),
        ("New Orleans Saints", "nor"),
        ("New York Giants", "nyg"),
        ("New York Jets", "nyj"),
        ("Oakland Raiders", "rai"),
        ("Philadelphia Eagles", "phi"),
        ("Phoenix Cardinals", "crd"),
        ("Pittsburgh Steelers", "pit"),
        ("San Diego Chargers", "sdg"),
        ("San Francisco 49ers", "sfo"),
        ("Seattle Seahawks", "sea"),
        ("St. Louis Cardinals", "crd"),
        ("St. Louis Rams", "ram"),
        ("Tampa Bay Buccaneers", "tam"),
        ("Tennessee Oilers", "oti"),
        ("Tennessee Titans", "oti"),
        ("Washington Football Team", "was"),
        ("Washington Redskins", "was"),
    ])
});

/// Sportsbook favorite ids to schedule abbreviations.
static FAVORITE_IDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ARI", "crd"),
        ("ATL", "atl"),
        ("BAL", "rav"),
        ("BUF", "buf"),
        ("CAR", "car"),
        ("CHI", "chi"),
        ("CIN", "cin"),
        ("CLE", "cle"),
        ("DAL", "dal"),
        ("DEN", "den"),
        ("DET", "det"),
        ("GB", "gnb"),
        ("HOU", "htx"),
        ("IND", "clt"),
        ("JAX", "jax"),
        ("KC", "kan"),
        ("LAC", "sdg"),
        ("LAR", "ram"),
        ("LVR", "rai"),
        ("MIA", "mia"),
        ("MIN", "min"),
        ("NE", "nwe"),
        ("NO", "nor"),
        ("NYG", "nyg"),
        ("NYJ", "nyj"),
        ("PHI", "phi"),
        ("PICK", PICK),
        ("PIT", "pit"),
        ("SEA", "sea"),
        ("SF", "sfo"),
        ("TB", "tam"),
        ("TEN", "oti"),
        ("WAS", "was"),
    ])
});

#[derive(Debug, Deserialize)]
struct SpreadspokeRow {
    schedule_date: String,
    team_home: String,
    team_away: String,
    team_favorite_id: Option<String>,
    spread_favorite: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpreadspokeSummary {
    pub rows_read: usize,
    pub lines: usize,
    pub missing_line: usize,
    pub unmapped: usize,
}

/// Reads a `.csv` spreadspoke export, anything else as a JSON array of mapped lines.
pub fn load_spread_lines(path: &Path) -> Result<Vec<SpreadLine>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        let file = fs::File::open(path)
            .with_context(|| format!("open spread lines {}", path.display()))?;
        let (lines, _) = parse_spreadspoke_csv(file)
            .with_context(|| format!("parse spreadspoke csv {}", path.display()))?;
        return Ok(lines);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read spread lines {}", path.display()))?;
    serde_json::from_str::<Vec<SpreadLine>>(&raw).context("invalid spread lines json")
}

/// Maps team names and favorite ids to schedule abbreviations. Rows with no line
/// or an unknown team are skipped and counted.
pub fn parse_spreadspoke_csv<R: Read>(rdr: R) -> Result<(Vec<SpreadLine>, SpreadspokeSummary)> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut summary = SpreadspokeSummary::default();
    let mut lines = Vec::new();
    for result in reader.deserialize::<SpreadspokeRow>() {
        let row = result.context("invalid spreadspoke row")?;
        summary.rows_read += 1;
        let (Some(favorite), Some(spread)) = (row.team_favorite_id.as_deref(), row.spread_favorite)
        else {
            summary.missing_line += 1;
            continue;
        };
        let mapped = (
            parse_schedule_date(&row.schedule_date),
            TEAM_NAMES.get(row.team_home.trim()),
            TEAM_NAMES.get(row.team_away.trim()),
            FAVORITE_IDS.get(favorite.trim()),
        );
        let (Some(schedule_date), Some(home), Some(away), Some(favorite)) = mapped else {
            summary.unmapped += 1;
            continue;
        };
        lines.push(SpreadLine {
            schedule_date,
            team_home: home.to_string(),
            team_away: away.to_string(),
            team_favorite_id: favorite.to_string(),
            spread_favorite: spread,
        });
    }
    summary.lines = lines.len();
    if summary.unmapped > 0 {
        warn!(rows = summary.unmapped, "skipped spread rows with unknown teams or dates");
    }
    info!(
        read = summary.rows_read,
        lines = summary.lines,
        missing_line = summary.missing_line,
        "read spreadspoke lines"
    );
    Ok((lines, summary))
}

fn parse_schedule_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    NaiveDate::parse_from_str(text, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

/// The market's expected margin from `team`'s perspective: positive when `team` is favored.
pub fn predicted_margin(line: &SpreadLine, team: &str, opponent: &str) -> Option<f64> {
    let favorite = line.team_favorite_id.as_str();
    if favorite == PICK {
        return Some(0.0);
    }
    if favorite == team {
        return Some(-line.spread_favorite + 0.0);
    }
    if favorite == opponent {
        return Some(line.spread_favorite + 0.0);
    }
    None
}

/// Adds `vegas_pred_margin`; games without a matching line stay missing.
pub fn attach_spreads(frame: GameFrame, lines: &[SpreadLine]) -> Result<GameFrame> {
    let mut frame = frame;
    let by_game = lines
        .iter()
        .map(|line| {
            (
                game_id(&line.team_home, &line.team_away, line.schedule_date),
                line,
            )
        })
        .collect::<HashMap<_, _>>();

    let values = frame
        .keys()
        .iter()
        .map(|key| {
            by_game
                .get(&key.game_id)
                .and_then(|line| predicted_margin(line, &key.team, &key.opponent))
        })
        .collect::<Vec<_>>();
    let matched = values.iter().filter(|v| v.is_some()).count();
    frame.set_column(VEGAS_PRED_MARGIN, values)?;

    info!(games = frame.len(), matched, "attached point spreads");
    Ok(frame)
}

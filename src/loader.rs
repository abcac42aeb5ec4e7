use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clean::parse_stat;
use crate::config::PipelineConfig;

/// A scraped cell: the scraper keeps whatever the page shows, so numbers may arrive as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One team's participation in one game, as produced by the scraper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTeamGame {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default, alias = "opp")]
    pub opponent: Option<String>,
    #[serde(default, alias = "year")]
    pub season_year: Option<RawValue>,
    #[serde(default)]
    pub week_num: Option<RawValue>,
    #[serde(default, alias = "full_game_date")]
    pub game_date: Option<String>,
    #[serde(default)]
    pub game_location: Option<String>,
    #[serde(default)]
    pub game_outcome: Option<String>,
    #[serde(default)]
    pub team_record: Option<String>,
    #[serde(flatten)]
    pub stats: BTreeMap<String, RawValue>,
}

impl RawTeamGame {
    pub fn season(&self) -> Option<i32> {
        let value = parse_stat(self.season_year.as_ref()?)?;
        if value.fract() != 0.0 {
            return None;
        }
        Some(value as i32)
    }

    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).and_then(parse_stat)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub before_start_year: usize,
    pub missing_season: usize,
}

/// Reads either a JSON array of rows or one JSON object per line.
pub fn load_json_rows(path: &Path) -> Result<Vec<RawTeamGame>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read team-game rows {}", path.display()))?;
    parse_json_rows(&raw).with_context(|| format!("parse team-game rows {}", path.display()))
}

pub fn parse_json_rows(raw: &str) -> Result<Vec<RawTeamGame>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<RawTeamGame>>(trimmed).context("invalid rows json array");
    }

    let mut out = Vec::new();
    for (idx, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = serde_json::from_str::<RawTeamGame>(line)
            .with_context(|| format!("invalid row json on line {}", idx + 1))?;
        out.push(row);
    }
    Ok(out)
}

/// Keeps rows from `cfg.start_year` onward. Rows with no readable season are
/// dropped here and reported as malformed.
pub fn filter_seasons(
    rows: Vec<RawTeamGame>,
    cfg: &PipelineConfig,
) -> (Vec<RawTeamGame>, LoadSummary) {
    let mut summary = LoadSummary {
        rows_read: rows.len(),
        ..LoadSummary::default()
    };

    let kept = rows
        .into_iter()
        .filter(|row| match row.season() {
            Some(season) if season >= cfg.start_year => true,
            Some(_) => {
                summary.before_start_year += 1;
                false
            }
            None => {
                summary.missing_season += 1;
                false
            }
        })
        .collect::<Vec<_>>();
    summary.rows_kept = kept.len();

    if summary.missing_season > 0 {
        warn!(
            rows = summary.missing_season,
            "dropped rows without a season year"
        );
    }
    info!(
        read = summary.rows_read,
        kept = summary.rows_kept,
        start_year = cfg.start_year,
        "filtered raw rows by season"
    );
    (kept, summary)
}

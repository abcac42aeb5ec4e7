use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Earliest season the scraped schedule tables cover.
pub const EARLIEST_SUPPORTED_SEASON: i32 = 1960;
pub const DEFAULT_START_YEAR: i32 = 1980;

pub const SHORT_WINDOW: usize = 3;
pub const SEASON_WINDOW: usize = 16;
pub const SHORT_SPAN: usize = 3;
pub const LONG_SPAN: usize = 19;
pub const MIN_PERIODS: usize = 3;
pub const ROUND_DECIMALS: i32 = 3;

/// Location marker the scraper emits for away games.
pub const AWAY_MARKER: &str = "@";
pub const OPPONENT_SUFFIX: &str = "_opp";
pub const DEFENSE_SUFFIX: &str = "_def";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub start_year: i32,
    /// Worker threads for the per-timeline stages; 0 uses the rayon default.
    #[serde(default)]
    pub threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            threads: 0,
        }
    }
}

impl PipelineConfig {
    pub fn with_start_year(start_year: i32) -> Self {
        Self {
            start_year,
            ..Self::default()
        }
    }

    /// Reads `GRIDIRON_START_YEAR` / `GRIDIRON_THREADS`, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(year) = env_parse::<i32>("GRIDIRON_START_YEAR") {
            cfg.start_year = year;
        }
        if let Some(threads) = env_parse::<usize>("GRIDIRON_THREADS") {
            cfg.threads = threads;
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.start_year < EARLIEST_SUPPORTED_SEASON {
            return Err(PipelineError::Configuration {
                start_year: self.start_year,
                earliest: EARLIEST_SUPPORTED_SEASON,
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
}

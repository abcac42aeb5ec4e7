use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::augment::{self, AugmentSummary};
use crate::clean::{self, CleanSummary};
use crate::config::PipelineConfig;
use crate::error::{DropReason, PipelineError};
use crate::finalize;
use crate::frame::GameFrame;
use crate::join::{self, JoinSummary};
use crate::loader::{self, LoadSummary, RawTeamGame};
use crate::normalize::{self, NormalizeSummary};
use crate::rolling;
use crate::shift;
use crate::spreads::{self, SpreadLine};
use crate::trim;

/// Row counts through every stage; the difference between input and output rows is
/// fully accounted for in `drops`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub start_year: i32,
    pub load: LoadSummary,
    pub normalize: NormalizeSummary,
    pub augment: AugmentSummary,
    pub clean: CleanSummary,
    pub trimmed: usize,
    pub join: JoinSummary,
    pub spread_lines: usize,
    pub games_out: usize,
    pub feature_columns: usize,
    pub drops: BTreeMap<DropReason, usize>,
}

impl PipelineReport {
    pub fn dropped(&self, reason: DropReason) -> usize {
        self.drops.get(&reason).copied().unwrap_or(0)
    }

    fn record(&mut self, reason: DropReason, rows: usize) {
        *self.drops.entry(reason).or_insert(0) += rows;
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub games: GameFrame,
    pub report: PipelineReport,
}

/// Runs every stage over the raw rows. Configuration is checked before any row is
/// touched; after that only I/O-free row attrition happens, which is reported
/// rather than raised.
pub fn run(
    rows: Vec<RawTeamGame>,
    cfg: &PipelineConfig,
    spread_lines: Option<&[SpreadLine]>,
) -> Result<PipelineOutput> {
    cfg.validate()?;
    with_pool(cfg.threads, || run_stages(rows, cfg, spread_lines))
}

fn run_stages(
    rows: Vec<RawTeamGame>,
    cfg: &PipelineConfig,
    spread_lines: Option<&[SpreadLine]>,
) -> Result<PipelineOutput> {
    let mut report = PipelineReport {
        start_year: cfg.start_year,
        ..PipelineReport::default()
    };

    let (rows, load) = loader::filter_seasons(rows, cfg);
    report.load = load;
    report.record(DropReason::MalformedRow, load.missing_season);
    if rows.is_empty() {
        return Err(PipelineError::EmptyInput {
            start_year: cfg.start_year,
        }
        .into());
    }

    let (frame, normalized) = normalize::normalize(&rows)?;
    report.normalize = normalized;
    report.record(DropReason::MalformedRow, normalized.malformed);

    let (frame, zero_filled) = clean::zero_fill_counts(frame)?;
    let (frame, augmented) = augment::augment(frame)?;
    report.augment = augmented;
    report.record(DropReason::UnpairedOpponent, augmented.unpaired);

    let (frame, cleaned) = clean::drop_incomplete(frame)?;
    report.clean = CleanSummary {
        zero_filled,
        ..cleaned
    };
    report.record(DropReason::MissingOutcome, cleaned.missing_outcome);
    report.record(
        DropReason::MissingDownConversions,
        cleaned.missing_down_conversions,
    );

    let frame = shift::add_previous_week(frame)?;
    let frame = rolling::add_aggregates(frame)?;

    let (frame, trimmed) = trim::drop_insufficient_history(frame)?;
    report.trimmed = trimmed;
    report.record(DropReason::InsufficientHistory, trimmed);

    let (frame, joined) = join::join_opponents(frame)?;
    report.join = joined;
    report.record(DropReason::JoinMismatch, joined.unmatched_rows);

    let mut games = finalize::add_composites(frame)?;
    if let Some(lines) = spread_lines {
        games = spreads::attach_spreads(games, lines)?;
        report.spread_lines = lines.len();
    }

    report.games_out = games.len();
    report.feature_columns = games.column_names().len();
    info!(
        rows_in = report.load.rows_read,
        games = report.games_out,
        columns = report.feature_columns,
        "feature build finished"
    );
    Ok(PipelineOutput { games, report })
}

fn with_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if threads == 0 {
        return action();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "start_year {start_year} is before the earliest supported season {earliest}; choose a value between {earliest} and the latest scraped season"
    )]
    Configuration { start_year: i32, earliest: i32 },
    #[error("no team-game rows left after filtering to seasons >= {start_year}")]
    EmptyInput { start_year: i32 },
}

/// Why a row left the pipeline. Every variant is counted, none of them abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MalformedRow,
    MissingOutcome,
    MissingDownConversions,
    UnpairedOpponent,
    InsufficientHistory,
    JoinMismatch,
}

impl DropReason {
    pub fn label(self) -> &'static str {
        match self {
            DropReason::MalformedRow => "malformed_row",
            DropReason::MissingOutcome => "missing_outcome",
            DropReason::MissingDownConversions => "missing_down_conversions",
            DropReason::UnpairedOpponent => "unpaired_opponent",
            DropReason::InsufficientHistory => "insufficient_history",
            DropReason::JoinMismatch => "join_mismatch",
        }
    }
}

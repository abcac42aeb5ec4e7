use once_cell::sync::Lazy;

use crate::config::{DEFENSE_SUFFIX, LONG_SPAN, OPPONENT_SUFFIX, SEASON_WINDOW, SHORT_WINDOW};

pub const SCHEDULE_STATS: &[&str] = &[
    "pts_off",
    "pts_def",
    "first_down_off",
    "first_down_def",
    "yards_off",
    "yards_def",
    "to_off",
    "to_def",
];

/// Box-score stats reported for the row's own offense only; the opponent's copy
/// becomes the `_def` mirror.
pub const BOX_STATS: &[&str] = &[
    "pass_cmp",
    "pass_att",
    "pass_yds",
    "pass_td",
    "pass_int",
    "pass_sacked",
    "pass_sacked_yds",
    "pass_yds_per_att",
    "pass_net_yds_per_att",
    "pass_cmp_perc",
    "pass_rating",
    "rush_att",
    "rush_yds",
    "rush_yds_per_att",
    "rush_td",
    "fgm",
    "fga",
    "third_down_success",
    "third_down_att",
    "fourth_down_success",
    "fourth_down_att",
];

pub const OVERTIME: &str = "overtime";

/// Count stats the schedule leaves blank when the count is zero.
pub const ZERO_FILL_STATS: &[&str] = &[
    "pts_off",
    "pts_def",
    "first_down_off",
    "first_down_def",
    "yards_off",
    "yards_def",
    "to_off",
    "to_def",
    "pass_yds",
    "pass_td",
    "rush_yds",
    "rush_td",
];

pub const DOWN_CONVERSION_STATS: &[&str] = &[
    "third_down_success",
    "third_down_att",
    "fourth_down_success",
    "fourth_down_att",
];

pub const TOTAL_YDS: &str = "total_yds";
pub const TOTAL_TD: &str = "total_td";
pub const MARGIN: &str = "margin";
pub const RESULT_WIN: &str = "result_win";
pub const RESULT_TIE: &str = "result_tie";
pub const HOME_GAME: &str = "team_home_game";
pub const PLAYOFF_GAME: &str = "playoff_game";
pub const OFF_BYE: &str = "off_bye";
pub const PREV_WEEK_NUM: &str = "prev_week_num";

pub const ROW_TOTALS: &[&str] = &[TOTAL_YDS, TOTAL_TD];

pub const SHIFT_STATS: &[&str] = &[
    "wins",
    "losses",
    "ties",
    "pts_off",
    "pts_def",
    MARGIN,
    "first_down_off",
    "first_down_def",
    "yards_off",
    "yards_def",
    "pass_yds",
    "rush_yds",
    "to_off",
    "to_def",
    "to2_off",
    "to2_def",
    RESULT_WIN,
    RESULT_TIE,
];

pub const ROLL_MEAN_STATS: &[&str] = &[
    "pts_off",
    "pts_def",
    MARGIN,
    "first_down_off",
    "yards_off",
    "pass_yds",
    "rush_yds",
    "to_off",
    "to2_off",
    "yards_def",
    "pass_yds_def",
    "rush_yds_def",
    "to_def",
    "to2_def",
];

/// Indicator columns aggregated as sums (losses are implied and never summed).
pub const ROLL_SUM_STATS: &[(&str, &str)] = &[(RESULT_WIN, "num_wins"), (RESULT_TIE, "num_ties")];

pub static NUMERIC_INPUT_STATS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut out = Vec::with_capacity(SCHEDULE_STATS.len() + BOX_STATS.len() + 1);
    out.extend_from_slice(SCHEDULE_STATS);
    out.extend_from_slice(BOX_STATS);
    out.push(OVERTIME);
    out
});

pub static MIRRORED_STATS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut out = BOX_STATS.to_vec();
    out.extend_from_slice(ROW_TOTALS);
    out
});

pub static EWMA_STATS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut out: Vec<String> = [
        "pts_off",
        "pts_def",
        MARGIN,
        "first_down_off",
        "first_down_def",
        "yards_off",
        "yards_def",
        "to_off",
        "to_def",
        "to2_off",
        "to2_def",
        HOME_GAME,
        RESULT_WIN,
        RESULT_TIE,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    out.extend(MIRRORED_STATS.iter().map(|s| s.to_string()));
    out.extend(MIRRORED_STATS.iter().map(|s| def_name(s)));
    out
});

/// A row is kept by the trimmer only when all of these are populated.
pub static TRIM_GATE_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        roll_name(SHORT_WINDOW, MARGIN),
        ewma_name(LONG_SPAN, MARGIN),
        roll_name(SEASON_WINDOW, "num_wins"),
    ]
});

pub fn prev_name(col: &str) -> String {
    format!("prev_{col}")
}

pub fn roll_name(window: usize, col: &str) -> String {
    format!("roll{window}_{col}")
}

pub fn ewma_name(span: usize, col: &str) -> String {
    format!("ewma{span}_{col}")
}

pub fn def_name(col: &str) -> String {
    format!("{col}{DEFENSE_SUFFIX}")
}

pub fn opp_name(col: &str) -> String {
    format!("{col}{OPPONENT_SUFFIX}")
}

pub fn is_opponent_pull_column(name: &str) -> bool {
    name == MARGIN
        || name == OFF_BYE
        || name.starts_with("prev_")
        || name.starts_with("roll")
        || name.starts_with("ewma")
}

use anyhow::Result;
use tracing::info;

use crate::catalog::{OFF_BYE, PREV_WEEK_NUM, SHIFT_STATS, prev_name};
use crate::frame::GameFrame;
use crate::window::shift;

/// Adds `prev_<col>` for the shift set, `prev_week_num` and `off_bye`, each computed
/// within one team-season timeline.
pub fn add_previous_week(frame: GameFrame) -> Result<GameFrame> {
    let mut frame = frame;
    let timelines = frame.team_season_timelines();

    let weeks = frame
        .keys()
        .iter()
        .map(|k| Some(f64::from(k.week_num)))
        .collect::<Vec<_>>();
    let prev_weeks = frame.map_timelines(&timelines, &weeks, |s| shift(s, 1));

    let off_bye = weeks
        .iter()
        .zip(&prev_weeks)
        .map(|(week, prev)| Some(if is_off_bye(*week, *prev) { 1.0 } else { 0.0 }))
        .collect();
    frame.set_column(PREV_WEEK_NUM, prev_weeks)?;
    frame.set_column(OFF_BYE, off_bye)?;

    for stat in SHIFT_STATS {
        let shifted = frame.map_timelines(&timelines, frame.require(stat)?, |s| shift(s, 1));
        frame.set_column(prev_name(stat), shifted)?;
    }

    info!(
        timelines = timelines.len(),
        columns = SHIFT_STATS.len() + 2,
        "added previous-week columns"
    );
    Ok(frame)
}

/// A two-week gap between consecutive regular-season games. Week 1 and playoff rows
/// (week 0) never count.
pub fn is_off_bye(week: Option<f64>, prev_week: Option<f64>) -> bool {
    match (week, prev_week) {
        (Some(week), Some(prev)) if week > 1.0 => week - prev == 2.0,
        _ => false,
    }
}

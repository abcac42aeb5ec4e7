//! Rolling and exponentially weighted aggregates.
//!
//! Every aggregate runs on the series shifted by one game, so the value stored on
//! game `i` summarizes games strictly before it in the same team-season.

use anyhow::Result;
use tracing::info;

use crate::catalog::{EWMA_STATS, ROLL_MEAN_STATS, ROLL_SUM_STATS, ewma_name, roll_name};
use crate::config::{LONG_SPAN, MIN_PERIODS, SEASON_WINDOW, SHORT_SPAN, SHORT_WINDOW};
use crate::frame::GameFrame;
use crate::window::{ewma, rolling_mean, rolling_sum, round_series, shift};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean { window: usize },
    Sum { window: usize },
    Ewma { span: usize },
}

impl Aggregate {
    pub fn apply(self, series: &[Option<f64>]) -> Vec<Option<f64>> {
        let prior = shift(series, 1);
        let out = match self {
            Aggregate::Mean { window } => rolling_mean(&prior, window, MIN_PERIODS),
            Aggregate::Sum { window } => rolling_sum(&prior, window, MIN_PERIODS),
            Aggregate::Ewma { span } => ewma(&prior, span, MIN_PERIODS),
        };
        round_series(out)
    }
}

/// Output column, source column, aggregate.
pub fn aggregate_plan() -> Vec<(String, String, Aggregate)> {
    let mut plan = Vec::new();
    for stat in ROLL_MEAN_STATS {
        plan.push((
            roll_name(SHORT_WINDOW, stat),
            stat.to_string(),
            Aggregate::Mean {
                window: SHORT_WINDOW,
            },
        ));
    }
    for window in [SHORT_WINDOW, SEASON_WINDOW] {
        for (stat, label) in ROLL_SUM_STATS {
            plan.push((
                roll_name(window, label),
                stat.to_string(),
                Aggregate::Sum { window },
            ));
        }
    }
    for span in [SHORT_SPAN, LONG_SPAN] {
        for stat in EWMA_STATS.iter() {
            plan.push((ewma_name(span, stat), stat.clone(), Aggregate::Ewma { span }));
        }
    }
    plan
}

pub fn add_aggregates(frame: GameFrame) -> Result<GameFrame> {
    let mut frame = frame;
    let timelines = frame.team_season_timelines();
    let plan = aggregate_plan();

    for (name, source, aggregate) in &plan {
        let values = frame.map_timelines(&timelines, frame.require(source)?, |s| {
            aggregate.apply(s)
        });
        frame.set_column(name.as_str(), values)?;
    }

    info!(
        timelines = timelines.len(),
        columns = plan.len(),
        "added rolling and ewma aggregates"
    );
    Ok(frame)
}

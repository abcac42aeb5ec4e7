use anyhow::Result;
use tracing::info;

use crate::catalog::{MARGIN, ewma_name, opp_name};
use crate::config::{LONG_SPAN, SHORT_SPAN};
use crate::frame::GameFrame;
use crate::window::{diff, ratio, sum};

pub const MARGIN_TREND: &str = "margin_trend";
pub const EWMA_MARGIN_DIFF: &str = "ewma_margin_diff";
pub const MARGIN_TREND_DIFF: &str = "margin_trend_diff";

/// `(output, successes, attempts)` over the long-span EWMA columns.
const CONVERSION_RATES: &[(&str, &str, &str)] = &[
    ("third_down_pct", "third_down_success", "third_down_att"),
    ("fourth_down_pct", "fourth_down_success", "fourth_down_att"),
    ("pass_cmp_pct", "pass_cmp", "pass_att"),
];

/// Row-local cross features over columns the join already placed side by side.
pub fn add_composites(frame: GameFrame) -> Result<GameFrame> {
    let mut frame = frame;
    let short_margin = ewma_name(SHORT_SPAN, MARGIN);
    let long_margin = ewma_name(LONG_SPAN, MARGIN);
    let long_pass = ewma_name(LONG_SPAN, "pass_yds");
    let long_rush = ewma_name(LONG_SPAN, "rush_yds");
    let scrimmage = ewma_name(LONG_SPAN, "scrimmage_yds");

    for opponent_side in [false, true] {
        let side = |col: &str| {
            if opponent_side {
                opp_name(col)
            } else {
                col.to_string()
            }
        };

        let (short, long) = (side(&short_margin), side(&long_margin));
        frame.derive(side(MARGIN_TREND), |f, row| {
            diff(f.value(&short, row), f.value(&long, row))
        })?;

        for (name, successes, attempts) in CONVERSION_RATES {
            let successes = side(&ewma_name(LONG_SPAN, successes));
            let attempts = side(&ewma_name(LONG_SPAN, attempts));
            frame.derive(side(*name), |f, row| {
                ratio(f.value(&successes, row), f.value(&attempts, row))
            })?;
        }

        let (pass, rush) = (side(&long_pass), side(&long_rush));
        frame.derive(side(&scrimmage), |f, row| {
            sum(f.value(&pass, row), f.value(&rush, row))
        })?;
    }

    let long_margin_opp = opp_name(&long_margin);
    frame.derive(EWMA_MARGIN_DIFF, |f, row| {
        diff(f.value(&long_margin, row), f.value(&long_margin_opp, row))
    })?;
    let trend_opp = opp_name(MARGIN_TREND);
    frame.derive(MARGIN_TREND_DIFF, |f, row| {
        diff(f.value(MARGIN_TREND, row), f.value(&trend_opp, row))
    })?;

    info!(rows = frame.len(), "added composite features");
    Ok(frame)
}

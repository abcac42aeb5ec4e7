use anyhow::Result;
use tracing::info;

use crate::catalog::TRIM_GATE_COLUMNS;
use crate::frame::GameFrame;

/// Drops the early-season rows whose gate aggregates are still missing. Returns the
/// trimmed frame and the number of rows removed.
pub fn drop_insufficient_history(frame: GameFrame) -> Result<(GameFrame, usize)> {
    for gate in TRIM_GATE_COLUMNS.iter() {
        frame.require(gate)?;
    }
    let out = frame.filter_rows(|f, row| {
        TRIM_GATE_COLUMNS
            .iter()
            .all(|gate| f.value(gate, row).is_some())
    });
    let dropped = frame.len() - out.len();
    info!(rows = out.len(), dropped, "trimmed early-season rows");
    Ok((out, dropped))
}

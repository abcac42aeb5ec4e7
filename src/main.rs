use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use gridiron_features::cli::arg_value;
use gridiron_features::config::PipelineConfig;
use gridiron_features::{loader, logging, output, pipeline, spreads, store};

const DEFAULT_OUT: &str = "game_features.parquet";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_tracing()?;

    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let mut cfg = PipelineConfig::from_env();
    if let Some(raw) = arg_value(&args, "--start-year") {
        cfg.start_year = raw
            .parse::<i32>()
            .with_context(|| format!("invalid --start-year '{raw}'"))?;
    }
    // Fail on a bad cutoff before reading any input.
    cfg.validate()?;

    let rows = match arg_value(&args, "--input") {
        Some(path) => loader::load_json_rows(&PathBuf::from(path))?,
        None => {
            let db_path = arg_value(&args, "--db")
                .map(PathBuf::from)
                .or_else(store::default_db_path)
                .context("unable to resolve sqlite path")?;
            if !db_path.exists() {
                return Err(anyhow!(
                    "no team-game store at {} (run ingest_games or pass --input)",
                    db_path.display()
                ));
            }
            let conn = store::open_db(&db_path)?;
            store::load_team_games(&conn)?
        }
    };

    let lines = arg_value(&args, "--spreads")
        .map(|path| spreads::load_spread_lines(&PathBuf::from(path)))
        .transpose()?;

    let out_path = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
    let report_path = arg_value(&args, "--report")
        .map(PathBuf::from)
        .unwrap_or_else(|| out_path.with_extension("report.json"));

    let result = pipeline::run(rows, &cfg, lines.as_deref())?;
    output::write_games_parquet(&result.games, &out_path)?;
    output::write_report(&result.report, &report_path)?;

    let report = &result.report;
    println!("Feature build complete");
    println!("Output: {}", out_path.display());
    println!("Report: {}", report_path.display());
    println!("Seasons: >= {}", report.start_year);
    println!(
        "Rows: {} read, {} kept after season filter",
        report.load.rows_read, report.load.rows_kept
    );
    println!(
        "Games: {} ({} feature columns)",
        report.games_out, report.feature_columns
    );
    for (reason, rows) in &report.drops {
        if *rows > 0 {
            println!("  dropped {:>6} {}", rows, reason.label());
        }
    }
    Ok(())
}

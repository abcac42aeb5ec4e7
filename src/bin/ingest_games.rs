use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use gridiron_features::cli::{arg_value, positional_args};
use gridiron_features::{loader, logging, store};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_tracing()?;

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let inputs = positional_args(&args, &["--db"]);
    if inputs.is_empty() {
        return Err(anyhow!(
            "usage: ingest_games [--db PATH] <rows.json|rows.jsonl>..."
        ));
    }

    let db_path = arg_value(&args, "--db")
        .map(PathBuf::from)
        .or_else(store::default_db_path)
        .context("unable to resolve sqlite path")?;
    let mut conn = store::open_db(&db_path)?;

    println!("Team-game ingest");
    println!("DB: {}", db_path.display());
    for input in &inputs {
        let rows = loader::load_json_rows(&PathBuf::from(input))?;
        let summary = store::ingest_team_games(&mut conn, db_path.clone(), input, &rows)?;
        println!(
            "{}: run {} rows={} seasons={}",
            input,
            summary.run_id,
            summary.rows_inserted,
            season_span(&summary.seasons)
        );
    }
    Ok(())
}

fn season_span(seasons: &[i32]) -> String {
    match (seasons.first(), seasons.last()) {
        (Some(first), Some(last)) if first == last => first.to_string(),
        (Some(first), Some(last)) => format!("{first}-{last}"),
        _ => "n/a".to_string(),
    }
}

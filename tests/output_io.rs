mod common;

use std::fs;
use std::fs::File;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::RowAccessor;
use rusqlite::Connection;

use gridiron_features::loader::load_json_rows;
use gridiron_features::output::{write_games_parquet, write_report};
use gridiron_features::{PipelineConfig, run, store};

#[test]
fn parquet_output_keeps_rows_columns_and_nulls() {
    let out = run(
        common::scenario_league(),
        &PipelineConfig::with_start_year(2001),
        None,
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features").join("games.parquet");
    write_games_parquet(&out.games, &path).unwrap();
    assert!(!path.with_extension("parquet.tmp").exists());

    let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    let meta = reader.metadata().file_metadata();
    assert_eq!(meta.num_rows(), out.games.len() as i64);
    assert_eq!(
        meta.schema_descr().num_columns(),
        out.games.column_names().len() + 7
    );

    let margin_idx = 7 + out
        .games
        .column_names()
        .iter()
        .position(|n| n == "margin")
        .unwrap();
    let rows = reader
        .get_row_iter(None)
        .unwrap()
        .map(|row| row.unwrap())
        .collect::<Vec<_>>();
    assert_eq!(rows.len(), out.games.len());
    for (idx, row) in rows.iter().enumerate() {
        let key = &out.games.keys()[idx];
        assert_eq!(row.get_string(0).unwrap(), &key.game_id);
        assert_eq!(row.get_int(5).unwrap(), key.season_year);
        assert_eq!(
            row.get_double(margin_idx).unwrap(),
            out.games.value("margin", idx).unwrap()
        );
    }
}

#[test]
fn report_is_written_as_json() {
    let out = run(
        common::scenario_league(),
        &PipelineConfig::with_start_year(2001),
        None,
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_report(&out.report, &path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["games_out"], 4);
    assert_eq!(json["start_year"], 2001);
    assert_eq!(json["drops"]["insufficient_history"], 16);
}

#[test]
fn json_lines_file_feeds_the_pipeline() {
    let rows = common::scenario_league();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.jsonl");
    let body = rows
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(&path, body).unwrap();

    let loaded = load_json_rows(&path).unwrap();
    assert_eq!(loaded, rows);
}

#[test]
fn sqlite_store_round_trips_into_the_same_features() {
    let rows = common::scenario_league();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("team_games.sqlite");

    let mut conn = store::open_db(&db_path).unwrap();
    let summary = store::ingest_team_games(&mut conn, db_path.clone(), "fixture", &rows).unwrap();
    assert_eq!(summary.rows_inserted, rows.len());
    assert_eq!(summary.seasons, vec![2001]);
    drop(conn);

    let conn = Connection::open(&db_path).unwrap();
    let stored = store::load_team_games(&conn).unwrap();
    let cfg = PipelineConfig::with_start_year(2001);
    let from_store = run(stored, &cfg, None).unwrap();
    let direct = run(rows, &cfg, None).unwrap();
    assert_eq!(from_store.games, direct.games);
}

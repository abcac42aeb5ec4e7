use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::loader::RawTeamGame;

const CACHE_DIR: &str = "gridiron_features";

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub db_path: PathBuf,
    pub run_id: i64,
    pub rows_inserted: usize,
    pub seasons: Vec<i32>,
}

/// `$XDG_CACHE_HOME/gridiron_features/team_games.sqlite`, else `~/.cache/...`.
pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join("team_games.sqlite"));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join("team_games.sqlite"),
    )
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS team_games (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id INTEGER NOT NULL,
            season_year INTEGER NULL,
            team TEXT NULL,
            opponent TEXT NULL,
            payload TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_team_games_season ON team_games(season_year);
        CREATE INDEX IF NOT EXISTS idx_team_games_team ON team_games(team);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            source TEXT NOT NULL,
            rows_inserted INTEGER NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Replaces every stored row for the seasons present in `rows`, so re-ingesting a
/// scrape of the same seasons never duplicates games.
pub fn ingest_team_games(
    conn: &mut Connection,
    db_path: PathBuf,
    source: &str,
    rows: &[RawTeamGame],
) -> Result<IngestSummary> {
    let started_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO ingest_runs(started_at, finished_at, source, rows_inserted)
         VALUES (?1, NULL, ?2, 0)",
        params![started_at, source],
    )
    .context("insert ingest run")?;
    let run_id = conn.last_insert_rowid();

    let mut seasons = rows
        .iter()
        .filter_map(RawTeamGame::season)
        .collect::<Vec<_>>();
    seasons.sort_unstable();
    seasons.dedup();

    let tx = conn.transaction().context("begin ingest transaction")?;
    for season in &seasons {
        tx.execute(
            "DELETE FROM team_games WHERE season_year = ?1",
            params![season],
        )
        .context("clear season rows")?;
    }
    for row in rows {
        let payload = serde_json::to_string(row).context("serialize team-game row")?;
        tx.execute(
            "INSERT INTO team_games(run_id, season_year, team, opponent, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, row.season(), row.team, row.opponent, payload],
        )
        .context("insert team-game row")?;
    }
    tx.commit().context("commit ingest transaction")?;

    conn.execute(
        "UPDATE ingest_runs SET finished_at = ?1, rows_inserted = ?2 WHERE run_id = ?3",
        params![Utc::now().to_rfc3339(), rows.len() as i64, run_id],
    )
    .context("update ingest run")?;

    Ok(IngestSummary {
        db_path,
        run_id,
        rows_inserted: rows.len(),
        seasons,
    })
}

/// All stored rows in insertion order. Season filtering stays with the loader so
/// excluded rows are counted the same way for every source.
pub fn load_team_games(conn: &Connection) -> Result<Vec<RawTeamGame>> {
    let mut stmt = conn
        .prepare("SELECT payload FROM team_games ORDER BY row_id ASC")
        .context("prepare load team games query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query team games")?;

    let mut out = Vec::new();
    for payload in rows {
        let payload = payload.context("read team-game payload")?;
        let row = serde_json::from_str::<RawTeamGame>(&payload)
            .context("decode team-game payload")?;
        out.push(row);
    }
    Ok(out)
}

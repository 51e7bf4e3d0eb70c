use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, params};

use crate::history::{HistoricalMatch, MatchHistorySource};

const DB_DIR: &str = "match_predictor";
const DB_FILE: &str = "league.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub number: Option<u32>,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch<'a> {
    pub played_on: NaiveDate,
    pub kickoff: Option<NaiveTime>,
    pub venue: Option<&'a str>,
    pub home_team: &'a str,
    pub away_team: &'a str,
}

pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MATCH_DB_PATH")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    if let Ok(base) = std::env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(DB_DIR).join(DB_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DB_DIR)
            .join(DB_FILE),
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

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS teams (
            name TEXT PRIMARY KEY NOT NULL
        );
        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            number INTEGER NULL,
            team TEXT NOT NULL REFERENCES teams(name)
        );
        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            played_on TEXT NOT NULL,
            kickoff TEXT NULL,
            venue TEXT NULL,
            home_team TEXT NOT NULL REFERENCES teams(name),
            away_team TEXT NOT NULL REFERENCES teams(name)
        );
        CREATE TABLE IF NOT EXISTS stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            goals INTEGER NOT NULL DEFAULT 0,
            cards INTEGER NOT NULL DEFAULT 0,
            match_id INTEGER NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
            player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_matches_played_on ON matches(played_on);
        CREATE INDEX IF NOT EXISTS idx_stats_match ON stats(match_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Returns false when the team already existed.
pub fn add_team(conn: &Connection, name: &str) -> Result<bool> {
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("team name must not be empty"));
    }
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO teams(name) VALUES (?1)",
            params![name],
        )
        .context("insert team")?;
    Ok(changed > 0)
}

pub fn list_teams(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM teams ORDER BY name")
        .context("prepare list teams query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query teams")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode team row")?);
    }
    Ok(out)
}

pub fn add_player(conn: &Connection, name: &str, number: Option<u32>, team: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO players(name, number, team) VALUES (?1, ?2, ?3)",
        params![name, number, team],
    )
    .with_context(|| format!("insert player {name} ({team})"))?;
    Ok(conn.last_insert_rowid())
}

pub fn list_players(conn: &Connection, team: &str) -> Result<Vec<Player>> {
    let mut stmt = conn
        .prepare("SELECT id, name, number, team FROM players WHERE team = ?1 ORDER BY id")
        .context("prepare list players query")?;
    let rows = stmt
        .query_map(params![team], |row| {
            Ok(Player {
                id: row.get(0)?,
                name: row.get(1)?,
                number: row.get(2)?,
                team: row.get(3)?,
            })
        })
        .context("query players")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode player row")?);
    }
    Ok(out)
}

/// Inserts a fixture, refusing self-pairings and a second fixture between the
/// same two teams (either orientation) at the same date and kickoff.
pub fn add_match(conn: &Connection, m: &NewMatch<'_>) -> Result<i64> {
    if m.home_team == m.away_team {
        return Err(anyhow!("a team cannot play itself: {}", m.home_team));
    }

    let existing = conn
        .query_row(
            r#"
            SELECT id FROM matches
            WHERE ((home_team = ?1 AND away_team = ?2) OR (home_team = ?2 AND away_team = ?1))
              AND played_on = ?3
              AND kickoff IS ?4
            "#,
            params![m.home_team, m.away_team, m.played_on, m.kickoff],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .context("query existing fixture")?;
    if let Some(id) = existing {
        return Err(anyhow!(
            "fixture {} vs {} on {} already recorded (id {id})",
            m.home_team,
            m.away_team,
            m.played_on
        ));
    }

    conn.execute(
        "INSERT INTO matches(played_on, kickoff, venue, home_team, away_team)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![m.played_on, m.kickoff, m.venue, m.home_team, m.away_team],
    )
    .context("insert match")?;
    Ok(conn.last_insert_rowid())
}

pub fn add_stat(
    conn: &Connection,
    match_id: i64,
    player_id: i64,
    goals: u32,
    cards: u32,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO stats(goals, cards, match_id, player_id) VALUES (?1, ?2, ?3, ?4)",
        params![goals, cards, match_id, player_id],
    )
    .with_context(|| format!("insert stat for match {match_id} player {player_id}"))?;
    Ok(conn.last_insert_rowid())
}

/// Final score of every recorded match, summed from player goal stats.
/// Goals by players of neither side are ignored; matches without stats are 0-0.
pub fn load_historical_matches(conn: &Connection) -> Result<Vec<HistoricalMatch>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                m.home_team,
                m.away_team,
                COALESCE(SUM(CASE WHEN p.team = m.home_team THEN s.goals ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN p.team = m.away_team THEN s.goals ELSE 0 END), 0)
            FROM matches m
            LEFT JOIN stats s ON s.match_id = m.id
            LEFT JOIN players p ON p.id = s.player_id
            GROUP BY m.id, m.played_on, m.home_team, m.away_team
            ORDER BY m.played_on ASC, m.id ASC
            "#,
        )
        .context("prepare load history query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .context("query match history")?;

    let mut out = Vec::new();
    for row in rows {
        let (home, away, home_goals, away_goals) = row.context("decode match history row")?;
        out.push(HistoricalMatch::from_raw(home, away, home_goals, away_goals)?);
    }
    Ok(out)
}

impl MatchHistorySource for Connection {
    fn historical_matches(&self) -> Result<Vec<HistoricalMatch>> {
        load_historical_matches(self)
    }
}

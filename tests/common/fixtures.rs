//! Test fixture creation for data trees and databases

use super::constants::*;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace with `song_data/`, `log_data/` and a database path.
pub struct TestData {
    pub dir: TempDir,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub db_path: PathBuf,
}

impl TestData {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let song_data = dir.path().join("song_data");
        let log_data = dir.path().join("log_data");
        fs::create_dir_all(&song_data)?;
        fs::create_dir_all(&log_data)?;
        let db_path = dir.path().join("sparkify.db");
        Ok(Self {
            dir,
            song_data,
            log_data,
            db_path,
        })
    }

    /// Write a song file at `relative` under `song_data/`.
    pub fn add_song_file(&self, relative: &str, record: &serde_json::Value) -> Result<PathBuf> {
        write_lines(&self.song_data.join(relative), &[record.to_string()])
    }

    /// Write a log file at `relative` under `log_data/`, one record per line.
    pub fn add_log_file(&self, relative: &str, records: &[serde_json::Value]) -> Result<PathBuf> {
        let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
        write_lines(&self.log_data.join(relative), &lines)
    }

    /// The two reference songs, nested like the million song dataset.
    pub fn add_reference_songs(&self) -> Result<()> {
        self.add_song_file(
            "A/A/A/TRAAAAW128F429D538.json",
            &song_record(SONG_1_ID, SONG_1_TITLE, ARTIST_1_ID, ARTIST_1_NAME, SONG_1_DURATION),
        )?;
        self.add_song_file(
            "A/A/B/TRAABCL128F4286650.json",
            &song_record(SONG_2_ID, SONG_2_TITLE, ARTIST_2_ID, ARTIST_2_NAME, SONG_2_DURATION),
        )?;
        Ok(())
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, lines.join("\n") + "\n")?;
    Ok(path.to_path_buf())
}

pub fn song_record(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> serde_json::Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 0
    })
}

/// A `NextSong` event by a logged-in user.
pub fn next_song_event(
    user_id: i64,
    level: &str,
    ts: i64,
    song: &str,
    artist: &str,
    length: f64,
) -> serde_json::Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Sara",
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Johnson",
        "length": length,
        "level": level,
        "location": "Winston-Salem, NC",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540809153796.0,
        "sessionId": 411,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (iPhone; CPU iPhone OS 7_1_2 like Mac OS X)",
        "userId": user_id.to_string()
    })
}

/// Any other page view, by a logged-out user.
pub fn page_event(page: &str, ts: i64) -> serde_json::Value {
    json!({
        "artist": null,
        "auth": "Logged Out",
        "firstName": null,
        "gender": null,
        "itemInSession": 0,
        "lastName": null,
        "length": null,
        "level": "free",
        "location": null,
        "method": "GET",
        "page": page,
        "registration": null,
        "sessionId": 52,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": null,
        "userId": ""
    })
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get(0)
    })?)
}

pub fn user_level(conn: &Connection, user_id: i64) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT level FROM users WHERE user_id = ?1",
            [user_id],
            |r| r.get(0),
        )
        .optional()?)
}

/// `(start_time, song_id, artist_id)` of every songplay, by id.
pub fn songplays(conn: &Connection) -> Result<Vec<(String, Option<String>, Option<String>)>> {
    let mut stmt = conn.prepare(
        "SELECT start_time, song_id, artist_id FROM songplays ORDER BY songplay_id",
    )?;
    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

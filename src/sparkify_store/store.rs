//! SQLite-backed implementation of the Sparkify star schema store.

use super::models::{ArtistRow, SongMatch, SongRow, SongplayRow, TableCounts, TimeRow, UserRow};
use super::queries::QueryContract;
use super::schema::latest_schema;
use super::trait_def::{SparkifyStore, StoreError};
use crate::sqlite_persistence::VersionedSchema;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

/// Single-connection store. Writes open a transaction lazily, `commit`
/// closes it; dropping the store with an open transaction rolls it back.
pub struct SqliteSparkifyStore {
    conn: Connection,
    queries: QueryContract,
}

fn prepare_schema(conn: &Connection) -> Result<()> {
    let schema = latest_schema();

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating sparkify db schema at version {}", schema.version);
        schema.create(conn)?;
        return Ok(());
    }

    match VersionedSchema::stamped_version(conn)? {
        Some(version) if version == schema.version => {}
        Some(version) => bail!(
            "Unsupported sparkify db schema version {}, expected {}",
            version,
            schema.version
        ),
        None => bail!("Database has tables but no sparkify schema version"),
    }

    schema
        .validate(conn)
        .context("Sparkify db schema does not match the expected tables")
}

fn open_connection(db_path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
            | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
            | rusqlite::OpenFlags::SQLITE_OPEN_URI
            | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open sparkify database at {:?}", db_path))
}

/// Drop the sparkify tables, whatever their layout, and create them again.
fn reset_schema(conn: &mut Connection) -> Result<()> {
    let schema = latest_schema();
    let tx = conn.transaction()?;
    info!("Dropping {} tables", schema.tables.len());
    schema.drop_all(&tx)?;
    info!("Creating sparkify db schema at version {}", schema.version);
    schema.create(&tx)?;
    tx.commit()?;
    Ok(())
}

impl SqliteSparkifyStore {
    /// Open (or create) the database at `db_path`.
    ///
    /// A database without tables gets the schema created. An existing one is
    /// validated against the schema and rejected on mismatch.
    pub fn open<P: AsRef<Path>>(db_path: P, queries: QueryContract) -> Result<Self> {
        let conn = open_connection(db_path.as_ref())?;
        Self::from_connection(conn, queries)
    }

    /// Open the database at `db_path` with freshly recreated, empty tables.
    ///
    /// The existing tables are dropped before any validation, so this also
    /// recovers a database with an outdated or unknown layout.
    pub fn open_reset<P: AsRef<Path>>(db_path: P, queries: QueryContract) -> Result<Self> {
        let mut conn = open_connection(db_path.as_ref())?;
        reset_schema(&mut conn)?;
        Self::from_connection(conn, queries)
    }

    pub fn open_in_memory(queries: QueryContract) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn, queries)
    }

    fn from_connection(conn: Connection, queries: QueryContract) -> Result<Self> {
        prepare_schema(&conn)?;
        let store = Self { conn, queries };

        let counts = store.get_counts()?;
        info!(
            "Opened sparkify db: {} songs, {} artists, {} users, {} time buckets, {} songplays",
            counts.songs, counts.artists, counts.users, counts.time, counts.songplays
        );
        Ok(store)
    }

    pub fn get_counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
                .with_context(|| format!("Failed to count rows of {}", table))?;
            Ok(n as usize)
        };

        Ok(TableCounts {
            songplays: count("songplays")?,
            users: count("users")?,
            songs: count("songs")?,
            artists: count("artists")?,
            time: count("time")?,
        })
    }

    /// Whether writes are pending a commit.
    pub fn has_pending_writes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn begin_unit_if_needed(&self) -> Result<(), StoreError> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }
}

impl SparkifyStore for SqliteSparkifyStore {
    fn insert_song(&mut self, song: &SongRow) -> Result<(), StoreError> {
        self.begin_unit_if_needed()?;
        self.conn.prepare_cached(self.queries.song_insert)?.execute(params![
            song.song_id,
            song.title,
            song.artist_id,
            song.year,
            song.duration
        ])?;
        Ok(())
    }

    fn insert_artist(&mut self, artist: &ArtistRow) -> Result<(), StoreError> {
        self.begin_unit_if_needed()?;
        self.conn.prepare_cached(self.queries.artist_insert)?.execute(params![
            artist.artist_id,
            artist.name,
            artist.location,
            artist.latitude,
            artist.longitude
        ])?;
        Ok(())
    }

    fn insert_time(&mut self, time: &TimeRow) -> Result<(), StoreError> {
        self.begin_unit_if_needed()?;
        self.conn.prepare_cached(self.queries.time_insert)?.execute(params![
            time.start_time,
            time.hour,
            time.day,
            time.week,
            time.month,
            time.year,
            time.weekday
        ])?;
        Ok(())
    }

    fn upsert_user(&mut self, user: &UserRow) -> Result<(), StoreError> {
        self.begin_unit_if_needed()?;
        self.conn.prepare_cached(self.queries.user_upsert)?.execute(params![
            user.user_id,
            user.first_name,
            user.last_name,
            user.gender,
            user.level
        ])?;
        Ok(())
    }

    fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>, StoreError> {
        let found = self
            .conn
            .prepare_cached(self.queries.song_select)?
            .query_row(params![title, artist_name, duration], |row| {
                Ok(SongMatch {
                    song_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            })
            .optional()?;
        Ok(found)
    }

    fn insert_songplay(&mut self, songplay: &SongplayRow) -> Result<(), StoreError> {
        self.begin_unit_if_needed()?;
        self.conn
            .prepare_cached(self.queries.songplay_insert)?
            .execute(params![
                songplay.start_time,
                songplay.user_id,
                songplay.level,
                songplay.song_id,
                songplay.artist_id,
                songplay.session_id,
                songplay.location,
                songplay.user_agent
            ])?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
            debug!("Committed unit of work");
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
            debug!("Rolled back unit of work");
        }
        Ok(())
    }
}

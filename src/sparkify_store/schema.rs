//! SQLite schema definitions for the Sparkify star schema.
//!
//! One fact table (`songplays`) and four dimension tables (`users`, `songs`,
//! `artists`, `time`). No foreign keys are declared: within a song file the
//! song row is written before its artist row, and songplays only carry
//! best-effort references.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

// =============================================================================
// Fact Table
// =============================================================================

/// One row per `NextSong` event.
const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", &SqlType::Text, non_null = true), // full timestamp, ms precision
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text),
        sqlite_column!("song_id", &SqlType::Text),   // null when the lookup misses
        sqlite_column!("artist_id", &SqlType::Text), // null when the lookup misses
        sqlite_column!("session_id", &SqlType::Integer),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[("idx_songplays_user", "user_id")],
};

// =============================================================================
// Dimension Tables
// =============================================================================

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text), // 'free' or 'paid', latest sighting wins
    ],
    indices: &[],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("duration", &SqlType::Real, non_null = true),
    ],
    indices: &[("idx_songs_title", "title")],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text),
        sqlite_column!("location", &SqlType::Text, non_null = true),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
};

/// Keyed by time-of-day only, so the same clock time on different dates
/// shares a row.
const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", &SqlType::Text, is_primary_key = true), // HH:MM:SS.fff
        sqlite_column!("hour", &SqlType::Integer),
        sqlite_column!("day", &SqlType::Integer),
        sqlite_column!("week", &SqlType::Integer), // ISO-8601 week number
        sqlite_column!("month", &SqlType::Integer),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("weekday", &SqlType::Integer), // 0 = Monday
    ],
    indices: &[],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

/// Table order is also the drop order.
pub const SPARKIFY_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        SONGPLAYS_TABLE,
        USERS_TABLE,
        SONGS_TABLE,
        ARTISTS_TABLE,
        TIME_TABLE,
    ],
}];

/// The schema a freshly created database gets.
pub fn latest_schema() -> &'static VersionedSchema {
    &SPARKIFY_VERSIONED_SCHEMAS[SPARKIFY_VERSIONED_SCHEMAS.len() - 1]
}

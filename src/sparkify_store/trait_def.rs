//! SparkifyStore trait definition.
//!
//! The loaders only talk to the database through this trait, one typed
//! method per statement of the query contract.

use super::models::{ArtistRow, SongMatch, SongRow, SongplayRow, TimeRow, UserRow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Write access to the star schema.
///
/// Writes are buffered in a unit of work that only becomes durable on
/// [`SparkifyStore::commit`]. Callers hold the store exclusively.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait SparkifyStore {
    /// Insert a song, doing nothing if `song_id` already exists.
    fn insert_song(&mut self, song: &SongRow) -> Result<(), StoreError>;

    /// Insert an artist, doing nothing if `artist_id` already exists.
    fn insert_artist(&mut self, artist: &ArtistRow) -> Result<(), StoreError>;

    /// Insert a time bucket, doing nothing if `start_time` already exists.
    fn insert_time(&mut self, time: &TimeRow) -> Result<(), StoreError>;

    /// Insert a user, or overwrite the level of an existing one.
    fn upsert_user(&mut self, user: &UserRow) -> Result<(), StoreError>;

    /// Find the song with this exact title, artist name and duration.
    fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>, StoreError>;

    /// Append a songplay fact row.
    fn insert_songplay(&mut self, songplay: &SongplayRow) -> Result<(), StoreError>;

    /// Make every write since the last commit durable.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Discard every write since the last commit.
    fn rollback(&mut self) -> Result<(), StoreError>;
}

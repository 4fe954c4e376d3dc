//! Row models, one per table, in contract column order.

/// A row of the `songs` dimension table.
#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// A row of the `artists` dimension table.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A row of the `time` dimension table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeRow {
    /// Time of day, `HH:MM:SS.fff`.
    pub start_time: String,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

/// A row of the `users` dimension table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
}

/// A row of the `songplays` fact table. The id is generated by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct SongplayRow {
    /// Full timestamp, `YYYY-MM-DD HH:MM:SS.fff`.
    pub start_time: String,
    pub user_id: i64,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Result of the songplay lookup join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// Row counts per table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songplays: usize,
    pub users: usize,
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
}

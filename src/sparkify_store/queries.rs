//! DML statements the loaders depend on.
//!
//! Parameter order is part of the contract: every statement binds its
//! parameters positionally, in the column order listed in its `INSERT`.

/// The parameterized statements a store executes, with their conflict policy.
///
/// A store receives one of these at construction time and never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryContract {
    /// `(song_id, title, artist_id, year, duration)`, ignore on conflict.
    pub song_insert: &'static str,
    /// `(artist_id, name, location, latitude, longitude)`, ignore on conflict.
    pub artist_insert: &'static str,
    /// `(start_time, hour, day, week, month, year, weekday)`, ignore on conflict.
    pub time_insert: &'static str,
    /// `(user_id, first_name, last_name, gender, level)`, overwrite `level` on conflict.
    pub user_upsert: &'static str,
    /// `(start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)`.
    pub songplay_insert: &'static str,
    /// `(title, artist name, duration)` -> `(song_id, artist_id)`.
    pub song_select: &'static str,
}

pub const SQLITE_QUERIES: QueryContract = QueryContract {
    song_insert: "INSERT INTO songs (song_id, title, artist_id, year, duration)
                  VALUES (?1, ?2, ?3, ?4, ?5)
                  ON CONFLICT (song_id) DO NOTHING",
    artist_insert: "INSERT INTO artists (artist_id, name, location, latitude, longitude)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT (artist_id) DO NOTHING",
    time_insert: "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                  ON CONFLICT (start_time) DO NOTHING",
    user_upsert: "INSERT INTO users (user_id, first_name, last_name, gender, level)
                  VALUES (?1, ?2, ?3, ?4, ?5)
                  ON CONFLICT (user_id) DO UPDATE SET level = excluded.level",
    songplay_insert: "INSERT INTO songplays
                      (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
                      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    song_select: "SELECT songs.song_id, artists.artist_id
                  FROM songs JOIN artists ON songs.artist_id = artists.artist_id
                  WHERE songs.title = ?1 AND artists.name = ?2 AND songs.duration = ?3",
};

//! Source records as they appear in the data files.

use crate::sparkify_store::{ArtistRow, SongRow};
use serde::{de, Deserialize, Deserializer};

/// Page value of the events that count as songplays.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// One record of a song metadata file.
#[derive(Clone, Debug, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    pub artist_location: String,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

impl SongRecord {
    pub fn song_row(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }

    pub fn artist_row(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

/// One line of an event log file.
///
/// Only `NextSong` lines are parsed into this; see [`is_next_song`]. Every
/// field is optional so a missing one can be reported by name.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogRecord {
    pub ts: Option<i64>,
    #[serde(deserialize_with = "deserialize_user_id")]
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// A `NextSong` event with every field the loader needs.
#[derive(Clone, Debug, PartialEq)]
pub struct SongplayEvent {
    pub ts: i64,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
    pub song: String,
    pub artist: String,
    pub length: f64,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl LogRecord {
    /// Check the songplay fields are present. On failure returns the name
    /// of the first missing field.
    pub fn into_songplay_event(self) -> Result<SongplayEvent, &'static str> {
        Ok(SongplayEvent {
            ts: self.ts.ok_or("ts")?,
            user_id: self.user_id.ok_or("userId")?,
            level: self.level.ok_or("level")?,
            song: self.song.ok_or("song")?,
            artist: self.artist.ok_or("artist")?,
            length: self.length.ok_or("length")?,
            session_id: self.session_id.ok_or("sessionId")?,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            location: self.location,
            user_agent: self.user_agent,
        })
    }
}

/// Whether a raw log line is a songplay. Checked before typed parsing, so
/// other pages are dropped whatever the shape of their remaining fields.
pub fn is_next_song(line: &serde_json::Value) -> bool {
    line.get("page").and_then(|page| page.as_str()) == Some(NEXT_SONG_PAGE)
}

/// Logged-out events carry an empty string, logged-in ones a number that is
/// sometimes serialized as a string.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid userId {}", n))),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid userId {:?}", s))),
        Some(other) => Err(de::Error::custom(format!("invalid userId {}", other))),
    }
}

//! Loads event log files into the `time`, `users` and `songplays` tables.

use super::error::EtlError;
use super::pipeline::{FileTransformer, TransformStats};
use super::records::{is_next_song, LogRecord, SongplayEvent};
use super::time_bucket::{decompose_timestamp, TimeBucket};
use crate::sparkify_store::{SongplayRow, SparkifyStore, UserRow};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Transformer for event log files.
pub struct LogFileTransformer;

impl FileTransformer for LogFileTransformer {
    fn kind(&self) -> &'static str {
        "log"
    }

    fn transform(
        &self,
        store: &mut dyn SparkifyStore,
        path: &Path,
    ) -> Result<TransformStats, EtlError> {
        process_log_file(store, path)
    }
}

/// Parse every line of a log file and keep the `NextSong` events.
///
/// The whole file is checked before anything is written, so a malformed
/// line anywhere leaves the store untouched.
fn read_songplay_events(
    path: &Path,
    stats: &mut TransformStats,
) -> Result<Vec<(TimeBucket, SongplayEvent)>, EtlError> {
    let content = fs::read_to_string(path).map_err(|e| EtlError::io(path, e))?;

    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        stats.records_read += 1;

        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| EtlError::malformed(path, line_no, e.to_string()))?;
        if !is_next_song(&value) {
            stats.records_skipped += 1;
            continue;
        }

        let record: LogRecord = serde_json::from_value(value)
            .map_err(|e| EtlError::malformed(path, line_no, e.to_string()))?;

        let event = record.into_songplay_event().map_err(|field| {
            EtlError::malformed(path, line_no, format!("missing field `{}`", field))
        })?;
        let bucket = decompose_timestamp(event.ts).ok_or_else(|| {
            EtlError::malformed(path, line_no, format!("timestamp {} out of range", event.ts))
        })?;
        events.push((bucket, event));
    }
    Ok(events)
}

/// Load the `NextSong` events of one log file.
///
/// Time buckets go in first, then users (the last record of a user sets
/// their level), then one songplay per event. A songplay whose song cannot be
/// matched on exact title, artist name and duration is stored without song
/// and artist ids.
pub fn process_log_file(
    store: &mut dyn SparkifyStore,
    path: &Path,
) -> Result<TransformStats, EtlError> {
    let mut stats = TransformStats::default();
    let events = read_songplay_events(path, &mut stats)?;

    for (bucket, _) in &events {
        store.insert_time(&bucket.to_row())?;
        stats.time_rows += 1;
    }

    for (_, event) in &events {
        store.upsert_user(&UserRow {
            user_id: event.user_id,
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            gender: event.gender.clone(),
            level: event.level.clone(),
        })?;
        stats.users += 1;
    }

    for (bucket, event) in &events {
        let found = store.find_song(&event.song, &event.artist, event.length)?;
        let (song_id, artist_id) = match found {
            Some(m) => {
                stats.songplays_resolved += 1;
                (Some(m.song_id), Some(m.artist_id))
            }
            None => (None, None),
        };

        store.insert_songplay(&SongplayRow {
            start_time: bucket.timestamp_string(),
            user_id: event.user_id,
            level: event.level.clone(),
            song_id,
            artist_id,
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        })?;
        stats.songplays += 1;
    }

    debug!(
        "{}: {} records, {} songplays ({} matched), {} skipped",
        path.display(),
        stats.records_read,
        stats.songplays,
        stats.songplays_resolved,
        stats.records_skipped
    );
    Ok(stats)
}

//! Loads song metadata files into the `songs` and `artists` tables.

use super::error::EtlError;
use super::pipeline::{FileTransformer, TransformStats};
use super::records::SongRecord;
use crate::sparkify_store::SparkifyStore;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Transformer for song metadata files.
pub struct SongFileTransformer;

impl FileTransformer for SongFileTransformer {
    fn kind(&self) -> &'static str {
        "song"
    }

    fn transform(
        &self,
        store: &mut dyn SparkifyStore,
        path: &Path,
    ) -> Result<TransformStats, EtlError> {
        process_song_file(store, path)
    }
}

/// Insert the song and artist described by a single-record song file.
///
/// A file with no record or more than one record is rejected.
pub fn process_song_file(
    store: &mut dyn SparkifyStore,
    path: &Path,
) -> Result<TransformStats, EtlError> {
    let content = fs::read_to_string(path).map_err(|e| EtlError::io(path, e))?;
    let records: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line))
        .collect();

    let (line_no, line) = match records.as_slice() {
        [single] => *single,
        _ => {
            let line_no = records.get(1).map(|(n, _)| *n).unwrap_or(1);
            return Err(EtlError::malformed(
                path,
                line_no,
                format!("expected exactly one song record, found {}", records.len()),
            ));
        }
    };

    let record: SongRecord = serde_json::from_str(line)
        .map_err(|e| EtlError::malformed(path, line_no, e.to_string()))?;

    store.insert_song(&record.song_row())?;
    store.insert_artist(&record.artist_row())?;
    debug!("Loaded song {} by {}", record.song_id, record.artist_id);

    Ok(TransformStats {
        records_read: 1,
        songs: 1,
        artists: 1,
        ..Default::default()
    })
}

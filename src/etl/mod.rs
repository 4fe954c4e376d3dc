//! Extract-transform-load of song and event log files.

mod error;
mod locator;
mod log_file;
mod pipeline;
mod records;
mod song_file;
mod time_bucket;

pub use error::EtlError;
pub use locator::find_files;
pub use log_file::{process_log_file, LogFileTransformer};
pub use pipeline::{process_data, FileTransformer, PipelineSummary, Progress, TransformStats};
pub use records::{is_next_song, LogRecord, SongRecord, SongplayEvent, NEXT_SONG_PAGE};
pub use song_file::{process_song_file, SongFileTransformer};
pub use time_bucket::{decompose_timestamp, TimeBucket};

//! Drives a transformer over every data file of a directory tree.

use super::error::EtlError;
use super::locator::find_files;
use crate::sparkify_store::SparkifyStore;
use std::fmt;
use std::ops::AddAssign;
use std::path::Path;
use tracing::{debug, error, info};

/// Rows submitted to the store while transforming files. Submitted rows
/// include inserts the store ignored on conflict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub records_read: usize,
    /// Log records dropped by the `NextSong` filter.
    pub records_skipped: usize,
    pub songs: usize,
    pub artists: usize,
    pub time_rows: usize,
    pub users: usize,
    pub songplays: usize,
    /// Songplays whose song and artist were found.
    pub songplays_resolved: usize,
}

impl AddAssign for TransformStats {
    fn add_assign(&mut self, other: Self) {
        self.records_read += other.records_read;
        self.records_skipped += other.records_skipped;
        self.songs += other.songs;
        self.artists += other.artists;
        self.time_rows += other.time_rows;
        self.users += other.users;
        self.songplays += other.songplays;
        self.songplays_resolved += other.songplays_resolved;
    }
}

/// Loads a single data file into the store. Implementations must not
/// commit; the driver does that once the whole file went through.
pub trait FileTransformer {
    /// Short label used in logs, e.g. "song".
    fn kind(&self) -> &'static str;

    fn transform(
        &self,
        store: &mut dyn SparkifyStore,
        path: &Path,
    ) -> Result<TransformStats, EtlError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} files processed.", self.processed, self.total)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub files_found: usize,
    pub files_processed: usize,
    pub stats: TransformStats,
}

/// Run `transformer` over every `extension` file under `root`, committing
/// after each file and reporting progress after each commit.
///
/// The first failure stops the run. Files committed before it stay loaded;
/// the failing file's writes are rolled back.
pub fn process_data<F>(
    store: &mut dyn SparkifyStore,
    root: &Path,
    extension: &str,
    transformer: &dyn FileTransformer,
    mut on_progress: F,
) -> Result<PipelineSummary, EtlError>
where
    F: FnMut(Progress),
{
    let files = find_files(root, extension)?;
    let total = files.len();
    info!("{} files found in {}", total, root.display());

    let mut summary = PipelineSummary {
        files_found: total,
        ..Default::default()
    };

    if files.is_empty() {
        on_progress(Progress {
            processed: 0,
            total: 0,
        });
        return Ok(summary);
    }

    for (index, path) in files.iter().enumerate() {
        debug!("Processing {} file {}", transformer.kind(), path.display());
        let stats = match transformer.transform(store, path) {
            Ok(stats) => stats,
            Err(e) => {
                error!(
                    "Failed to process {} file {}: {}",
                    transformer.kind(),
                    path.display(),
                    e
                );
                if let Err(rollback_err) = store.rollback() {
                    error!(
                        "Failed to roll back {} file {}: {}",
                        transformer.kind(),
                        path.display(),
                        rollback_err
                    );
                }
                return Err(e);
            }
        };
        store.commit()?;

        summary.files_processed += 1;
        summary.stats += stats;
        on_progress(Progress {
            processed: index + 1,
            total,
        });
    }

    Ok(summary)
}

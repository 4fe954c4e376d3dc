//! Sparkify ETL Library
//!
//! Loads song metadata and application event logs into the Sparkify star
//! schema. The binaries are thin wrappers around these modules.

pub mod config;
pub mod etl;
pub mod sparkify_store;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use etl::{process_data, EtlError, LogFileTransformer, SongFileTransformer};
pub use sparkify_store::{SparkifyStore, SqliteSparkifyStore, SQLITE_QUERIES};

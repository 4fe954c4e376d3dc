mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";
pub const DEFAULT_DB_PATH: &str = "sparkify.db";
pub const DEFAULT_FILE_EXTENSION: &str = "json";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub song_data: Option<PathBuf>,
    pub log_data: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub file_extension: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub db_path: PathBuf,
    pub file_extension: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    ///
    /// The data directories are not checked here; a missing one is reported
    /// when the pipeline tries to walk it.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let song_data = file
            .song_data
            .map(PathBuf::from)
            .or_else(|| cli.song_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SONG_DATA));

        let log_data = file
            .log_data
            .map(PathBuf::from)
            .or_else(|| cli.log_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DATA));

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        // Validate the database can be created where requested
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                bail!("Database directory does not exist: {:?}", parent);
            }
            if !parent.is_dir() {
                bail!("Database parent is not a directory: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let file_extension = file
            .file_extension
            .or_else(|| cli.file_extension.clone())
            .map(|ext| ext.trim_start_matches('.').to_string())
            .unwrap_or_else(|| DEFAULT_FILE_EXTENSION.to_string());
        if file_extension.is_empty() {
            bail!("file_extension must not be empty");
        }

        Ok(Self {
            song_data,
            log_data,
            db_path,
            file_extension,
        })
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig};
use sparkify_etl::etl::{
    process_data, FileTransformer, LogFileTransformer, PipelineSummary, SongFileTransformer,
};
use sparkify_etl::sparkify_store::{SparkifyStore, SqliteSparkifyStore, SQLITE_QUERIES};
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song metadata and event logs into the Sparkify database")]
struct CliArgs {
    /// Root directory of the song metadata files.
    #[clap(long, value_parser = parse_path)]
    pub song_data: Option<PathBuf>,

    /// Root directory of the event log files.
    #[clap(long, value_parser = parse_path)]
    pub log_data: Option<PathBuf>,

    /// Path to the SQLite database file, created if missing.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// Extension of the data files to load.
    #[clap(long)]
    pub extension: Option<String>,

    /// Path to a TOML config file. Its values take precedence over the CLI.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Drop and recreate every table before loading.
    #[clap(long, default_value_t = false)]
    pub reset: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
            db_path: self.db.clone(),
            file_extension: self.extension.clone(),
        }
    }
}

fn load_tree(
    store: &mut dyn SparkifyStore,
    root: &Path,
    extension: &str,
    transformer: &dyn FileTransformer,
) -> Result<PipelineSummary> {
    process_data(store, root, extension, transformer, |progress| {
        println!("{}", progress)
    })
    .with_context(|| {
        format!(
            "Failed to load {} files from {}",
            transformer.kind(),
            root.display()
        )
    })
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Song data: {}", config.song_data.display());
    info!("Log data: {}", config.log_data.display());
    info!("Database: {}", config.db_path.display());

    let mut store = if cli_args.reset {
        SqliteSparkifyStore::open_reset(&config.db_path, SQLITE_QUERIES)?
    } else {
        SqliteSparkifyStore::open(&config.db_path, SQLITE_QUERIES)?
    };

    let songs = load_tree(
        &mut store,
        &config.song_data,
        &config.file_extension,
        &SongFileTransformer,
    )?;
    let logs = load_tree(
        &mut store,
        &config.log_data,
        &config.file_extension,
        &LogFileTransformer,
    )?;

    info!("");
    info!("Load Summary");
    info!("============");
    info!("Song files processed: {}", songs.files_processed);
    info!("Log files processed: {}", logs.files_processed);
    info!(
        "Log records read: {} ({} skipped by page filter)",
        logs.stats.records_read, logs.stats.records_skipped
    );
    info!(
        "Songplays inserted: {} ({} matched a song)",
        logs.stats.songplays, logs.stats.songplays_resolved
    );

    let counts = store.get_counts()?;
    info!("");
    info!("Database contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} users", counts.users);
    info!("  {} time buckets", counts.time);
    info!("  {} songplays", counts.songplays);

    println!(
        "Load completed: {} song files, {} log files.",
        songs.files_processed, logs.files_processed
    );
    Ok(())
}

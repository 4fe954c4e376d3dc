//! Drops and recreates every table of the Sparkify database.

use anyhow::Result;
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig};
use sparkify_etl::sparkify_store::{latest_schema, SqliteSparkifyStore, SQLITE_QUERIES};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
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
#[command(name = "create-tables")]
#[command(about = "Drop and recreate the Sparkify tables")]
struct CliArgs {
    /// Path to the SQLite database file, created if missing.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// Path to a TOML config file. Its `db_path` takes precedence over `--db`.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Only print the DDL, do not touch the database.
    #[clap(long, default_value_t = false)]
    pub dry_run: bool,
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

    let schema = latest_schema();
    if cli_args.dry_run {
        for table in schema.tables {
            println!("{}", table.drop_sql());
        }
        for table in schema.tables {
            println!("{}", table.create_sql());
        }
        return Ok(());
    }

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_path: cli_args.db.clone(),
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    if config.db_path.exists() {
        warn!(
            "Existing data in {} will be dropped",
            config.db_path.display()
        );
    }

    SqliteSparkifyStore::open_reset(&config.db_path, SQLITE_QUERIES)?;

    info!(
        "Created {} tables at schema version {} in {}",
        schema.tables.len(),
        schema.version,
        config.db_path.display()
    );
    Ok(())
}

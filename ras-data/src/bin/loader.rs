use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ras_data::EquipmentCatalogLoader;
use ras_db_sqlite::SqliteRepository;

/// Load equipment catalog data from a CSV file into the database.
///
/// The CSV file should have the following columns:
/// - space_kind: a space kind code (bedroom, bathroom, kitchen, common,
///   exterior, extra) or `any` for equipment available in every kind
/// - code: stable equipment identifier
/// - label: display label
#[derive(Parser, Debug)]
#[command(name = "ras-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing equipment catalog data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g., sqlite:ras.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:ras.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,
}

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        info!("running migrations");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
    }

    info!(file = %args.file.display(), "loading equipment catalog");

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = EquipmentCatalogLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    info!("parsed {} records from CSV", records.len());

    let inserted = EquipmentCatalogLoader::load(&repo, &records)
        .await
        .context("Failed to load equipment catalog into database")?;

    info!("loaded {} equipment catalog rows", inserted);

    Ok(())
}

//! Imports a BLS OEWS wage workbook into `salary_data`.
//!
//! Safe to re-run: existing (occupation, location, year) records are skipped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careers_api::bls::reader::read_rows;
use careers_api::bls::store::PgSalaryStore;
use careers_api::bls::{ImportOptions, ImportScope, ImportSummary, SalaryImporter};
use careers_api::config;
use careers_api::db::create_pool;

#[derive(Parser)]
#[command(name = "import-bls")]
#[command(about = "Import BLS occupational wage data", long_about = None)]
struct Cli {
    /// Workbook to import (.xlsx, .xls or .csv)
    path: PathBuf,

    /// Survey year stamped on every record
    #[arg(long, default_value_t = 2024)]
    year: i32,

    /// Area granularities to import (e.g., national,state,city)
    #[arg(long, value_delimiter = ',', default_value = "city")]
    scope: Vec<ImportScope>,

    /// Only import healthcare SOC codes
    #[arg(long)]
    healthcare_only: bool,

    /// Source label stored with each record
    #[arg(long, default_value = "BLS")]
    source: String,

    /// Read and filter the workbook without touching the database
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("careers_api={0},import_bls={0}", config::rust_log_from_env()))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = ImportOptions {
        year: cli.year,
        scopes: cli.scope,
        healthcare_only: cli.healthcare_only,
        source: cli.source,
    };

    info!("Reading {}", cli.path.display());
    let rows = read_rows(&cli.path)
        .with_context(|| format!("Failed to read workbook {}", cli.path.display()))?;
    info!("Read {} rows", rows.len());

    let summary = if cli.dry_run {
        let qualifying = rows.iter().filter(|r| options.scope_for(r).is_some()).count() as u64;
        info!("Dry run: {qualifying} rows would be imported");
        ImportSummary {
            rows_read: rows.len() as u64,
            filtered: rows.len() as u64 - qualifying,
            ..Default::default()
        }
    } else {
        let database_url = config::database_url(cli.database_url)?;
        let db = create_pool(&database_url).await?;
        let store = PgSalaryStore::new(db);
        SalaryImporter::new(&store, options).import_rows(&rows).await
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

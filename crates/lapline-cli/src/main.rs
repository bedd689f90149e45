use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lapline_client::{DEFAULT_BASE_URL, ReqwestFetcher};
use lapline_core::{IngestService, RetryPolicy, RetryingFetcher, TracingIngestReporter};
use lapline_db::{Database, DatabaseConfig};

#[derive(Parser, Debug)]
#[command(
    name = "lapline",
    version,
    about = "Ingest F1 lap times and pit stops into PostgreSQL"
)]
struct Cli {
    /// Season to ingest (repeat for several, processed in order)
    #[arg(long = "season", value_name = "YEAR", default_values_t = [2024])]
    seasons: Vec<i32>,

    /// Keep only the first N laps of each race (all laps when omitted)
    #[arg(long, value_name = "N")]
    max_laps: Option<usize>,

    /// Ergast-compatible API base URL
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("lapline=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let http = ReqwestFetcher::with_timeout(&cli.base_url, Duration::from_secs(cli.timeout_secs))
        .context("Failed to create HTTP client")?;
    let fetcher = RetryingFetcher::new(http, RetryPolicy::default());

    let config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;

    let service = IngestService::new(fetcher, db.bulk_loader(), TracingIngestReporter);
    let summary = service
        .ingest_and_load(&cli.seasons, cli.max_laps)
        .await
        .context("Failed to load ingested data")?;

    tracing::info!(
        lap_rows = summary.lap_rows,
        pit_stop_rows = summary.pit_stop_rows,
        "Ingestion finished"
    );

    Ok(())
}

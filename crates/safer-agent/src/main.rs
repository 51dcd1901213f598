//! SAFER — Safety-Aware Filtering of Evidence for Repurposing
//! Entry point for the `safer` binary.

mod config;

use clap::Parser;
use safer_ingestion::sources::OpenTargetsClient;
use safer_ingestion::run_pipeline_cancellable;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rank repurposing candidates for a drug, penalised by its safety profile.
#[derive(Debug, Parser)]
#[command(name = "safer", version, about)]
struct Cli {
    /// ChEMBL id of the drug (e.g. CHEMBL25)
    chembl_id: String,

    /// Config file (defaults to $SAFER_CONFIG or ./safer.toml)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Print only the ranked results instead of the full report
    #[arg(long)]
    results_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("safer=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };
    let pipeline_cfg = config.pipeline_config()?;
    let ot = &config.sources.opentargets;
    info!(endpoint = %ot.url, max_in_flight = pipeline_cfg.fanout.max_in_flight, "Configuration loaded");

    let client = OpenTargetsClient::with_endpoint(&ot.url, ot.timeout(), ot.page_size)?;

    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let report = run_pipeline_cancellable(&client, &cli.chembl_id, &pipeline_cfg, ctrl_c).await?;

    if !report.fetch_report.failures.is_empty() {
        tracing::warn!(
            "{} of {} targets could not be fetched",
            report.fetch_report.failures.len(),
            report.fetch_report.targets_attempted
        );
    }

    let out = if cli.results_only {
        serde_json::to_string_pretty(&report.results)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{out}");

    Ok(())
}

use anyhow::{Context, Result};
use catalog_pipeline::config::{ConfigOverrides, PipelineConfig};
use catalog_pipeline::pipeline::run_pipeline;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "src/configs/pipeline.toml";

/// Sample a product dataset and normalize it into catalog records.
#[derive(Debug, Parser)]
#[command(name = "catalog-pipeline", version)]
struct Args {
    /// Number of products to sample (0 keeps every row)
    #[arg(long)]
    limit: Option<usize>,

    /// Output JSON path
    #[arg(long)]
    out: Option<String>,

    /// Dataset id (owner/name) or http(s) URL of a data file
    #[arg(long)]
    dataset: Option<String>,

    /// Use a local extracted dataset folder or file instead of the download cache
    #[arg(long)]
    local: Option<String>,

    /// Pipeline config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();

    let mut config = PipelineConfig::from_file_or_default(&args.config)
        .context("Failed to load pipeline configuration")?;
    config.apply_overrides(ConfigOverrides {
        limit: args.limit,
        output: args.out,
        dataset: args.dataset,
        local_path: args.local,
    });

    info!("🚀 Starting catalog pipeline");
    info!(
        "Dataset: {} (local: {}), sample limit: {}, output: {}",
        config.dataset.id,
        config.dataset.local_path.as_deref().unwrap_or("none"),
        config.sampling.limit,
        config.output.path
    );

    match run_pipeline(&config).await {
        Ok(report) => {
            info!("✅ Wrote {} products to {}", report.accepted, config.output.path);
            info!(
                "📊 {} rows read, {} skipped",
                report.total,
                report.rejected()
            );
            Ok(())
        }
        Err(e) => {
            error!("❌ Pipeline failed: {:#}", e);
            Err(e)
        }
    }
}

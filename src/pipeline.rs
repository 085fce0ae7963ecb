use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::fetcher::{locate_table, DatasetFetcher, DatasetSource, TableLoader};
use crate::processor::{NormalizeReport, ProductNormalizer, RowSampler};
use crate::storage::CatalogWriter;

/// Acquire, load, sample, normalize and write. Nothing is written unless every
/// acquisition step succeeds.
pub async fn run_pipeline(config: &PipelineConfig) -> Result<NormalizeReport> {
    config.validate()?;

    let source = DatasetSource::from_config(config);
    let fetcher = DatasetFetcher::new(config.get_cache_dir())
        .context("Failed to initialize dataset fetcher")?;
    let base = fetcher.acquire(&source).await?;

    let (table_path, format) = locate_table(&base)?;
    info!("Found {:?} table: {}", format, table_path.display());

    let sampler = RowSampler::new(config.sampling.limit, config.sampling.seed);
    let rows = TableLoader::new(sampler).load(&table_path, format)?;
    info!("Processing {} rows", rows.len());

    let normalizer = ProductNormalizer::new();
    let (products, report) = normalizer.normalize_rows(&rows);

    if products.is_empty() {
        warn!("No rows survived normalization; writing an empty catalog");
    }

    let writer = CatalogWriter::new(&config.output.path);
    writer.write(&products)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::fs;

    #[tokio::test]
    async fn test_local_csv_end_to_end() {
        let dataset = tempfile::tempdir().unwrap();
        fs::write(
            dataset.path().join("amazon_products.csv"),
            "title,price,category,image_url,stock\n\
             Wireless Mouse,$25.00,Computer Accessories,http://x.com/a.jpg,\n\
             ,$5.00,Clothing,http://x.com/b.jpg,3\n\
             Tennis Racket,N/A,Sports,http://x.com/c.jpg,4\n\
             Garden Hose,\"$1,234.50\",Garden Tools,http://x.com/d.jpg,12\n",
        )
        .unwrap();

        let out = tempfile::tempdir().unwrap();
        let output_path = out.path().join("data").join("catalog.json");

        let mut config = PipelineConfig::default();
        config.dataset.local_path = Some(dataset.path().to_string_lossy().to_string());
        config.output.path = output_path.to_string_lossy().to_string();

        let report = run_pipeline(&config).await.unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.missing_name, 1);
        assert_eq!(report.invalid_price, 1);

        let products = CatalogWriter::read(&output_path).unwrap();
        assert_eq!(products[0].name, "Wireless Mouse");
        assert_eq!(products[0].price, 25.0);
        assert_eq!(products[0].stock, 50);
        assert_eq!(products[1].name, "Garden Hose");
        assert_eq!(products[1].price, 1234.5);
        assert_eq!(products[1].stock, 12);
        assert_eq!(products[1].category, Category::HomeAndGarden);
        assert_eq!(products[1].images, vec!["http://x.com/d.jpg"]);
    }

    #[tokio::test]
    async fn test_missing_dataset_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let output_path = out.path().join("catalog.json");

        let mut config = PipelineConfig::default();
        config.dataset.local_path = Some("/no/such/dataset".to_string());
        config.output.path = output_path.to_string_lossy().to_string();

        assert!(run_pipeline(&config).await.is_err());
        assert!(!output_path.exists());
    }

    #[tokio::test]
    async fn test_dataset_without_tables_is_fatal() {
        let dataset = tempfile::tempdir().unwrap();
        fs::write(dataset.path().join("notes.txt"), "no data").unwrap();
        let out = tempfile::tempdir().unwrap();

        let mut config = PipelineConfig::default();
        config.dataset.local_path = Some(dataset.path().to_string_lossy().to_string());
        config.output.path = out.path().join("catalog.json").to_string_lossy().to_string();

        let err = run_pipeline(&config).await.unwrap_err();
        assert!(err.to_string().contains("No CSV/JSON file found"));
    }
}

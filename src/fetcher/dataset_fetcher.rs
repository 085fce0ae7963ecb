use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;
use reqwest::Client;
use walkdir::WalkDir;

use crate::config::PipelineConfig;

/// Where the raw dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A directory or file on disk, used as-is.
    Local(PathBuf),
    /// A data file downloaded over http(s) into the cache.
    Remote(String),
    /// An `owner/name` dataset already present in the download cache.
    Cached(String),
}

impl DatasetSource {
    pub fn from_config(config: &PipelineConfig) -> Self {
        if let Some(local) = config
            .dataset
            .local_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
        {
            return DatasetSource::Local(PathBuf::from(local));
        }

        let id = config.dataset.id.trim();
        if id.starts_with("http://") || id.starts_with("https://") {
            DatasetSource::Remote(id.to_string())
        } else {
            DatasetSource::Cached(id.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(TableFormat::Csv),
            "json" | "jsonl" | "ndjson" => Some(TableFormat::Json),
            _ => None,
        }
    }
}

pub struct DatasetFetcher {
    client: Client,
    cache_dir: PathBuf,
}

impl DatasetFetcher {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(DatasetFetcher { client, cache_dir })
    }

    /// Resolves the source to a local directory or file that can be searched for tables.
    pub async fn acquire(&self, source: &DatasetSource) -> Result<PathBuf> {
        match source {
            DatasetSource::Local(path) => {
                info!("Using local dataset: {}", path.display());
                if !path.exists() {
                    return Err(anyhow!("Local dataset path not found: {}", path.display()));
                }
                Ok(path.clone())
            }
            DatasetSource::Cached(id) => {
                let dir = self.cached_dataset_dir(id)?;
                info!("Using cached dataset {} at {}", id, dir.display());
                if !dir.exists() {
                    return Err(anyhow!(
                        "Dataset {} not found in cache {}. Download it first or pass --local",
                        id,
                        self.cache_dir.display()
                    ));
                }
                Ok(dir)
            }
            DatasetSource::Remote(url) => self.download(url).await,
        }
    }

    pub fn cached_dataset_dir(&self, id: &str) -> Result<PathBuf> {
        let mut parts = id.split('/').filter(|p| !p.is_empty());
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) => {
                Ok(self.cache_dir.join("datasets").join(owner).join(name))
            }
            _ => Err(anyhow!(
                "Dataset id must look like owner/name, got: {}",
                id
            )),
        }
    }

    /// Cache location of a downloaded dataset file: `<cache>/downloads/<host>/<file name>`.
    pub fn download_target(&self, url: &str) -> Result<PathBuf> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid dataset URL: {}", url))?;
        let file_name = parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("Dataset URL has no file name: {}", url))?;
        let host = parsed.host_str().unwrap_or("unknown-host");

        Ok(self.cache_dir.join("downloads").join(host).join(file_name))
    }

    /// Returns the downloaded file, not its host directory.
    async fn download(&self, url: &str) -> Result<PathBuf> {
        let target = self.download_target(url)?;

        if target.exists() {
            info!("Dataset already downloaded: {}", target.display());
            return Ok(target);
        }

        info!("Downloading dataset from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download dataset from {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error {} while downloading {}", response.status(), url));
        }

        let body = response.bytes().await?;
        write_atomically(&target, &body).await?;

        info!("Saved {} bytes to {}", body.len(), target.display());
        Ok(target)
    }
}

/// Writes through a `.part` sibling, then renames it into place.
async fn write_atomically(target: &Path, body: &[u8]) -> Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| anyhow!("Download target has no parent directory: {}", target.display()))?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;

    let mut part_name = target.as_os_str().to_os_string();
    part_name.push(".part");
    let part = PathBuf::from(part_name);

    tokio::fs::write(&part, body)
        .await
        .with_context(|| format!("Failed to write dataset file: {}", part.display()))?;
    tokio::fs::rename(&part, target)
        .await
        .with_context(|| format!("Failed to move {} into place", part.display()))?;

    Ok(())
}

/// Finds the table to read: the first CSV in path order, otherwise the first JSON file.
pub fn locate_table(base: &Path) -> Result<(PathBuf, TableFormat)> {
    if base.is_file() {
        return TableFormat::from_path(base)
            .map(|format| (base.to_path_buf(), format))
            .ok_or_else(|| anyhow!("Not a CSV/JSON file: {}", base.display()));
    }

    let mut first_json = None;
    for entry in WalkDir::new(base).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", base.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        match TableFormat::from_path(entry.path()) {
            Some(TableFormat::Csv) => return Ok((entry.into_path(), TableFormat::Csv)),
            Some(TableFormat::Json) if first_json.is_none() => {
                first_json = Some(entry.into_path());
            }
            _ => {}
        }
    }

    first_json
        .map(|path| (path, TableFormat::Json))
        .ok_or_else(|| anyhow!("No CSV/JSON file found in dataset path: {}", base.display()))
}

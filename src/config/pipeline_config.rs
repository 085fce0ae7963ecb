use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_DATASET_ID: &str = "asaniczka/amazon-products-dataset-2023-1-4m-products";
pub const DEFAULT_OUTPUT_PATH: &str = "backend/data/amazon.sampled.json";
pub const DEFAULT_SAMPLE_LIMIT: usize = 1000;
pub const DEFAULT_CACHE_ENV: &str = "KAGGLEHUB_CACHE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub dataset: DatasetSection,
    #[serde(default)]
    pub sampling: SamplingSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSection {
    /// Either an `owner/name` dataset id or an http(s) URL to a data file.
    pub id: String,
    /// Bypasses acquisition entirely when set.
    pub local_path: Option<String>,
    pub cache_dir: Option<String>,
    // Optional environment variable name for the cache directory
    pub env_cache_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSection {
    pub limit: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SAMPLE_LIMIT,
            seed: crate::processor::DEFAULT_SAMPLE_SEED,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetSection {
                id: DEFAULT_DATASET_ID.to_string(),
                local_path: None,
                cache_dir: None,
                env_cache_dir: None,
            },
            sampling: SamplingSection::default(),
            output: OutputSection::default(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub limit: Option<usize>,
    pub output: Option<String>,
    pub dataset: Option<String>,
    pub local_path: Option<String>,
}

impl PipelineConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config file: {}", path))?;

        let config: PipelineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse pipeline config file: {}", path))?;

        Ok(config)
    }

    /// Like `from_file`, but falls back to defaults when the file does not exist.
    pub fn from_file_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            warn!("Config file not found at {}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(limit) = overrides.limit {
            self.sampling.limit = limit;
        }
        if let Some(output) = overrides.output {
            self.output.path = output;
        }
        if let Some(dataset) = overrides.dataset {
            self.dataset.id = dataset;
        }
        if overrides.local_path.is_some() {
            self.dataset.local_path = overrides.local_path;
        }
    }

    /// Cache root: explicit setting, then the environment, then `~/.cache/kagglehub`.
    pub fn get_cache_dir(&self) -> PathBuf {
        if let Some(dir) = self.dataset.cache_dir.as_deref().filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }

        let cache_var = self.dataset.env_cache_dir.as_deref().unwrap_or(DEFAULT_CACHE_ENV);
        if let Ok(dir) = env::var(cache_var) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        Path::new(&home).join(".cache").join("kagglehub")
    }

    pub fn validate(&self) -> Result<()> {
        let has_local = self
            .dataset
            .local_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());

        if !has_local && self.dataset.id.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Dataset id cannot be empty when no local path is given"
            ));
        }

        if self.output.path.trim().is_empty() {
            return Err(anyhow::anyhow!("Output path cannot be empty"));
        }

        Ok(())
    }
}

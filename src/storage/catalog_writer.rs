use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::CanonicalProduct;

/// Writes the normalized catalog as one pretty-printed JSON array.
pub struct CatalogWriter {
    path: PathBuf,
}

impl CatalogWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CatalogWriter {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, products: &[CanonicalProduct]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(products)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write catalog file: {}", self.path.display()))?;

        info!("Wrote {} products to {}", products.len(), self.path.display());
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Vec<CanonicalProduct>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let products = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
        Ok(products)
    }
}

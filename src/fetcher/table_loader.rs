use anyhow::{anyhow, Context, Result};
use polars::prelude::*;
use serde_json::{Number, Value};
use std::path::Path;
use tracing::{info, warn};

use crate::fetcher::TableFormat;
use crate::models::RawRow;
use crate::processor::RowSampler;

/// Reads a dataset file into raw rows, applying the sampler on the way.
pub struct TableLoader {
    sampler: RowSampler,
}

impl TableLoader {
    pub fn new(sampler: RowSampler) -> Self {
        TableLoader { sampler }
    }

    pub fn load(&self, path: &Path, format: TableFormat) -> Result<Vec<RawRow>> {
        info!("Reading file: {}", path.display());
        let rows = match format {
            TableFormat::Csv => {
                let df = read_csv(path)?;
                info!("Loaded CSV with {} rows and {} columns", df.height(), df.width());
                let indices = self.sampler.sample_indices(df.height());
                dataframe_rows(&df, &indices)?
            }
            TableFormat::Json => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
                let rows = parse_json_rows(&content)
                    .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;
                info!("Loaded JSON with {} rows", rows.len());
                self.sampler.sample(rows)
            }
        };

        Ok(rows)
    }
}

pub fn read_csv(path: &Path) -> Result<DataFrame> {
    // Full-file inference so late mixed-type columns fall back to strings.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;
    Ok(df)
}

/// First `n_rows` rows of a CSV file, for inspection.
pub fn read_csv_head(path: &Path, n_rows: usize) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(n_rows))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Column names of a CSV file without loading its rows.
pub fn csv_columns(path: &Path) -> Result<Vec<String>> {
    let df = read_csv_head(path, 1)?;
    Ok(df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect())
}

/// Converts the selected rows of a DataFrame into raw rows, in index order.
pub fn dataframe_rows(df: &DataFrame, indices: &[usize]) -> Result<Vec<RawRow>> {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut rows = Vec::with_capacity(indices.len());
    for &idx in indices {
        let mut row = RawRow::new();
        for (name, column) in names.iter().zip(columns) {
            let value = column
                .get(idx)
                .map_err(|e| anyhow!("Failed to read row {} column {}: {}", idx, name, e))?;
            row.insert(name.clone(), any_value_to_json(value));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn any_value_to_json(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int32(n) => Value::from(n),
        AnyValue::Int64(n) => Value::from(n),
        AnyValue::UInt32(n) => Value::from(n),
        AnyValue::UInt64(n) => Value::from(n),
        AnyValue::Float32(f) => float_value(f64::from(f)),
        AnyValue::Float64(f) => float_value(f),
        other => Value::String(other.to_string()),
    }
}

// NaN and infinities have no JSON form; they count as missing.
fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Parses either a JSON array of objects or JSON Lines.
pub fn parse_json_rows(content: &str) -> Result<Vec<RawRow>> {
    let trimmed = content.trim_start();

    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        serde_json::Deserializer::from_str(trimmed)
            .into_iter::<Value>()
            .collect::<Result<_, _>>()?
    };

    let mut rows = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for value in values {
        match value {
            Value::Object(map) => rows.push(map),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} non-object entries in JSON dataset", skipped);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::DEFAULT_SAMPLE_SEED;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_parse_json_lines_and_arrays() {
        let lines = "{\"title\": \"A\", \"images\": [\"http://x.com/a.jpg\"]}\n\n{\"title\": \"B\"}\n";
        let rows = parse_json_rows(lines).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["images"], json!(["http://x.com/a.jpg"]));

        let array = "[{\"title\": \"A\"}, 5, {\"title\": \"C\"}]";
        let rows = parse_json_rows(array).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["title"], json!("C"));

        assert!(parse_json_rows("{\"title\": ").is_err());
    }

    #[test]
    fn test_float_values() {
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(2.5), json!(2.5));
    }

    #[test]
    fn test_load_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        fs::write(
            &path,
            "title,price,stars,image_url\nWireless Mouse,$25.00,4.5,http://x.com/a.jpg\nDesk Lamp,,3.0,\n",
        )
        .unwrap();

        let loader = TableLoader::new(RowSampler::new(0, DEFAULT_SAMPLE_SEED));
        let rows = loader.load(&path, TableFormat::Csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], json!("Wireless Mouse"));
        assert_eq!(rows[0]["price"], json!("$25.00"));
        assert_eq!(rows[0]["stars"], json!(4.5));
        assert_eq!(rows[1]["price"], Value::Null);

        assert_eq!(
            csv_columns(&path).unwrap(),
            vec!["title", "price", "stars", "image_url"]
        );
    }

    #[test]
    fn test_load_json_applies_sampling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let rows: Vec<Value> = (0..20).map(|i| json!({ "title": format!("P{}", i) })).collect();
        fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();

        let loader = TableLoader::new(RowSampler::new(5, DEFAULT_SAMPLE_SEED));
        assert_eq!(loader.load(&path, TableFormat::Json).unwrap().len(), 5);
    }
}

use anyhow::{anyhow, Result};
use catalog_pipeline::fetcher::{
    csv_columns, dataframe_rows, locate_table, parse_json_rows, read_csv_head, TableFormat,
};
use catalog_pipeline::models::RawRow;
use catalog_pipeline::processor::{present_aliases, ProductNormalizer, ALL_CANDIDATES};
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    let base = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Usage: debug_columns <dataset file or folder>"))?;

    println!("=== DEBUGGING COLUMN MAPPING ===\n");

    let (path, format) = locate_table(&base)?;
    println!("1. Table: {} ({:?})", path.display(), format);

    let (columns, sample_rows): (Vec<String>, Vec<RawRow>) = match format {
        TableFormat::Csv => {
            let head = read_csv_head(&path, 5)?;
            let indices: Vec<usize> = (0..head.height()).collect();
            (csv_columns(&path)?, dataframe_rows(&head, &indices)?)
        }
        TableFormat::Json => {
            let rows = parse_json_rows(&std::fs::read_to_string(&path)?)?;
            let columns: BTreeSet<String> = rows.iter().flat_map(|r| r.keys().cloned()).collect();
            (columns.into_iter().collect(), rows.into_iter().take(5).collect())
        }
    };

    println!("\n2. Columns ({}):", columns.len());
    println!("   {:?}", columns);

    println!("\n3. Candidate columns per attribute:");
    for candidates in ALL_CANDIDATES {
        let present = present_aliases(&columns, &candidates);
        if present.is_empty() {
            println!("   {:<14} -> ⚠️  none of {:?}", candidates.attribute, candidates.aliases);
        } else {
            println!("   {:<14} -> {:?}", candidates.attribute, present);
        }
    }

    if !sample_rows.is_empty() {
        println!("\n4. First {} rows through the normalizer:", sample_rows.len());
        let normalizer = ProductNormalizer::new();
        for (i, row) in sample_rows.iter().enumerate() {
            match normalizer.normalize_row(row) {
                Ok(product) => println!("   Row {}: ✅ {} ({}, {})", i, product.name, product.price, product.category),
                Err(reason) => println!("   Row {}: skipped ({})", i, reason),
            }
        }
    }

    Ok(())
}

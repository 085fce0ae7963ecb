use anyhow::Result;
use catalog_pipeline::models::{Category, DEFAULT_STOCK, MAX_IMAGES};
use catalog_pipeline::storage::CatalogWriter;
use std::collections::BTreeMap;
use std::env;

const DEFAULT_CATALOG_PATH: &str = "backend/data/amazon.sampled.json";

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());

    let products = CatalogWriter::read(&path)?;
    println!("Analyzing catalog file {}...\n", path);
    println!("Total number of products: {}", products.len());

    if products.is_empty() {
        println!("⚠️  Catalog is empty");
        return Ok(());
    }

    println!("\n=== CATEGORY BREAKDOWN ===");
    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for product in &products {
        *by_category.entry(product.category.as_str()).or_default() += 1;
    }
    for (category, count) in &by_category {
        println!("{}: {}", category, count);
    }
    let defaulted = by_category
        .get(Category::Electronics.as_str())
        .copied()
        .unwrap_or_default();
    println!("(Electronics includes rows whose category matched no keyword: {})", defaulted);

    println!("\n=== IMAGE ANALYSIS ===");
    let total_images: usize = products.iter().map(|p| p.images.len()).sum();
    let capped = products.iter().filter(|p| p.images.len() == MAX_IMAGES).count();
    println!("Total image URLs: {}", total_images);
    println!(
        "Average images per product: {:.2}",
        total_images as f64 / products.len() as f64
    );
    println!("Products at the {} image cap: {}", MAX_IMAGES, capped);

    println!("\n=== STOCK, PRICE & REVIEW ANALYSIS ===");
    let default_stock = products.iter().filter(|p| p.stock == DEFAULT_STOCK).count();
    let unrated = products.iter().filter(|p| p.ratings == 0.0).count();
    let no_reviews = products.iter().filter(|p| p.num_of_reviews == 0).count();
    let no_description = products.iter().filter(|p| p.description.is_empty()).count();
    let min_price = products.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max_price = products.iter().map(|p| p.price).fold(0.0, f64::max);

    println!("Price range: {:.2} - {:.2}", min_price, max_price);
    println!("Products with stock {} (default): {}", DEFAULT_STOCK, default_stock);
    println!("Products without ratings: {}", unrated);
    println!("Products without reviews: {}", no_reviews);
    println!("Products without description: {}", no_description);

    Ok(())
}

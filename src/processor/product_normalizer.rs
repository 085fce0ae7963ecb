use crate::models::{
    CanonicalProduct, RawRow, DEFAULT_STOCK, MAX_DESCRIPTION_CHARS, MAX_NAME_CHARS,
};
use crate::processor::category_normalizer::CategoryNormalizer;
use crate::processor::field_resolver::{
    first_non_empty, CATEGORY_CANDIDATES, DESCRIPTION_CANDIDATES, NAME_CANDIDATES,
    PRICE_CANDIDATES, RATING_CANDIDATES, REVIEW_COUNT_CANDIDATES, STOCK_CANDIDATES,
};
use crate::processor::image_extractor::ImageExtractor;
use crate::processor::value_coercer::{coerce_count, coerce_price, coerce_rating, truncate_chars};
use thiserror::Error;
use tracing::{debug, info};

/// Why a row was left out of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("no usable name column")]
    MissingName,
    #[error("price missing or not parseable")]
    InvalidPrice,
    #[error("no http(s) image urls")]
    NoImages,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub total: usize,
    pub accepted: usize,
    pub missing_name: usize,
    pub invalid_price: usize,
    pub no_images: usize,
}

impl NormalizeReport {
    pub fn rejected(&self) -> usize {
        self.missing_name + self.invalid_price + self.no_images
    }

    fn record(&mut self, outcome: &Result<CanonicalProduct, RejectReason>) {
        self.total += 1;
        match outcome {
            Ok(_) => self.accepted += 1,
            Err(RejectReason::MissingName) => self.missing_name += 1,
            Err(RejectReason::InvalidPrice) => self.invalid_price += 1,
            Err(RejectReason::NoImages) => self.no_images += 1,
        }
    }
}

/// Turns raw dataset rows into catalog records, dropping rows that fail the
/// name, price and image checks.
pub struct ProductNormalizer {
    categories: CategoryNormalizer,
    images: ImageExtractor,
}

impl ProductNormalizer {
    pub fn new() -> Self {
        ProductNormalizer {
            categories: CategoryNormalizer::new(),
            images: ImageExtractor::new(),
        }
    }

    pub fn normalize_row(&self, row: &RawRow) -> Result<CanonicalProduct, RejectReason> {
        let name = first_non_empty(row, &NAME_CANDIDATES)
            .and_then(|v| v.scalar_text())
            .filter(|n| !n.is_empty())
            .ok_or(RejectReason::MissingName)?;

        let price = coerce_price(first_non_empty(row, &PRICE_CANDIDATES))
            .ok_or(RejectReason::InvalidPrice)?;

        let images = self.images.extract(row);
        if images.is_empty() {
            return Err(RejectReason::NoImages);
        }

        let description = first_non_empty(row, &DESCRIPTION_CANDIDATES)
            .and_then(|v| v.joined_text())
            .unwrap_or_default();

        let category_text =
            first_non_empty(row, &CATEGORY_CANDIDATES).and_then(|v| v.joined_text());
        let category = self.categories.normalize(category_text.as_deref());

        let stock = coerce_count(first_non_empty(row, &STOCK_CANDIDATES))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_STOCK);
        let ratings = coerce_rating(first_non_empty(row, &RATING_CANDIDATES)).unwrap_or(0.0);
        let num_of_reviews =
            coerce_count(first_non_empty(row, &REVIEW_COUNT_CANDIDATES)).unwrap_or(0);

        Ok(CanonicalProduct {
            name: truncate_chars(&name, MAX_NAME_CHARS),
            price,
            description: truncate_chars(&description, MAX_DESCRIPTION_CHARS),
            category,
            stock,
            images,
            ratings,
            num_of_reviews,
        })
    }

    /// Normalizes rows in order. Rejected rows are counted, never treated as errors.
    pub fn normalize_rows(&self, rows: &[RawRow]) -> (Vec<CanonicalProduct>, NormalizeReport) {
        let mut report = NormalizeReport::default();
        let mut products = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let outcome = self.normalize_row(row);
            report.record(&outcome);
            match outcome {
                Ok(product) => products.push(product),
                Err(reason) => debug!("Skipping row {}: {}", index, reason),
            }
        }

        info!(
            "Normalization summary: {} accepted, {} skipped out of {} total (missing name: {}, bad price: {}, no images: {})",
            report.accepted,
            report.rejected(),
            report.total,
            report.missing_name,
            report.invalid_price,
            report.no_images
        );

        (products, report)
    }
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use serde_json::{json, Value};

    fn row(value: Value) -> RawRow {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_end_to_end_row() {
        let normalizer = ProductNormalizer::new();
        let product = normalizer
            .normalize_row(&row(json!({
                "title": "Wireless Mouse",
                "price": "$25.00",
                "category": "Computer Accessories",
                "image_url": "http://x.com/a.jpg"
            })))
            .unwrap();

        assert_eq!(
            product,
            CanonicalProduct {
                name: "Wireless Mouse".to_string(),
                price: 25.0,
                description: String::new(),
                category: Category::Electronics,
                stock: 50,
                images: vec!["http://x.com/a.jpg".to_string()],
                ratings: 0.0,
                num_of_reviews: 0,
            }
        );
    }

    #[test]
    fn test_rejections() {
        let normalizer = ProductNormalizer::new();

        let no_name = row(json!({ "price": "10", "image": "http://x.com/a.jpg" }));
        assert_eq!(normalizer.normalize_row(&no_name), Err(RejectReason::MissingName));

        let list_name = row(json!({ "title": ["A"], "price": "10", "image": "http://x.com/a.jpg" }));
        assert_eq!(normalizer.normalize_row(&list_name), Err(RejectReason::MissingName));

        let bad_price = row(json!({ "name": "Lamp", "price": "N/A", "image": "http://x.com/a.jpg" }));
        assert_eq!(normalizer.normalize_row(&bad_price), Err(RejectReason::InvalidPrice));

        let null_price = row(json!({ "name": "Lamp", "price": null, "list_price": "  " }));
        assert_eq!(normalizer.normalize_row(&null_price), Err(RejectReason::InvalidPrice));

        let no_images = row(json!({ "name": "Lamp", "price": 3, "image": "lamp.jpg" }));
        assert_eq!(normalizer.normalize_row(&no_images), Err(RejectReason::NoImages));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let normalizer = ProductNormalizer::new();
        let product = normalizer
            .normalize_row(&row(json!({
                "name": "Yoga Mat",
                "current_price": 19.99,
                "main_category": "Sports & Outdoors",
                "images": ["https://x.com/mat.jpg"],
                "stock": "  ",
                "rating": "n/a",
                "review_count": "lots"
            })))
            .unwrap();

        assert_eq!(product.category, Category::Sports);
        assert_eq!(product.stock, 50);
        assert_eq!(product.ratings, 0.0);
        assert_eq!(product.num_of_reviews, 0);

        let product = normalizer
            .normalize_row(&row(json!({
                "name": "Yoga Mat",
                "price": "19.99",
                "images": ["https://x.com/mat.jpg"],
                "stock": "abc",
                "rating": null
            })))
            .unwrap();
        assert_eq!(product.stock, 50);
        assert_eq!(product.ratings, 0.0);
    }

    #[test]
    fn test_blank_review_counts_default_to_zero() {
        let normalizer = ProductNormalizer::new();
        let product = normalizer
            .normalize_row(&row(json!({
                "name": "Desk Lamp",
                "price": "12.00",
                "images": ["https://x.com/lamp.jpg"],
                "review_count": "",
                "num_reviews": null
            })))
            .unwrap();
        assert_eq!(product.num_of_reviews, 0);

        let product = normalizer
            .normalize_row(&row(json!({
                "name": "Desk Lamp",
                "price": "12.00",
                "images": ["https://x.com/lamp.jpg"],
                "review_count": "   ",
                "num_reviews": null,
                "reviews": "15"
            })))
            .unwrap();
        assert_eq!(product.num_of_reviews, 15);
    }

    #[test]
    fn test_parsed_optional_fields() {
        let normalizer = ProductNormalizer::new();
        let product = normalizer
            .normalize_row(&row(json!({
                "product_name": "Running Shoes",
                "price_num": "89.50",
                "features": ["Breathable mesh", "Rubber sole"],
                "categories": ["Clothing, Shoes & Jewelry", "Men"],
                "images": ["https://x.com/shoe.jpg"],
                "stock": "7",
                "stars": 4.4,
                "reviews": 120,
                "num_reviews": 300
            })))
            .unwrap();

        assert_eq!(product.description, "Breathable mesh Rubber sole");
        assert_eq!(product.category, Category::Clothing);
        assert_eq!(product.stock, 7);
        assert_eq!(product.ratings, 4.4);
        assert_eq!(product.num_of_reviews, 300);
    }

    #[test]
    fn test_length_caps_truncate() {
        let normalizer = ProductNormalizer::new();
        let long_name = "N".repeat(300);
        let long_description = "d".repeat(5000);
        let product = normalizer
            .normalize_row(&row(json!({
                "title": long_name,
                "description": long_description,
                "price": "1",
                "image": "http://x.com/a.jpg"
            })))
            .unwrap();

        assert_eq!(product.name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(product.description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_normalize_rows_keeps_order_and_counts() {
        let normalizer = ProductNormalizer::new();
        let rows = vec![
            row(json!({ "title": "B", "price": "2", "image": "http://x.com/b.jpg" })),
            row(json!({ "title": "", "price": "2", "image": "http://x.com/z.jpg" })),
            row(json!({ "title": "A", "price": "1", "image": "http://x.com/a.jpg" })),
            row(json!({ "title": "C", "price": "free", "image": "http://x.com/c.jpg" })),
            row(json!({ "title": "D", "price": "4" })),
        ];

        let (products, report) = normalizer.normalize_rows(&rows);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(
            report,
            NormalizeReport {
                total: 5,
                accepted: 2,
                missing_name: 1,
                invalid_price: 1,
                no_images: 1,
            }
        );
        assert_eq!(report.rejected(), 3);
    }
}

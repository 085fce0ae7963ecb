use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One row of a source dataset, keyed by whatever column names that dataset uses.
pub type RawRow = Map<String, Value>;

pub const MAX_NAME_CHARS: usize = 120;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_IMAGES: usize = 5;
pub const DEFAULT_STOCK: u32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Electronics,
    Clothing,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    Sports,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::HomeAndGarden => "Home & Garden",
            Category::Sports => "Sports",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The catalog record written to the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub stock: u32,
    pub images: Vec<String>,
    pub ratings: f64,
    #[serde(rename = "numOfReviews")]
    pub num_of_reviews: u64,
}

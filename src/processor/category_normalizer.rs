use crate::models::Category;

/// Keyword table checked in declaration order; the first substring hit wins.
pub const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("electronics", Category::Electronics),
    ("electronic", Category::Electronics),
    ("phone", Category::Electronics),
    ("mobile", Category::Electronics),
    ("laptop", Category::Electronics),
    ("computer", Category::Electronics),
    ("clothes", Category::Clothing),
    ("clothing", Category::Clothing),
    ("fashion", Category::Clothing),
    ("apparel", Category::Clothing),
    ("home & garden", Category::HomeAndGarden),
    ("home and garden", Category::HomeAndGarden),
    ("home", Category::HomeAndGarden),
    ("garden", Category::HomeAndGarden),
    ("sports", Category::Sports),
    ("sport", Category::Sports),
];

/// Maps free-text category labels onto the closed catalog categories.
///
/// Anything that matches no keyword, including empty input, lands in
/// `Category::Electronics`.
pub struct CategoryNormalizer {
    keywords: &'static [(&'static str, Category)],
}

impl CategoryNormalizer {
    pub fn new() -> Self {
        CategoryNormalizer {
            keywords: CATEGORY_KEYWORDS,
        }
    }

    pub fn normalize(&self, text: Option<&str>) -> Category {
        let lowered = match text {
            Some(t) if !t.trim().is_empty() => t.to_lowercase(),
            _ => return Category::default(),
        };

        self.keywords
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or_default()
    }
}

impl Default for CategoryNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

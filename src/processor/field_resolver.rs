use crate::models::RawRow;
use serde_json::Value;

/// Ordered column aliases for one canonical attribute. Earlier aliases win.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSet {
    pub attribute: &'static str,
    pub aliases: &'static [&'static str],
}

pub const NAME_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "name",
    aliases: &["title", "name", "product_name"],
};

pub const DESCRIPTION_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "description",
    aliases: &["description", "feature", "features", "about", "summary"],
};

pub const PRICE_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "price",
    aliases: &["price", "current_price", "list_price", "price_num"],
};

pub const CATEGORY_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "category",
    aliases: &["category", "categories", "main_category", "type"],
};

pub const STOCK_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "stock",
    aliases: &["stock"],
};

pub const RATING_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "ratings",
    aliases: &["rating", "ratings", "stars"],
};

pub const REVIEW_COUNT_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "numOfReviews",
    aliases: &["review_count", "num_reviews", "reviews"],
};

// Image columns are additive rather than first-match, see `ImageExtractor`.
pub const IMAGE_CANDIDATES: CandidateSet = CandidateSet {
    attribute: "images",
    aliases: &[
        "images",
        "imageURLs",
        "imageURLHighRes",
        "image_url",
        "main_image_url",
        "imUrl",
        "image",
        "picture",
    ],
};

pub const ALL_CANDIDATES: [CandidateSet; 8] = [
    NAME_CANDIDATES,
    PRICE_CANDIDATES,
    DESCRIPTION_CANDIDATES,
    CATEGORY_CANDIDATES,
    STOCK_CANDIDATES,
    IMAGE_CANDIDATES,
    RATING_CANDIDATES,
    REVIEW_COUNT_CANDIDATES,
];

/// A value picked by the resolver. Strings come back already trimmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Text(&'a str),
    Raw(&'a Value),
}

impl<'a> Resolved<'a> {
    /// Text form of a scalar value. Lists and objects have none.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Resolved::Text(s) => Some((*s).to_string()),
            Resolved::Raw(Value::Number(n)) => Some(n.to_string()),
            Resolved::Raw(Value::Bool(b)) => Some(b.to_string()),
            Resolved::Raw(_) => None,
        }
    }

    /// Like `scalar_text`, but also joins the string elements of a list with spaces.
    pub fn joined_text(&self) -> Option<String> {
        match self {
            Resolved::Raw(Value::Array(items)) => {
                let parts: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
            other => other.scalar_text(),
        }
    }

    /// Stringified form used by the numeric coercers.
    pub fn to_string_lossy(&self) -> String {
        match self {
            Resolved::Text(s) => (*s).to_string(),
            Resolved::Raw(Value::String(s)) => s.clone(),
            Resolved::Raw(other) => other.to_string(),
        }
    }
}

/// Returns the first candidate column that holds a usable value.
///
/// A column is skipped when it is missing, `null`, or a string that is empty
/// after trimming. Numbers, booleans and lists are returned untouched.
pub fn first_non_empty<'a>(row: &'a RawRow, candidates: &CandidateSet) -> Option<Resolved<'a>> {
    candidates.aliases.iter().find_map(|alias| match row.get(*alias)? {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then_some(Resolved::Text(trimmed))
        }
        other => Some(Resolved::Raw(other)),
    })
}

/// Lists which aliases of a candidate set appear among the given column names.
pub fn present_aliases<'a>(columns: &[String], candidates: &'a CandidateSet) -> Vec<&'a str> {
    candidates
        .aliases
        .iter()
        .copied()
        .filter(|alias| columns.iter().any(|c| c == alias))
        .collect()
}

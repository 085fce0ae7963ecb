use crate::models::{RawRow, MAX_IMAGES};
use crate::processor::field_resolver::{CandidateSet, IMAGE_CANDIDATES};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static URL_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,|]+").expect("valid delimiter pattern"));

/// Shape of a single image column value.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageCandidate<'a> {
    Sequence(&'a [Value]),
    JsonArrayText(&'a str),
    UrlText(&'a str),
    DelimitedText(&'a str),
    Other,
}

impl<'a> ImageCandidate<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => ImageCandidate::Sequence(items),
            Value::String(s) => {
                let s = s.trim();
                if s.starts_with('[') && s.ends_with(']') {
                    ImageCandidate::JsonArrayText(s)
                } else if has_http_scheme(s) && !has_url_delimiter(s) {
                    ImageCandidate::UrlText(s)
                } else {
                    ImageCandidate::DelimitedText(s)
                }
            }
            _ => ImageCandidate::Other,
        }
    }

    /// Raw strings this candidate contributes to the pool, before URL filtering.
    pub fn expand(&self) -> Vec<String> {
        match self {
            ImageCandidate::Sequence(items) => strings_of(items),
            ImageCandidate::JsonArrayText(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => strings_of(&items),
                // Malformed JSON contributes nothing.
                _ => Vec::new(),
            },
            ImageCandidate::UrlText(s) => vec![(*s).to_string()],
            ImageCandidate::DelimitedText(s) => split_urls(s),
            ImageCandidate::Other => Vec::new(),
        }
    }
}

fn strings_of(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str())
        .map(|s| s.trim().to_string())
        .collect()
}

fn split_urls(text: &str) -> Vec<String> {
    URL_DELIMITERS
        .split(text)
        .filter(|token| has_http_scheme(token))
        .map(str::to_string)
        .collect()
}

fn has_http_scheme(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

fn has_url_delimiter(text: &str) -> bool {
    text.chars().any(|c| c.is_whitespace() || c == ',' || c == '|')
}

/// True for strings that parse as absolute http/https URLs with a host.
pub fn is_http_url(text: &str) -> bool {
    if !has_http_scheme(text) || text.chars().any(char::is_whitespace) {
        return false;
    }
    match Url::parse(text) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Pools image URLs from every image column of a row.
pub struct ImageExtractor {
    candidates: CandidateSet,
    max_images: usize,
}

impl ImageExtractor {
    pub fn new() -> Self {
        ImageExtractor {
            candidates: IMAGE_CANDIDATES,
            max_images: MAX_IMAGES,
        }
    }

    pub fn extract(&self, row: &RawRow) -> Vec<String> {
        let pool = self
            .candidates
            .aliases
            .iter()
            .filter_map(|alias| row.get(*alias))
            .filter(|value| !value.is_null())
            .flat_map(|value| ImageCandidate::classify(value).expand());

        let mut seen = HashSet::new();
        let mut images = Vec::new();
        for url in pool {
            if images.len() == self.max_images {
                break;
            }
            if is_http_url(&url) && seen.insert(url.clone()) {
                images.push(url);
            }
        }
        images
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

//! Price extraction from scraped page text.

pub mod bounds;
pub mod extractor;
pub mod normalize;
pub mod patterns;
pub mod rules;
pub mod selection;
pub mod structured;

pub use bounds::PriceBounds;
pub use extractor::{extract_prices, PriceExtractor};
pub use normalize::normalize_price;
pub use patterns::DEFAULT_RULES;
pub use rules::{PatternRule, RuleCategory, RuleSet};
pub use selection::{select_price, SelectionPolicy};
pub use structured::extract_structured_price;

use serde::Serialize;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A substring matched by one rule, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCandidate<'t> {
    /// Index of the producing rule in its rule set.
    pub rule_index: usize,
    /// The numeral as it appeared in the text.
    pub matched_text: &'t str,
    /// Byte offset of `matched_text` in the source text.
    pub offset: usize,
}

/// A normalized price together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceCandidate {
    /// Normalized value, always inside the bounds it was extracted with.
    pub value: f64,
    /// Index of the producing rule (lower is higher priority).
    pub rule_index: usize,
    /// Category of the producing rule.
    pub category: RuleCategory,
    /// Raw numeral text.
    pub matched_text: String,
    /// Byte offset of the numeral in the source text.
    pub offset: usize,
}

impl PriceCandidate {
    pub fn from_raw(raw: RawCandidate<'_>, value: f64, category: RuleCategory) -> Self {
        Self {
            value,
            rule_index: raw.rule_index,
            category,
            matched_text: raw.matched_text.to_string(),
            offset: raw.offset,
        }
    }
}

//! Rule-based price extraction.

use tracing::{debug, trace};

use super::bounds::PriceBounds;
use super::normalize::normalize_price;
use super::patterns::DEFAULT_RULES;
use super::rules::RuleSet;
use super::{FieldExtractor, PriceCandidate};

/// Run every rule of `rules` over the whole of `text`.
///
/// Candidates are returned in rule order, then in text order within a rule.
/// Only values accepted by [`normalize_price`] and contained in `bounds`
/// are kept. Equal values found by several rules are all reported.
pub fn extract_prices(text: &str, rules: &RuleSet, bounds: PriceBounds) -> Vec<PriceCandidate> {
    let mut accepted = Vec::new();

    for (rule_index, rule) in rules.iter().enumerate() {
        let raw = rule.candidates(rule_index, text);
        if raw.is_empty() {
            continue;
        }

        debug!(
            "Rule {} ({} {:?}) matched {} times",
            rule_index,
            rule.category(),
            rule.key(),
            raw.len()
        );

        for candidate in raw {
            match normalize_price(candidate.matched_text) {
                Some(value) if bounds.contains(value) => {
                    accepted.push(PriceCandidate::from_raw(candidate, value, rule.category()));
                }
                Some(value) => {
                    trace!("Dropping {} outside [{}, {}]", value, bounds.low, bounds.high);
                }
                None => {
                    trace!("Rejected numeral {:?}", candidate.matched_text);
                }
            }
        }
    }

    if accepted.is_empty() {
        debug!("No price candidates found in {} bytes of text", text.len());
    }

    accepted
}

/// Price extractor holding a rule set and the bound for its catalog domain.
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    rules: RuleSet,
    bounds: PriceBounds,
}

impl PriceExtractor {
    /// Create an extractor with the default rules and the retail bound.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
            bounds: PriceBounds::RETAIL,
        }
    }

    /// Replace the rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the bound.
    pub fn with_bounds(mut self, bounds: PriceBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn bounds(&self) -> PriceBounds {
        self.bounds
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = PriceCandidate;

    /// First candidate of the highest-priority matching rule.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        extract_prices(text, &self.rules, self.bounds)
    }
}

//! Common pattern fragments and the default price rule table.

use lazy_static::lazy_static;

use super::rules::{PatternRule, RuleSet};
use crate::error::RuleError;

/// A price numeral: leading non-zero digit, then digits where every `.` or
/// `,` sits between two digits. Separators are resolved by
/// [`normalize_price`](super::normalize_price). Always capture group 1.
pub const NUMERAL: &str = r"([1-9](?:[0-9]|[.,][0-9])*)";

/// Start of a numeric token, for rules with no anchoring prefix.
pub const TOKEN_START: &str = r"(?:^|[^\w.,])";

pub const CURRENCY_SYMBOLS: &[&str] = &["₹", "$", "€", "£"];

pub const CURRENCY_CODES: &[&str] = &["Rs", "INR", "USD"];

pub const JSON_PRICE_KEYS: &[&str] = &[
    "price",
    "sellingPrice",
    "currentPrice",
    "salePrice",
    "finalPrice",
    "discountedPrice",
    "listPrice",
    "mrp",
];

pub const PRICE_ATTRIBUTES: &[&str] = &["data-price", "data-selling-price", "data-current-price"];

pub const ASSIGNMENT_NAMES: &[&str] = &["price", "currentPrice", "sellingPrice", "productPrice"];

pub const SUFFIX_KEYWORDS: &[&str] = &["only", "OFF", "offer", "discount", "/-"];

pub const PREFIX_KEYWORDS: &[&str] = &["was", "originally", "MRP", "marked", "price"];

pub const SAVINGS_KEYWORDS: &[&str] = &["you save", "save"];

lazy_static! {
    /// The default rule table, built once and shared read-only.
    pub static ref DEFAULT_RULES: RuleSet =
        default_rule_set().expect("default price rules must compile");
}

/// Build the default rule table in priority order.
pub fn default_rule_set() -> Result<RuleSet, RuleError> {
    let mut rules = Vec::new();

    for symbol in CURRENCY_SYMBOLS {
        rules.push(PatternRule::currency_symbol(symbol)?);
    }
    for code in CURRENCY_CODES {
        rules.push(PatternRule::currency_code(code)?);
    }
    for key in JSON_PRICE_KEYS {
        rules.push(PatternRule::json_key(key)?);
    }
    for name in PRICE_ATTRIBUTES {
        rules.push(PatternRule::attribute(name)?);
    }
    rules.push(PatternRule::context_suffix(SUFFIX_KEYWORDS)?);
    rules.push(PatternRule::context_prefix(PREFIX_KEYWORDS)?);

    for name in ASSIGNMENT_NAMES {
        rules.push(PatternRule::assignment(name)?);
    }
    rules.push(PatternRule::context_prefix(SAVINGS_KEYWORDS)?);
    rules.push(PatternRule::grouping()?);

    Ok(RuleSet::new(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::RuleCategory;

    #[test]
    fn test_default_rule_order() {
        let categories: Vec<RuleCategory> = DEFAULT_RULES.iter().map(|r| r.category()).collect();

        assert_eq!(categories.first(), Some(&RuleCategory::CurrencySymbol));
        assert_eq!(categories.last(), Some(&RuleCategory::Grouping));

        // The six primary categories come before the supplementary ones.
        let prefix = categories
            .iter()
            .position(|c| *c == RuleCategory::ContextPrefix)
            .unwrap();
        let assignment = categories
            .iter()
            .position(|c| *c == RuleCategory::Assignment)
            .unwrap();
        assert!(prefix < assignment);
    }

    #[test]
    fn test_categories_first_appear_in_declaration_order() {
        let mut seen: Vec<RuleCategory> = Vec::new();
        for rule in DEFAULT_RULES.iter() {
            if !seen.contains(&rule.category()) {
                seen.push(rule.category());
            }
        }

        assert_eq!(
            seen,
            vec![
                RuleCategory::CurrencySymbol,
                RuleCategory::CurrencyCode,
                RuleCategory::JsonKey,
                RuleCategory::Attribute,
                RuleCategory::ContextSuffix,
                RuleCategory::ContextPrefix,
                RuleCategory::Assignment,
                RuleCategory::Grouping,
            ]
        );
    }

    #[test]
    fn test_default_rule_count() {
        let expected = CURRENCY_SYMBOLS.len()
            + CURRENCY_CODES.len()
            + JSON_PRICE_KEYS.len()
            + PRICE_ATTRIBUTES.len()
            + ASSIGNMENT_NAMES.len()
            + 4;
        assert_eq!(DEFAULT_RULES.len(), expected);
    }
}

//! Pattern rules: one tagged variant per textual context a price appears in.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patterns::{NUMERAL, TOKEN_START};
use super::RawCandidate;
use crate::error::RuleError;

/// Category of a pattern rule, used for reporting and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    CurrencySymbol,
    CurrencyCode,
    JsonKey,
    Attribute,
    ContextSuffix,
    ContextPrefix,
    Assignment,
    Grouping,
}

impl RuleCategory {
    /// Whether the rule anchors on a named price field rather than free text.
    pub fn is_key_bearing(self) -> bool {
        matches!(self, Self::JsonKey | Self::Attribute | Self::Assignment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrencySymbol => "currency-symbol",
            Self::CurrencyCode => "currency-code",
            Self::JsonKey => "json-key",
            Self::Attribute => "attribute",
            Self::ContextSuffix => "context-suffix",
            Self::ContextPrefix => "context-prefix",
            Self::Assignment => "assignment",
            Self::Grouping => "grouping",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One price-locating rule.
///
/// Every variant's expression captures the numeral in group 1.
#[derive(Debug, Clone)]
pub enum PatternRule {
    /// A currency glyph followed by a numeral: `₹1,599`.
    CurrencySymbol { symbol: String, regex: Regex },
    /// A currency code followed by a numeral: `Rs. 2,499`, `INR 500`.
    CurrencyCode { code: String, regex: Regex },
    /// A quoted JSON key followed by a quoted or bare numeral: `"price": 3299`.
    JsonKey { key: String, regex: Regex },
    /// An HTML attribute with a quoted numeral: `data-price="1999"`.
    Attribute { name: String, regex: Regex },
    /// A JavaScript style assignment: `productPrice = 1299`.
    Assignment { name: String, regex: Regex },
    /// A numeral followed by a keyword: `899 only`.
    ContextSuffix { keywords: Vec<String>, regex: Regex },
    /// A keyword, optional colon and rupee glyph, then a numeral: `MRP: ₹1299`.
    ContextPrefix { keywords: Vec<String>, regex: Regex },
    /// A bare grouped numeral: `1,234` or `12,34,567`.
    Grouping { regex: Regex },
}

impl PatternRule {
    pub fn currency_symbol(symbol: &str) -> Result<Self, RuleError> {
        let symbol = non_empty(symbol, "currency symbol")?;
        let regex = compile(symbol, &format!(r"{}\s*{}", regex::escape(symbol), NUMERAL))?;
        Ok(Self::CurrencySymbol {
            symbol: symbol.to_string(),
            regex,
        })
    }

    pub fn currency_code(code: &str) -> Result<Self, RuleError> {
        let code = non_empty(code, "currency code")?;
        let regex = compile(
            code,
            &format!(r"(?i)\b{}\.?\s*{}", regex::escape(code), NUMERAL),
        )?;
        Ok(Self::CurrencyCode {
            code: code.to_string(),
            regex,
        })
    }

    pub fn json_key(key: &str) -> Result<Self, RuleError> {
        let key = non_empty(key, "JSON key")?;
        let regex = compile(
            key,
            &format!(r#"(?i)"{}"\s*:\s*"?{}"#, regex::escape(key), NUMERAL),
        )?;
        Ok(Self::JsonKey {
            key: key.to_string(),
            regex,
        })
    }

    pub fn attribute(name: &str) -> Result<Self, RuleError> {
        let name = non_empty(name, "attribute name")?;
        let regex = compile(
            name,
            &format!(r#"(?i)\b{}\s*=\s*["']{}["']"#, regex::escape(name), NUMERAL),
        )?;
        Ok(Self::Attribute {
            name: name.to_string(),
            regex,
        })
    }

    pub fn assignment(name: &str) -> Result<Self, RuleError> {
        let name = non_empty(name, "variable name")?;
        let regex = compile(
            name,
            &format!(r"(?i)\b{}\s*[=:]\s*{}", regex::escape(name), NUMERAL),
        )?;
        Ok(Self::Assignment {
            name: name.to_string(),
            regex,
        })
    }

    pub fn context_suffix<S: AsRef<str>>(keywords: &[S]) -> Result<Self, RuleError> {
        let (keywords, alternation) = keyword_alternation(keywords)?;
        let regex = compile(
            &alternation,
            &format!(r"(?i){}{}\s*(?:{})", TOKEN_START, NUMERAL, alternation),
        )?;
        Ok(Self::ContextSuffix { keywords, regex })
    }

    pub fn context_prefix<S: AsRef<str>>(keywords: &[S]) -> Result<Self, RuleError> {
        let (keywords, alternation) = keyword_alternation(keywords)?;
        let regex = compile(
            &alternation,
            &format!(r"(?i)\b(?:{})\s*:?\s*₹?\s*{}", alternation, NUMERAL),
        )?;
        Ok(Self::ContextPrefix { keywords, regex })
    }

    pub fn grouping() -> Result<Self, RuleError> {
        let regex = compile(
            "grouping",
            &format!(
                r"{}([1-9][0-9]{{0,2}}(?:,[0-9]{{2,3}})+(?:\.[0-9]{{1,2}})?)\b",
                TOKEN_START
            ),
        )?;
        Ok(Self::Grouping { regex })
    }

    pub fn category(&self) -> RuleCategory {
        match self {
            Self::CurrencySymbol { .. } => RuleCategory::CurrencySymbol,
            Self::CurrencyCode { .. } => RuleCategory::CurrencyCode,
            Self::JsonKey { .. } => RuleCategory::JsonKey,
            Self::Attribute { .. } => RuleCategory::Attribute,
            Self::Assignment { .. } => RuleCategory::Assignment,
            Self::ContextSuffix { .. } => RuleCategory::ContextSuffix,
            Self::ContextPrefix { .. } => RuleCategory::ContextPrefix,
            Self::Grouping { .. } => RuleCategory::Grouping,
        }
    }

    /// Human-readable key of the rule (symbol, code, key name or keywords).
    pub fn key(&self) -> String {
        match self {
            Self::CurrencySymbol { symbol, .. } => symbol.clone(),
            Self::CurrencyCode { code, .. } => code.clone(),
            Self::JsonKey { key, .. } => key.clone(),
            Self::Attribute { name, .. } | Self::Assignment { name, .. } => name.clone(),
            Self::ContextSuffix { keywords, .. } | Self::ContextPrefix { keywords, .. } => {
                keywords.join("|")
            }
            Self::Grouping { .. } => String::new(),
        }
    }

    pub fn regex(&self) -> &Regex {
        match self {
            Self::CurrencySymbol { regex, .. }
            | Self::CurrencyCode { regex, .. }
            | Self::JsonKey { regex, .. }
            | Self::Attribute { regex, .. }
            | Self::Assignment { regex, .. }
            | Self::ContextSuffix { regex, .. }
            | Self::ContextPrefix { regex, .. }
            | Self::Grouping { regex } => regex,
        }
    }

    /// Every non-overlapping match of this rule in `text`.
    pub fn candidates<'t>(&self, rule_index: usize, text: &'t str) -> Vec<RawCandidate<'t>> {
        self.regex()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|numeral| RawCandidate {
                rule_index,
                matched_text: numeral.as_str(),
                offset: numeral.start(),
            })
            .collect()
    }
}

fn non_empty<'a>(value: &'a str, what: &'static str) -> Result<&'a str, RuleError> {
    let value = value.trim();
    if value.is_empty() {
        Err(RuleError::EmptyKey(what))
    } else {
        Ok(value)
    }
}

fn keyword_alternation<S: AsRef<str>>(keywords: &[S]) -> Result<(Vec<String>, String), RuleError> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    if keywords.is_empty() {
        return Err(RuleError::NoKeywords);
    }

    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    Ok((keywords, alternation))
}

fn compile(key: &str, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        key: key.to_string(),
        source,
    })
}

/// Ordered collection of pattern rules; a rule's index is its priority.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Insert a rule right after the last rule of the same category,
    /// or at the end when the set has none.
    pub fn insert(&mut self, rule: PatternRule) {
        let category = rule.category();
        match self.rules.iter().rposition(|r| r.category() == category) {
            Some(pos) => self.rules.insert(pos + 1, rule),
            None => self.rules.push(rule),
        }
    }

    pub fn get(&self, index: usize) -> Option<&PatternRule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatternRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a PatternRule;
    type IntoIter = std::slice::Iter<'a, PatternRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<PatternRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = PatternRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numerals(rule: &PatternRule, text: &str) -> Vec<String> {
        rule.candidates(0, text)
            .into_iter()
            .map(|c| c.matched_text.to_string())
            .collect()
    }

    #[test]
    fn test_currency_symbol() {
        let rule = PatternRule::currency_symbol("₹").unwrap();
        assert_eq!(numerals(&rule, "<b>₹1,599</b> ₹ 899.00"), vec!["1,599", "899.00"]);

        let dollar = PatternRule::currency_symbol("$").unwrap();
        assert_eq!(numerals(&dollar, "now $49.99"), vec!["49.99"]);
        assert_eq!(numerals(&dollar, "now $49.9"), vec!["49.9"]);

        let euro = PatternRule::currency_symbol("€").unwrap();
        assert_eq!(numerals(&euro, "€1.234,56 statt €1.499,-"), vec!["1.234,56", "1.499"]);
    }

    #[test]
    fn test_currency_code() {
        let rule = PatternRule::currency_code("Rs").unwrap();
        assert_eq!(numerals(&rule, "Rs. 2,499 or rs 150"), vec!["2,499", "150"]);
        assert!(numerals(&rule, "Mrs 500").is_empty());
    }

    #[test]
    fn test_json_key() {
        let rule = PatternRule::json_key("sellingPrice").unwrap();
        assert_eq!(numerals(&rule, r#"{"sellingPrice": 3299, "x": 1}"#), vec!["3299"]);
        assert_eq!(numerals(&rule, r#"{"sellingPrice":"3299"}"#), vec!["3299"]);

        let price = PatternRule::json_key("price").unwrap();
        assert!(numerals(&price, r#"{"sellingPrice": 3299}"#).is_empty());
    }

    #[test]
    fn test_attribute_requires_quotes() {
        let rule = PatternRule::attribute("data-price").unwrap();
        assert_eq!(numerals(&rule, r#"<div data-price="1999">"#), vec!["1999"]);
        assert_eq!(numerals(&rule, "<div data-price='25.50'>"), vec!["25.50"]);
        assert!(numerals(&rule, "<div data-price=1999>").is_empty());
        assert!(numerals(&rule, r#"<div data-selling-price="1999">"#).is_empty());
    }

    #[test]
    fn test_assignment() {
        let rule = PatternRule::assignment("productPrice").unwrap();
        assert_eq!(numerals(&rule, "var productPrice = 1299;"), vec!["1299"]);
        assert_eq!(numerals(&rule, "{productPrice: 450}"), vec!["450"]);
    }

    #[test]
    fn test_context_rules() {
        let suffix = PatternRule::context_suffix(&["only", "OFF"]).unwrap();
        assert_eq!(numerals(&suffix, "Price: ₹899 only"), vec!["899"]);
        assert_eq!(numerals(&suffix, "flat 500 off today"), vec!["500"]);
        assert_eq!(numerals(&suffix, "1,599 only"), vec!["1,599"]);
        assert!(numerals(&suffix, "X1599 only").is_empty());
        assert!(numerals(&suffix, "SKU-A1,599 only").is_empty());

        let prefix = PatternRule::context_prefix(&["MRP", "price"]).unwrap();
        assert_eq!(numerals(&prefix, "MRP: ₹1299"), vec!["1299"]);
        assert_eq!(numerals(&prefix, "Price ₹ 899"), vec!["899"]);
        assert!(numerals(&prefix, r#""sellingPrice": 3299"#).is_empty());
    }

    #[test]
    fn test_grouping() {
        let rule = PatternRule::grouping().unwrap();
        assert_eq!(
            numerals(&rule, "was 12,34,567 now 1,599 and 42"),
            vec!["12,34,567", "1,599"]
        );
        assert_eq!(numerals(&rule, "total 1,234.50"), vec!["1,234.50"]);
        assert!(numerals(&rule, "€1.234,56").is_empty());
        assert!(numerals(&rule, "ref A12,345").is_empty());
    }

    #[test]
    fn test_empty_keys_are_rejected() {
        assert!(matches!(
            PatternRule::json_key("  "),
            Err(RuleError::EmptyKey("JSON key"))
        ));
        assert!(matches!(
            PatternRule::context_suffix::<&str>(&[]),
            Err(RuleError::NoKeywords)
        ));
    }

    #[test]
    fn test_keys_are_escaped() {
        let rule = PatternRule::json_key("price.amount").unwrap();
        assert!(numerals(&rule, r#""priceXamount": 10"#).is_empty());
        assert_eq!(numerals(&rule, r#""price.amount": 10"#), vec!["10"]);
    }

    #[test]
    fn test_insert_keeps_categories_together() {
        let mut rules = RuleSet::new(vec![
            PatternRule::json_key("price").unwrap(),
            PatternRule::grouping().unwrap(),
        ]);
        rules.insert(PatternRule::json_key("offerPrice").unwrap());
        rules.insert(PatternRule::attribute("data-offer").unwrap());

        let categories: Vec<RuleCategory> = rules.iter().map(|r| r.category()).collect();
        assert_eq!(
            categories,
            vec![
                RuleCategory::JsonKey,
                RuleCategory::JsonKey,
                RuleCategory::Grouping,
                RuleCategory::Attribute,
            ]
        );
        assert_eq!(rules.get(1).unwrap().key(), "offerPrice");
    }
}

//! Policies for choosing one price out of a candidate list.
//!
//! Extraction reports every candidate; which one is "the" price is a
//! decision for the caller, made here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PriceCandidate;

/// How to reduce a candidate list to one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Lowest rule index wins, ties go to the lowest value.
    #[default]
    FirstMatch,
    /// Most frequently seen value, ties go to the earliest seen.
    MostFrequent,
    /// Spread-based choice: sale price over list price, outliers removed,
    /// key-bearing rules preferred.
    Heuristic,
}

impl SelectionPolicy {
    pub const ALL: [SelectionPolicy; 3] = [Self::FirstMatch, Self::MostFrequent, Self::Heuristic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstMatch => "first-match",
            Self::MostFrequent => "most-frequent",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown selection policy {:?} (expected one of: first-match, most-frequent, heuristic)",
                    s
                )
            })
    }
}

/// Pick one price from `candidates` according to `policy`.
pub fn select_price(candidates: &[PriceCandidate], policy: SelectionPolicy) -> Option<f64> {
    let selected = match policy {
        SelectionPolicy::FirstMatch => first_match(candidates),
        SelectionPolicy::MostFrequent => most_frequent(candidates),
        SelectionPolicy::Heuristic => heuristic(candidates),
    };

    debug!(
        "Policy {} selected {:?} from {} candidates",
        policy,
        selected,
        candidates.len()
    );

    selected
}

fn first_match(candidates: &[PriceCandidate]) -> Option<f64> {
    candidates
        .iter()
        .min_by(|a, b| {
            a.rule_index
                .cmp(&b.rule_index)
                .then(a.value.total_cmp(&b.value))
        })
        .map(|c| c.value)
}

fn most_frequent(candidates: &[PriceCandidate]) -> Option<f64> {
    // (value, count), in order of first appearance
    let mut tally: Vec<(f64, usize)> = Vec::new();
    for candidate in candidates {
        match tally.iter_mut().find(|(v, _)| *v == candidate.value) {
            Some((_, count)) => *count += 1,
            None => tally.push((candidate.value, 1)),
        }
    }

    let best = tally.iter().map(|(_, count)| *count).max()?;
    tally
        .into_iter()
        .find(|(_, count)| *count == best)
        .map(|(value, _)| value)
}

fn heuristic(candidates: &[PriceCandidate]) -> Option<f64> {
    let mut unique: Vec<f64> = Vec::new();
    for candidate in candidates {
        if !unique.contains(&candidate.value) {
            unique.push(candidate.value);
        }
    }
    unique.sort_by(f64::total_cmp);

    match unique.len() {
        0 => None,
        1 | 2 => unique.first().copied(),
        3 => unique.get(1).copied(),
        n => {
            let median = unique[n / 2];
            let reasonable: Vec<f64> = unique
                .iter()
                .copied()
                .filter(|v| 0.1 * median <= *v && *v <= 10.0 * median)
                .collect();

            let keyed = reasonable.iter().copied().find(|v| {
                candidates
                    .iter()
                    .any(|c| c.value == *v && c.category.is_key_bearing())
            });

            keyed
                .or_else(|| reasonable.first().copied())
                .or_else(|| unique.first().copied())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::RuleCategory;

    fn candidate(value: f64, rule_index: usize, category: RuleCategory) -> PriceCandidate {
        PriceCandidate {
            value,
            rule_index,
            category,
            matched_text: value.to_string(),
            offset: 0,
        }
    }

    #[test]
    fn test_empty() {
        for policy in SelectionPolicy::ALL {
            assert_eq!(select_price(&[], policy), None);
        }
    }

    #[test]
    fn test_first_match() {
        let candidates = [
            candidate(1299.0, 3, RuleCategory::CurrencyCode),
            candidate(999.0, 0, RuleCategory::CurrencySymbol),
            candidate(899.0, 0, RuleCategory::CurrencySymbol),
        ];
        assert_eq!(select_price(&candidates, SelectionPolicy::FirstMatch), Some(899.0));
    }

    #[test]
    fn test_most_frequent() {
        let candidates = [
            candidate(500.0, 0, RuleCategory::CurrencySymbol),
            candidate(899.0, 1, RuleCategory::CurrencySymbol),
            candidate(899.0, 9, RuleCategory::JsonKey),
            candidate(500.0, 12, RuleCategory::ContextPrefix),
            candidate(120.0, 14, RuleCategory::Grouping),
        ];
        // 500 and 899 tie; 500 was seen first.
        assert_eq!(select_price(&candidates, SelectionPolicy::MostFrequent), Some(500.0));

        let mut more = candidates.to_vec();
        more.push(candidate(899.0, 15, RuleCategory::Grouping));
        assert_eq!(select_price(&more, SelectionPolicy::MostFrequent), Some(899.0));
    }

    #[test]
    fn test_heuristic_small_sets() {
        let one = [candidate(999.0, 0, RuleCategory::CurrencySymbol)];
        assert_eq!(select_price(&one, SelectionPolicy::Heuristic), Some(999.0));

        let two = [
            candidate(1299.0, 0, RuleCategory::CurrencySymbol),
            candidate(999.0, 0, RuleCategory::CurrencySymbol),
            candidate(1299.0, 5, RuleCategory::ContextPrefix),
        ];
        assert_eq!(select_price(&two, SelectionPolicy::Heuristic), Some(999.0));

        let three = [
            candidate(1299.0, 0, RuleCategory::CurrencySymbol),
            candidate(999.0, 0, RuleCategory::CurrencySymbol),
            candidate(300.0, 0, RuleCategory::CurrencySymbol),
        ];
        assert_eq!(select_price(&three, SelectionPolicy::Heuristic), Some(999.0));
    }

    #[test]
    fn test_heuristic_prefers_keyed_values() {
        let candidates = [
            candidate(15.0, 0, RuleCategory::CurrencySymbol),
            candidate(899.0, 0, RuleCategory::CurrencySymbol),
            candidate(1299.0, 0, RuleCategory::CurrencySymbol),
            candidate(1499.0, 8, RuleCategory::JsonKey),
            candidate(50000.0, 16, RuleCategory::Grouping),
        ];
        // median 1299; 15 and 50000 are outliers; 1499 is the only keyed value.
        assert_eq!(select_price(&candidates, SelectionPolicy::Heuristic), Some(1499.0));
    }

    #[test]
    fn test_heuristic_falls_back_to_lowest_reasonable() {
        let candidates = [
            candidate(15.0, 0, RuleCategory::CurrencySymbol),
            candidate(899.0, 0, RuleCategory::CurrencySymbol),
            candidate(1299.0, 0, RuleCategory::CurrencySymbol),
            candidate(1499.0, 0, RuleCategory::CurrencySymbol),
        ];
        // median 1299; 15 is below a tenth of it.
        assert_eq!(select_price(&candidates, SelectionPolicy::Heuristic), Some(899.0));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("first-match".parse::<SelectionPolicy>(), Ok(SelectionPolicy::FirstMatch));
        assert_eq!("Most-Frequent".parse::<SelectionPolicy>(), Ok(SelectionPolicy::MostFrequent));
        assert_eq!(" heuristic ".parse::<SelectionPolicy>(), Ok(SelectionPolicy::Heuristic));
        assert!("cheapest".parse::<SelectionPolicy>().is_err());
        assert_eq!(SelectionPolicy::Heuristic.to_string(), "heuristic");
    }
}

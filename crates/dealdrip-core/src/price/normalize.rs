//! Price normalization: numeral text with mixed separators to one `f64`.

use super::bounds::PriceBounds;

/// Normalize a raw numeral (e.g. "₹1,234.56", "1.234,56", "12,34,567").
///
/// Everything except ASCII digits, `.` and `,` is dropped first. When both
/// separators are present the one appearing last is the decimal mark. A
/// lone comma followed by one or two digits is a decimal mark; any other
/// comma is a thousands separator. The result must lie within
/// [`PriceBounds::UNIVERSAL`], otherwise `None` is returned.
pub fn normalize_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let canonical = resolve_separators(&cleaned);
    let value = canonical.parse::<f64>().ok()?;

    PriceBounds::UNIVERSAL.contains(value).then_some(value)
}

fn resolve_separators(cleaned: &str) -> String {
    match (cleaned.rfind('.'), cleaned.rfind(',')) {
        // 1,234.56
        (Some(dot), Some(comma)) if dot > comma => cleaned.replace(',', ""),
        // 1.234,56
        (Some(_), Some(_)) => cleaned.replace('.', "").replace(',', "."),
        (None, Some(_)) => {
            let parts: Vec<&str> = cleaned.split(',').collect();
            if parts.len() == 2 && (1..=2).contains(&parts[1].len()) {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        _ => cleaned.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_separators_are_order_invariant() {
        assert_eq!(normalize_price("1,234.56"), Some(1234.56));
        assert_eq!(normalize_price("1.234,56"), Some(1234.56));
        assert_eq!(normalize_price("1,234,567.89"), Some(1234567.89));
        assert_eq!(normalize_price("1.234.567,89"), Some(1234567.89));
    }

    #[test]
    fn test_comma_only() {
        assert_eq!(normalize_price("1,56"), Some(1.56));
        assert_eq!(normalize_price("1,5"), Some(1.5));
        assert_eq!(normalize_price("1,234"), Some(1234.0));
        assert_eq!(normalize_price("12,34,567"), Some(1234567.0));
        // Trailing separator from a greedy match is a thousands separator.
        assert_eq!(normalize_price("3299,"), Some(3299.0));
    }

    #[test]
    fn test_period_only() {
        assert_eq!(normalize_price("1234.5"), Some(1234.5));
        assert_eq!(normalize_price("1.234"), Some(1.234));
        assert_eq!(normalize_price("899"), Some(899.0));
    }

    #[test]
    fn test_strips_currency_and_text() {
        assert_eq!(normalize_price("₹1,599"), Some(1599.0));
        assert_eq!(normalize_price("Rs 2,499"), Some(2499.0));
        // The abbreviation's period counts as a separator, and the last
        // separator is the decimal mark.
        assert_eq!(normalize_price("Rs. 2,499"), Some(2.499));
        assert_eq!(normalize_price("  € 12,50 "), Some(12.5));
    }

    #[test]
    fn test_absence() {
        assert_eq!(normalize_price(""), None);
        assert_eq!(normalize_price("abc"), None);
        assert_eq!(normalize_price(".,.,"), None);
        assert_eq!(normalize_price("."), None);
        assert_eq!(normalize_price("1.2.3"), None);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(normalize_price("0.001"), None);
        assert_eq!(normalize_price("0.005"), None);
        assert_eq!(normalize_price("0"), None);
        assert_eq!(normalize_price("0.01"), Some(0.01));
        assert_eq!(normalize_price("10000000"), Some(10_000_000.0));
        assert_eq!(normalize_price("10000001"), None);
    }

    #[test]
    fn test_renormalizing_is_a_no_op() {
        for raw in ["1,234.56", "1.234,56", "1,56", "12,34,567", "₹899", "0.01", "9999999.99"] {
            let value = normalize_price(raw).unwrap();
            assert_eq!(normalize_price(&value.to_string()), Some(value), "input {raw}");
        }
    }
}

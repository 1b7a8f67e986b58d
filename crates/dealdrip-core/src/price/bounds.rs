//! Inclusive plausibility ranges for prices.

use serde::{Deserialize, Serialize};

use crate::error::BoundsError;

/// Inclusive `[low, high]` range a price must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub low: f64,
    pub high: f64,
}

impl PriceBounds {
    /// Range applied by the normalizer to every value: one cent to ten million.
    pub const UNIVERSAL: Self = Self {
        low: 0.01,
        high: 10_000_000.0,
    };

    /// Typical retail catalog range.
    pub const RETAIL: Self = Self {
        low: 10.0,
        high: 100_000.0,
    };

    /// Create a bound, rejecting non-finite, negative or inverted limits.
    pub fn new(low: f64, high: f64) -> Result<Self, BoundsError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(BoundsError::NotFinite);
        }
        if low < 0.0 {
            return Err(BoundsError::Negative(low));
        }
        if low > high {
            return Err(BoundsError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    /// Whether `value` is finite and inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && self.low <= value && value <= self.high
    }
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self::RETAIL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        assert!(PriceBounds::RETAIL.contains(10.0));
        assert!(PriceBounds::RETAIL.contains(100_000.0));
        assert!(!PriceBounds::RETAIL.contains(9.99));
        assert!(!PriceBounds::RETAIL.contains(100_000.01));
    }

    #[test]
    fn test_contains_rejects_non_finite() {
        assert!(!PriceBounds::UNIVERSAL.contains(f64::NAN));
        assert!(!PriceBounds::UNIVERSAL.contains(f64::INFINITY));
        assert!(!PriceBounds::UNIVERSAL.contains(-1.0));
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(PriceBounds::new(1.0, 5.0), Ok(PriceBounds { low: 1.0, high: 5.0 }));
        assert_eq!(PriceBounds::new(f64::NAN, 5.0), Err(BoundsError::NotFinite));
        assert_eq!(PriceBounds::new(-1.0, 5.0), Err(BoundsError::Negative(-1.0)));
        assert_eq!(
            PriceBounds::new(6.0, 5.0),
            Err(BoundsError::Inverted { low: 6.0, high: 5.0 })
        );
    }
}

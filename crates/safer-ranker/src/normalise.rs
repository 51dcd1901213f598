//! Numeric helpers shared by the scoring stages.

use std::cmp::Ordering;

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Descending comparison over a total order, so NaN can never make a sort
/// non-deterministic.
pub fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(0.123456, 4), 0.1235);
        assert_eq!(round_dp(999.994, 2), 999.99);
        assert_eq!(round_dp(12.0, 2), 12.0);
    }

    #[test]
    fn test_desc_orders_larger_first() {
        let mut v = vec![0.2, 0.9, 0.5];
        v.sort_by(|a, b| desc(*a, *b));
        assert_eq!(v, vec![0.9, 0.5, 0.2]);
    }
}

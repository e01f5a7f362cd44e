//! Summary statistics over a matched customer subset.

use crm_core::types::Customer;
use serde::{Deserialize, Serialize};

/// Aggregate summary of a matched subset, relative to the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub customer_count: u64,
    /// Sum of lifetime value across the subset.
    pub total_value: f64,
    pub average_value: f64,
    /// Subset share of the whole collection's lifetime value, rounded to a
    /// whole percent. Within [0, 100] whenever the subset is drawn from the
    /// whole collection.
    pub market_share_percent: f64,
}

impl SegmentStats {
    pub fn zero() -> Self {
        Self {
            customer_count: 0,
            total_value: 0.0,
            average_value: 0.0,
            market_share_percent: 0.0,
        }
    }
}

/// Compute subset statistics. Both divisions are guarded, so an empty subset
/// or a worthless collection yields zeros rather than NaN.
pub fn aggregate(matched: &[Customer], whole: &[Customer]) -> SegmentStats {
    let customer_count = matched.len() as u64;
    let total_value: f64 = matched.iter().map(|c| c.lifetime_value).sum();
    let average_value = if customer_count > 0 {
        total_value / customer_count as f64
    } else {
        0.0
    };

    let whole_value: f64 = whole.iter().map(|c| c.lifetime_value).sum();
    let market_share_percent = if whole_value > 0.0 {
        (total_value / whole_value * 100.0).round()
    } else {
        0.0
    };

    SegmentStats {
        customer_count,
        total_value,
        average_value,
        market_share_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crm_core::types::CustomerStatus;
    use uuid::Uuid;

    fn customer(lifetime_value: f64) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            email: "c@example.com".into(),
            first_name: "C".into(),
            last_name: "Test".into(),
            status: CustomerStatus::Customer,
            source: "website".into(),
            tags: Vec::new(),
            total_orders: 1,
            total_spent: lifetime_value,
            lifetime_value,
            lead_score: 50.0,
            is_vip: false,
            created_at: Utc::now(),
            last_contact_at: None,
        }
    }

    #[test]
    fn test_empty_subset_yields_zeros() {
        let whole = vec![customer(1000.0), customer(2000.0)];
        let stats = aggregate(&[], &whole);
        assert_eq!(stats, SegmentStats::zero());
    }

    #[test]
    fn test_empty_whole_collection_yields_zero_share() {
        let stats = aggregate(&[], &[]);
        assert_eq!(stats.market_share_percent, 0.0);
        assert_eq!(stats.average_value, 0.0);
    }

    #[test]
    fn test_totals_and_average() {
        let a = customer(12_000.0);
        let b = customer(15_000.0);
        let whole = vec![a.clone(), b.clone(), customer(500.0)];
        let stats = aggregate(&[a, b], &whole);
        assert_eq!(stats.customer_count, 2);
        assert_eq!(stats.total_value, 27_000.0);
        assert_eq!(stats.average_value, 13_500.0);
        // 27000 / 27500 = 98.18%, rounded.
        assert_eq!(stats.market_share_percent, 98.0);
    }

    #[test]
    fn test_market_share_bounded_for_subsets() {
        let whole: Vec<Customer> = (1..=5).map(|i| customer(i as f64 * 100.0)).collect();
        for take in 0..=whole.len() {
            let subset: Vec<Customer> = whole[..take].to_vec();
            let stats = aggregate(&subset, &whole);
            assert!(stats.market_share_percent >= 0.0);
            assert!(stats.market_share_percent <= 100.0);
        }
        let all = aggregate(&whole, &whole);
        assert_eq!(all.market_share_percent, 100.0);
    }
}

//! Built-in quick segments: fixed, read-only templates whose stats are
//! computed from the live customer collection on every access. They carry no
//! persisted id and are never written to the catalog.

use chrono::{DateTime, Duration, Utc};
use crm_core::types::{Customer, CustomerStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::builder::CriteriaBuilder;
use crate::catalog::Segment;
use crate::criteria::{filter, SegmentCriteria, SegmentRule};

/// Default look-back window for the recency-based quick segments.
pub const DEFAULT_QUICK_WINDOW_DAYS: i64 = 30;

/// A read-only template rule: name, description, and criteria only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSegment {
    pub name: String,
    pub description: String,
    pub criteria: SegmentCriteria,
}

impl QuickSegment {
    /// The standard template set, anchored at `now` for the recency windows.
    pub fn standard(now: DateTime<Utc>) -> Vec<QuickSegment> {
        Self::standard_with_window(now, DEFAULT_QUICK_WINDOW_DAYS)
    }

    /// The standard template set with a custom recency window.
    pub fn standard_with_window(now: DateTime<Utc>, window_days: i64) -> Vec<QuickSegment> {
        let window_start = now - Duration::days(window_days);
        vec![
            QuickSegment {
                name: "High Value Customers".into(),
                description: "Customers with lifetime value over $10,000".into(),
                criteria: CriteriaBuilder::new().min_spent(10_000.0).build(),
            },
            QuickSegment {
                name: "VIP Customers".into(),
                description: "Customers marked as VIP".into(),
                criteria: CriteriaBuilder::new().status(CustomerStatus::Vip).build(),
            },
            QuickSegment {
                name: "Recent Customers".into(),
                description: format!("Customers created in the last {window_days} days"),
                criteria: CriteriaBuilder::new().created_after(window_start).build(),
            },
            QuickSegment {
                name: "At Risk Customers".into(),
                description: "Customers with high lead score but no recent contact".into(),
                criteria: CriteriaBuilder::new()
                    .min_lead_score(70.0)
                    .last_contact_before(window_start)
                    .build(),
            },
            QuickSegment {
                name: "Frequent Buyers".into(),
                description: "Customers with 5+ orders".into(),
                criteria: CriteriaBuilder::new().min_orders(5).build(),
            },
        ]
    }

    /// Materialize an ephemeral `Segment`-shaped value with live stats.
    ///
    /// The id is throwaway: the result exists only for display and is never
    /// persisted.
    pub fn materialize(&self, customers: &[Customer], now: DateTime<Utc>) -> Segment {
        let matched = filter(customers, &self.criteria);
        let stats = aggregate(&matched, customers);
        Segment {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            description: self.description.clone(),
            criteria: self.criteria.clone(),
            customer_count: stats.customer_count,
            total_value: stats.total_value,
            average_value: stats.average_value,
            created_at: now,
            updated_at: now,
        }
    }
}

impl SegmentRule for QuickSegment {
    fn criteria(&self) -> &SegmentCriteria {
        &self.criteria
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

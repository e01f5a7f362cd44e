//! Fluent construction API for segment criteria.

use chrono::{DateTime, Utc};
use crm_core::types::CustomerStatus;

use crate::criteria::SegmentCriteria;

/// Builds a [`SegmentCriteria`] one filter at a time.
///
/// List filters accumulate across calls; bound filters replace any earlier
/// value for the same bound.
#[derive(Debug, Default)]
pub struct CriteriaBuilder {
    criteria: SegmentCriteria,
}

impl CriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: CustomerStatus) -> Self {
        self.criteria.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.criteria.source.get_or_insert_with(Vec::new).push(source.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.criteria.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    pub fn min_spent(mut self, amount: f64) -> Self {
        self.criteria.min_spent = Some(amount);
        self
    }

    pub fn max_spent(mut self, amount: f64) -> Self {
        self.criteria.max_spent = Some(amount);
        self
    }

    pub fn min_orders(mut self, count: u32) -> Self {
        self.criteria.min_orders = Some(count);
        self
    }

    pub fn max_orders(mut self, count: u32) -> Self {
        self.criteria.max_orders = Some(count);
        self
    }

    pub fn min_lead_score(mut self, score: f32) -> Self {
        self.criteria.min_lead_score = Some(score);
        self
    }

    pub fn max_lead_score(mut self, score: f32) -> Self {
        self.criteria.max_lead_score = Some(score);
        self
    }

    pub fn created_after(mut self, at: DateTime<Utc>) -> Self {
        self.criteria.created_after = Some(at);
        self
    }

    pub fn created_before(mut self, at: DateTime<Utc>) -> Self {
        self.criteria.created_before = Some(at);
        self
    }

    pub fn last_contact_after(mut self, at: DateTime<Utc>) -> Self {
        self.criteria.last_contact_after = Some(at);
        self
    }

    pub fn last_contact_before(mut self, at: DateTime<Utc>) -> Self {
        self.criteria.last_contact_before = Some(at);
        self
    }

    pub fn build(self) -> SegmentCriteria {
        self.criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_lists_and_sets_bounds() {
        let criteria = CriteriaBuilder::new()
            .status(CustomerStatus::Customer)
            .status(CustomerStatus::Vip)
            .tag("bulk")
            .min_spent(500.0)
            .max_orders(20)
            .build();

        assert_eq!(
            criteria.status,
            Some(vec![CustomerStatus::Customer, CustomerStatus::Vip])
        );
        assert_eq!(criteria.tags, Some(vec!["bulk".to_string()]));
        assert_eq!(criteria.min_spent, Some(500.0));
        assert_eq!(criteria.max_orders, Some(20));
        assert!(criteria.source.is_none());
    }

    #[test]
    fn test_empty_builder_is_identity_criteria() {
        assert_eq!(CriteriaBuilder::new().build(), SegmentCriteria::default());
    }
}

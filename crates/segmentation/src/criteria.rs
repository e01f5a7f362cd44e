//! Segment criteria and the matching rules applied to customer records.

use chrono::{DateTime, Utc};
use crm_core::types::{Customer, CustomerStatus};
use serde::{Deserialize, Serialize};

/// Declarative filter for a customer segment.
///
/// Every field is optional: a present field activates that filter, an absent
/// field imposes no constraint, and all active filters must pass (logical
/// AND). List filters that are present but empty also impose no constraint,
/// so a half-filled criteria form never silently excludes everyone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<CustomerStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,
    /// Matches customers carrying any of the listed tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_orders: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_orders: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lead_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lead_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contact_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contact_before: Option<DateTime<Utc>>,
}

impl SegmentCriteria {
    /// Evaluate this criteria against a single customer.
    ///
    /// All range bounds are inclusive, the date bounds included. Customers
    /// with no `last_contact_at` are never evaluated against the
    /// last-contact filters and therefore pass them.
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(statuses) = &self.status {
            if !statuses.is_empty() && !statuses.contains(&customer.status) {
                return false;
            }
        }

        if let Some(sources) = &self.source {
            if !sources.is_empty() && !sources.contains(&customer.source) {
                return false;
            }
        }

        if let Some(tags) = &self.tags {
            if !tags.is_empty() && !tags.iter().any(|tag| customer.tags.contains(tag)) {
                return false;
            }
        }

        if let Some(min) = self.min_spent {
            if customer.total_spent < min {
                return false;
            }
        }
        if let Some(max) = self.max_spent {
            if customer.total_spent > max {
                return false;
            }
        }

        if let Some(min) = self.min_orders {
            if customer.total_orders < min {
                return false;
            }
        }
        if let Some(max) = self.max_orders {
            if customer.total_orders > max {
                return false;
            }
        }

        if let Some(min) = self.min_lead_score {
            if customer.lead_score < min {
                return false;
            }
        }
        if let Some(max) = self.max_lead_score {
            if customer.lead_score > max {
                return false;
            }
        }

        if let Some(after) = self.created_after {
            if customer.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if customer.created_at > before {
                return false;
            }
        }

        if let Some(last_contact) = customer.last_contact_at {
            if let Some(after) = self.last_contact_after {
                if last_contact < after {
                    return false;
                }
            }
            if let Some(before) = self.last_contact_before {
                if last_contact > before {
                    return false;
                }
            }
        }

        true
    }
}

/// Filter a customer collection against `criteria`, preserving input order.
/// No deduplication is performed; records are assumed unique by id.
pub fn filter(customers: &[Customer], criteria: &SegmentCriteria) -> Vec<Customer> {
    customers
        .iter()
        .filter(|customer| criteria.matches(customer))
        .cloned()
        .collect()
}

/// Common capability of anything that can drive a segmentation run, whether
/// a cataloged segment or a built-in quick segment.
pub trait SegmentRule {
    fn criteria(&self) -> &SegmentCriteria;
    fn display_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn customer(name: &str, status: CustomerStatus) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase()),
            first_name: name.to_string(),
            last_name: "Test".into(),
            status,
            source: "website".into(),
            tags: Vec::new(),
            total_orders: 0,
            total_spent: 0.0,
            lifetime_value: 0.0,
            lead_score: 0.0,
            is_vip: false,
            created_at: Utc::now() - Duration::days(90),
            last_contact_at: None,
        }
    }

    fn ids(customers: &[Customer]) -> Vec<Uuid> {
        customers.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_empty_criteria_matches_everyone() {
        let customers = vec![
            customer("Ana", CustomerStatus::Lead),
            customer("Ben", CustomerStatus::Vip),
            customer("Cleo", CustomerStatus::Inactive),
        ];
        let matched = filter(&customers, &SegmentCriteria::default());
        assert_eq!(ids(&matched), ids(&customers));
    }

    #[test]
    fn test_status_filter() {
        let customers = vec![
            customer("Ana", CustomerStatus::Lead),
            customer("Ben", CustomerStatus::Vip),
        ];
        let criteria = SegmentCriteria {
            status: Some(vec![CustomerStatus::Vip]),
            ..Default::default()
        };
        let matched = filter(&customers, &criteria);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].first_name, "Ben");
    }

    #[test]
    fn test_empty_status_list_imposes_no_constraint() {
        let customers = vec![
            customer("Ana", CustomerStatus::Lead),
            customer("Ben", CustomerStatus::Vip),
        ];
        let criteria = SegmentCriteria {
            status: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(filter(&customers, &criteria).len(), 2);
    }

    #[test]
    fn test_tag_or_semantics() {
        let mut ana = customer("Ana", CustomerStatus::Customer);
        ana.tags = vec!["a".into(), "b".into()];

        let shared = SegmentCriteria {
            tags: Some(vec!["b".into(), "c".into()]),
            ..Default::default()
        };
        assert!(shared.matches(&ana));

        let disjoint = SegmentCriteria {
            tags: Some(vec!["c".into(), "d".into()]),
            ..Default::default()
        };
        assert!(!disjoint.matches(&ana));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let mut ana = customer("Ana", CustomerStatus::Customer);
        ana.total_spent = 10_000.0;

        let min = SegmentCriteria {
            min_spent: Some(10_000.0),
            ..Default::default()
        };
        assert!(min.matches(&ana));

        let max = SegmentCriteria {
            max_spent: Some(10_000.0),
            ..Default::default()
        };
        assert!(max.matches(&ana));

        let above = SegmentCriteria {
            min_spent: Some(10_000.01),
            ..Default::default()
        };
        assert!(!above.matches(&ana));
    }

    #[test]
    fn test_created_bounds_inclusive() {
        let ana = customer("Ana", CustomerStatus::Customer);

        let exact_after = SegmentCriteria {
            created_after: Some(ana.created_at),
            ..Default::default()
        };
        assert!(exact_after.matches(&ana));

        let exact_before = SegmentCriteria {
            created_before: Some(ana.created_at),
            ..Default::default()
        };
        assert!(exact_before.matches(&ana));

        let too_late = SegmentCriteria {
            created_after: Some(ana.created_at + Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!too_late.matches(&ana));
    }

    #[test]
    fn test_missing_last_contact_passes_contact_filters() {
        // Policy: a customer that was never contacted is not excluded by
        // last-contact bounds; the filter only applies when the date exists.
        let ana = customer("Ana", CustomerStatus::Customer);
        assert!(ana.last_contact_at.is_none());

        let criteria = SegmentCriteria {
            last_contact_before: Some(Utc::now() - Duration::days(30)),
            ..Default::default()
        };
        assert!(criteria.matches(&ana));

        let criteria = SegmentCriteria {
            last_contact_after: Some(Utc::now() - Duration::days(7)),
            ..Default::default()
        };
        assert!(criteria.matches(&ana));
    }

    #[test]
    fn test_last_contact_bounds_apply_when_present() {
        let mut ana = customer("Ana", CustomerStatus::Customer);
        ana.last_contact_at = Some(Utc::now() - Duration::days(40));

        let stale = SegmentCriteria {
            last_contact_before: Some(Utc::now() - Duration::days(30)),
            ..Default::default()
        };
        assert!(stale.matches(&ana));

        let recent = SegmentCriteria {
            last_contact_after: Some(Utc::now() - Duration::days(30)),
            ..Default::default()
        };
        assert!(!recent.matches(&ana));
    }

    #[test]
    fn test_disjoint_criteria_compose_as_intersection() {
        let mut ana = customer("Ana", CustomerStatus::Customer);
        ana.total_spent = 12_000.0;
        let mut ben = customer("Ben", CustomerStatus::Vip);
        ben.total_spent = 15_000.0;
        let mut cleo = customer("Cleo", CustomerStatus::Customer);
        cleo.total_spent = 500.0;
        let customers = vec![ana, ben, cleo];

        let by_spend = SegmentCriteria {
            min_spent: Some(10_000.0),
            ..Default::default()
        };
        let by_status = SegmentCriteria {
            status: Some(vec![CustomerStatus::Customer]),
            ..Default::default()
        };
        let combined = SegmentCriteria {
            min_spent: Some(10_000.0),
            status: Some(vec![CustomerStatus::Customer]),
            ..Default::default()
        };

        let spend_ids = ids(&filter(&customers, &by_spend));
        let status_ids = ids(&filter(&customers, &by_status));
        let combined_ids = ids(&filter(&customers, &combined));

        let intersection: Vec<Uuid> = spend_ids
            .iter()
            .filter(|id| status_ids.contains(id))
            .copied()
            .collect();
        assert_eq!(combined_ids, intersection);
        assert_eq!(combined_ids.len(), 1);
    }

    #[test]
    fn test_filter_preserves_input_order() {
        let mut customers = Vec::new();
        for name in ["Zoe", "Ana", "Mia"] {
            let mut c = customer(name, CustomerStatus::Customer);
            c.total_orders = 3;
            customers.push(c);
        }
        let criteria = SegmentCriteria {
            min_orders: Some(1),
            ..Default::default()
        };
        let matched = filter(&customers, &criteria);
        let names: Vec<&str> = matched.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Ana", "Mia"]);
    }

    #[test]
    fn test_criteria_serde_omits_absent_fields() {
        let criteria = SegmentCriteria {
            min_spent: Some(100.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&criteria).unwrap();
        assert_eq!(json, "{\"min_spent\":100.0}");

        let parsed: SegmentCriteria = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, SegmentCriteria::default());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle stage of a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Lead,
    Prospect,
    Customer,
    Vip,
    Inactive,
}

/// A CRM customer record, the unit the segmentation engine filters over.
///
/// The engine treats customer collections as read-only snapshots supplied by
/// the caller; nothing here is mutated by segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: CustomerStatus,
    /// Acquisition channel label, free-form ("referral", "walk-in", ...).
    pub source: String,
    pub tags: Vec<String>,
    pub total_orders: u32,
    pub total_spent: f64,
    /// Projected lifetime value; tracked independently of `total_spent`.
    pub lifetime_value: f64,
    /// Scoring output, typically 0-100.
    pub lead_score: f32,
    pub is_vip: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_contact_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Display name for UI surfaces.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

//! Named segment catalog: create/update/delete/list over a durable store,
//! with cached stats snapshots.

use chrono::{DateTime, Utc};
use crm_core::types::Customer;
use crm_core::{CrmError, CrmResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::aggregate::{aggregate, SegmentStats};
use crate::criteria::{filter, SegmentCriteria, SegmentRule};
use crate::store::SegmentStore;

/// A named, persisted segment definition with its cached stats snapshot.
///
/// `customer_count`, `total_value`, and `average_value` reflect the customer
/// collection at the moment the segment was created, updated, or refreshed.
/// They are deliberately not recomputed on read or on load; callers needing
/// fresh numbers use [`SegmentCatalog::refresh`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub criteria: SegmentCriteria,
    pub customer_count: u64,
    pub total_value: f64,
    pub average_value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Segment {
    fn apply_stats(&mut self, stats: SegmentStats) {
        self.customer_count = stats.customer_count;
        self.total_value = stats.total_value;
        self.average_value = stats.average_value;
    }
}

impl SegmentRule for Segment {
    fn criteria(&self) -> &SegmentCriteria {
        &self.criteria
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Editable fields for [`SegmentCatalog::update`]; absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub criteria: Option<SegmentCriteria>,
}

/// Catalog of custom segments backed by a durable store.
///
/// The whole catalog is persisted as one JSON array in insertion order.
/// Every write operation persists first and updates memory only on success,
/// so a failed store write leaves the in-memory catalog exactly as it was.
pub struct SegmentCatalog {
    store: Box<dyn SegmentStore>,
    segments: RwLock<Vec<Segment>>,
}

impl SegmentCatalog {
    /// Open a catalog over `store`, loading whatever it currently holds.
    pub fn open(store: Box<dyn SegmentStore>) -> CrmResult<Self> {
        let catalog = Self {
            store,
            segments: RwLock::new(Vec::new()),
        };
        catalog.reload()?;
        Ok(catalog)
    }

    /// Create a segment, compute its stats snapshot against `customers`, and
    /// persist the catalog.
    pub fn create(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        criteria: SegmentCriteria,
        customers: &[Customer],
    ) -> CrmResult<Segment> {
        let name = name.into();
        validate_name(&name)?;

        let now = Utc::now();
        let mut segment = Segment {
            id: Uuid::new_v4(),
            name,
            description: description.into(),
            criteria,
            customer_count: 0,
            total_value: 0.0,
            average_value: 0.0,
            created_at: now,
            updated_at: now,
        };
        let matched = filter(customers, &segment.criteria);
        segment.apply_stats(aggregate(&matched, customers));

        let mut segments = self.segments.write();
        let mut next = segments.clone();
        next.push(segment.clone());
        self.persist(&next)?;
        *segments = next;

        info!(
            segment_id = %segment.id,
            name = %segment.name,
            customers = segment.customer_count,
            "Segment created"
        );
        Ok(segment)
    }

    /// Apply `changes` to an existing segment, recompute its stats snapshot,
    /// and persist the catalog.
    pub fn update(
        &self,
        id: Uuid,
        changes: SegmentUpdate,
        customers: &[Customer],
    ) -> CrmResult<Segment> {
        if let Some(name) = &changes.name {
            validate_name(name)?;
        }

        let mut segments = self.segments.write();
        let mut next = segments.clone();
        let segment = next
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = changes.name {
            segment.name = name;
        }
        if let Some(description) = changes.description {
            segment.description = description;
        }
        if let Some(criteria) = changes.criteria {
            segment.criteria = criteria;
        }
        let matched = filter(customers, &segment.criteria);
        segment.apply_stats(aggregate(&matched, customers));
        segment.updated_at = Utc::now();
        let updated = segment.clone();

        self.persist(&next)?;
        *segments = next;

        info!(segment_id = %id, name = %updated.name, "Segment updated");
        Ok(updated)
    }

    /// Recompute the stats snapshot against the current collection without
    /// touching the definition.
    pub fn refresh(&self, id: Uuid, customers: &[Customer]) -> CrmResult<Segment> {
        let mut segments = self.segments.write();
        let mut next = segments.clone();
        let segment = next
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;

        let matched = filter(customers, &segment.criteria);
        segment.apply_stats(aggregate(&matched, customers));
        segment.updated_at = Utc::now();
        let refreshed = segment.clone();

        self.persist(&next)?;
        *segments = next;

        info!(
            segment_id = %id,
            customers = refreshed.customer_count,
            "Segment stats refreshed"
        );
        Ok(refreshed)
    }

    /// Remove a segment and persist the catalog. Returns the removed entry.
    pub fn delete(&self, id: Uuid) -> CrmResult<Segment> {
        let mut segments = self.segments.write();
        let position = segments
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;

        let mut next = segments.clone();
        let removed = next.remove(position);
        self.persist(&next)?;
        *segments = next;

        info!(segment_id = %id, name = %removed.name, "Segment deleted");
        Ok(removed)
    }

    pub fn get(&self, id: Uuid) -> Option<Segment> {
        self.segments.read().iter().find(|s| s.id == id).cloned()
    }

    /// All segments in insertion order, oldest first.
    pub fn list(&self) -> Vec<Segment> {
        self.segments.read().clone()
    }

    pub fn len(&self) -> usize {
        self.segments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.read().is_empty()
    }

    /// Replace in-memory state from the durable store. A missing blob yields
    /// an empty catalog; a corrupt blob surfaces an error and leaves memory
    /// untouched.
    pub fn reload(&self) -> CrmResult<()> {
        let loaded: Vec<Segment> = match self.store.read()? {
            Some(payload) => serde_json::from_str(&payload)?,
            None => Vec::new(),
        };
        let count = loaded.len();
        *self.segments.write() = loaded;
        info!(segments = count, "Segment catalog reloaded");
        Ok(())
    }

    fn persist(&self, segments: &[Segment]) -> CrmResult<()> {
        let payload = serde_json::to_string_pretty(segments)?;
        self.store.write(&payload)
    }
}

fn validate_name(name: &str) -> CrmResult<()> {
    if name.trim().is_empty() {
        return Err(CrmError::Validation(
            "segment name must not be empty".into(),
        ));
    }
    Ok(())
}

fn not_found(id: Uuid) -> CrmError {
    CrmError::NotFound(format!("segment {id}"))
}

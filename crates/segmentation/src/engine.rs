//! Engine facade tying together the catalog, the quick segments, and the
//! selection coordinator. This is the surface the surrounding CRM consumes.

use chrono::Utc;
use crm_core::config::SegmentationConfig;
use crm_core::types::Customer;
use crm_core::{CrmError, CrmResult};
use uuid::Uuid;

use crate::aggregate::{aggregate, SegmentStats};
use crate::builtin::{QuickSegment, DEFAULT_QUICK_WINDOW_DAYS};
use crate::catalog::{Segment, SegmentCatalog, SegmentUpdate};
use crate::criteria::{filter, SegmentCriteria, SegmentRule};
use crate::selection::{SegmentRef, SelectionCoordinator, SelectionObserver};
use crate::store::{FileStore, SegmentStore};

/// Customer segmentation engine.
///
/// Owns the segment catalog and the selection coordinator, and enforces the
/// invariant that deleting the currently selected segment clears the
/// selection before the delete completes, so an observer never holds a
/// dangling reference. Customer collections are supplied by the caller on
/// every call and treated as immutable snapshots.
pub struct SegmentationEngine {
    catalog: SegmentCatalog,
    selection: SelectionCoordinator,
    quick_window_days: i64,
}

impl SegmentationEngine {
    /// Open the engine over `store`, loading the existing catalog.
    pub fn open(store: Box<dyn SegmentStore>) -> CrmResult<Self> {
        Ok(Self {
            catalog: SegmentCatalog::open(store)?,
            selection: SelectionCoordinator::new(),
            quick_window_days: DEFAULT_QUICK_WINDOW_DAYS,
        })
    }

    /// Open a file-backed engine from configuration.
    pub fn from_config(config: &SegmentationConfig) -> CrmResult<Self> {
        let mut engine = Self::open(Box::new(FileStore::new(&config.catalog_path)))?;
        engine.quick_window_days = config.quick_window_days;
        Ok(engine)
    }

    /// Register the observer notified on selection changes.
    pub fn set_observer(&self, observer: Box<dyn SelectionObserver>) {
        self.selection.set_observer(observer);
    }

    // ─── Catalog ───────────────────────────────────────────────────────────

    pub fn create_segment(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        criteria: SegmentCriteria,
        customers: &[Customer],
    ) -> CrmResult<Segment> {
        self.catalog.create(name, description, criteria, customers)
    }

    pub fn update_segment(
        &self,
        id: Uuid,
        changes: SegmentUpdate,
        customers: &[Customer],
    ) -> CrmResult<Segment> {
        self.catalog.update(id, changes, customers)
    }

    /// Recompute a segment's cached stats against the current collection.
    pub fn refresh_segment(&self, id: Uuid, customers: &[Customer]) -> CrmResult<Segment> {
        self.catalog.refresh(id, customers)
    }

    /// Delete a segment. If it is the active selection, the selection is
    /// cleared (observer notified) before the catalog entry is removed.
    pub fn delete_segment(&self, id: Uuid) -> CrmResult<Segment> {
        if self.catalog.get(id).is_none() {
            return Err(CrmError::NotFound(format!("segment {id}")));
        }
        if self.selection.active() == Some(SegmentRef::Custom(id)) {
            self.selection.clear();
        }
        self.catalog.delete(id)
    }

    pub fn get_segment(&self, id: Uuid) -> Option<Segment> {
        self.catalog.get(id)
    }

    /// All custom segments, oldest first.
    pub fn list_segments(&self) -> Vec<Segment> {
        self.catalog.list()
    }

    /// Re-read the catalog from the durable store.
    pub fn reload(&self) -> CrmResult<()> {
        self.catalog.reload()
    }

    // ─── Evaluation ────────────────────────────────────────────────────────

    /// Customers matching `criteria`, in input order.
    pub fn segment_customers(
        &self,
        criteria: &SegmentCriteria,
        customers: &[Customer],
    ) -> Vec<Customer> {
        filter(customers, criteria)
    }

    /// Matched subset plus stats for any rule, custom or quick.
    pub fn evaluate_rule(
        &self,
        rule: &dyn SegmentRule,
        customers: &[Customer],
    ) -> (Vec<Customer>, SegmentStats) {
        let matched = filter(customers, rule.criteria());
        let stats = aggregate(&matched, customers);
        (matched, stats)
    }

    /// The built-in quick segments, materialized with live stats. Never read
    /// from or written to the catalog.
    pub fn quick_segments(&self, customers: &[Customer]) -> Vec<Segment> {
        let now = Utc::now();
        QuickSegment::standard_with_window(now, self.quick_window_days)
            .iter()
            .map(|quick| quick.materialize(customers, now))
            .collect()
    }

    // ─── Selection ─────────────────────────────────────────────────────────

    /// Select a cataloged segment and push the matched subset to the
    /// observer. Returns the subset.
    pub fn select_segment(&self, id: Uuid, customers: &[Customer]) -> CrmResult<Vec<Customer>> {
        let segment = self
            .catalog
            .get(id)
            .ok_or_else(|| CrmError::NotFound(format!("segment {id}")))?;
        let matched = filter(customers, &segment.criteria);
        self.selection
            .select(SegmentRef::Custom(id), &segment, &matched);
        Ok(matched)
    }

    /// Select a quick segment by its display name.
    pub fn select_quick(&self, name: &str, customers: &[Customer]) -> CrmResult<Vec<Customer>> {
        let now = Utc::now();
        let quick = QuickSegment::standard_with_window(now, self.quick_window_days)
            .into_iter()
            .find(|q| q.name == name)
            .ok_or_else(|| CrmError::NotFound(format!("quick segment `{name}`")))?;
        let materialized = quick.materialize(customers, now);
        let matched = filter(customers, &quick.criteria);
        self.selection
            .select(SegmentRef::Quick(quick.name.clone()), &materialized, &matched);
        Ok(matched)
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    pub fn active_selection(&self) -> Option<SegmentRef> {
        self.selection.active()
    }
}
